pub mod sanitize;
pub mod validate;

pub use sanitize::*;
pub use validate::*;
