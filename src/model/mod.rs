pub mod book;
pub mod book_instance;
pub mod common;
pub mod presentation;

pub use book::*;
pub use book_instance::*;
pub use common::*;
pub use presentation::*;
