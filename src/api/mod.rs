pub mod book_instance_handlers;
pub mod handlers;
pub mod routes;
pub mod views;

pub use book_instance_handlers::*;
pub use handlers::*;
pub use routes::*;
