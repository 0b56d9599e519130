pub mod models;
pub mod routes;

pub use models::*;
pub use routes::Route;
