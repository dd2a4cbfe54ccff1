pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthedCustomer};
pub use cors::create_cors;
