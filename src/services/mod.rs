pub mod credit_service;
pub mod draw_service;
pub mod order_service;
pub mod participation_service;

pub use credit_service::*;
pub use draw_service::*;
pub use order_service::*;
pub use participation_service::*;
