pub mod admin;
pub mod campaign;
pub mod customer;
pub mod draw;
pub mod order;

pub use admin::admin_config;
pub use campaign::campaign_config;
pub use customer::customer_config;
pub use draw::draw_config;
pub use order::order_config;
