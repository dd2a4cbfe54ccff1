pub mod campaign_tickets;
pub mod campaigns;
pub mod customer_credits;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod product_prizes;
pub mod products;

pub use campaign_tickets as campaign_ticket_entity;
pub use campaigns as campaign_entity;
pub use customer_credits as customer_credit_entity;
pub use customers as customer_entity;
pub use order_items as order_item_entity;
pub use orders as order_entity;
pub use product_prizes as product_prize_entity;
pub use products as product_entity;

pub use campaign_tickets::TicketStatus;
pub use campaigns::CampaignStatus;
pub use customer_credits::CreditType;
pub use orders::{OrderStatus, PaymentStatus};
