pub mod common;
pub mod credit;
pub mod draw;
pub mod order;
pub mod pagination;
pub mod participation;
pub mod ticket;

pub use common::*;
pub use credit::*;
pub use draw::*;
pub use order::*;
pub use pagination::*;
pub use participation::*;
pub use ticket::*;
