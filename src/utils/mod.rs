pub mod code_generator;
pub mod jwt;

pub use code_generator::*;
pub use jwt::*;
