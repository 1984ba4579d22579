pub mod category;
pub mod statistics;
pub mod transaction;
