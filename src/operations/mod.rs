pub mod add;
pub mod dashboard;
pub mod remove;
pub mod report;
pub mod summary;
