pub mod catalog;
pub mod dashboard;
pub mod requisition;
pub mod user;
