pub mod catalog;
pub mod common;
pub mod dashboard;
pub mod requisition;
pub mod user;
