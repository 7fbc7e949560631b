//! `SeaORM` Entity prelude

pub use super::catalog_records::Entity as CatalogRecords;
pub use super::requisitions::Entity as Requisitions;
pub use super::users::Entity as Users;
