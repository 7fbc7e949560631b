//! `SeaORM` Entity for catalog_records table
//!
//! Generic store for the block/survey/acquisition/processing/interpretation
//! forms and their media variants.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Catalog kind slug, e.g. "block" or "processing_media"
    pub kind: String,
    /// Value of the kind's key field (block_id, survey_id, ...)
    pub record_key: String,
    /// Submitted field map, stored as given
    #[sea_orm(column_type = "JsonBinary")]
    pub fields: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
