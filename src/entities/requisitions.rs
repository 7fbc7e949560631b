//! SeaORM Entity for requisitions table
//!
//! A requisition is a data request routed through two sequential review
//! gates (L2 then L3). Only the approval transitions mutate a stored row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Approval state of a requisition.
///
/// `Draft` is kept for wire compatibility; creation starts at
/// `PendingL2Approval` and nothing currently moves a record into `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "Draft")]
    #[serde(rename = "Draft")]
    Draft,
    #[sea_orm(string_value = "Pending_L2_Approval")]
    #[serde(rename = "Pending_L2_Approval")]
    PendingL2Approval,
    #[sea_orm(string_value = "L2_Approved")]
    #[serde(rename = "L2_Approved")]
    L2Approved,
    #[sea_orm(string_value = "L2_Declined")]
    #[serde(rename = "L2_Declined")]
    L2Declined,
    #[sea_orm(string_value = "L3_Approved")]
    #[serde(rename = "L3_Approved")]
    L3Approved,
    #[sea_orm(string_value = "L3_Declined")]
    #[serde(rename = "L3_Declined")]
    L3Declined,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "requisitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject: String,
    pub date_of_requisition: Option<Date>,
    pub project_district: Option<String>,
    pub sheet: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub remark: Option<String>,
    /// `dataTypes` rows as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub data_types: Json,
    /// `slNoData` rows as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub sl_no_data: Json,
    pub prepared_by_signature: Option<String>,
    pub prepared_by_designation: Option<String>,
    pub group_coordinator_signature: Option<String>,
    pub group_coordinator_designation: Option<String>,
    /// Creator identity, never updated after insert
    pub requester_user_id: String,
    pub current_approval_status: ApprovalStatus,
    pub l2_approver_id: Option<String>,
    pub l2_approval_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub l2_comments: Option<String>,
    pub l3_approver_id: Option<String>,
    pub l3_approval_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub l3_comments: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
