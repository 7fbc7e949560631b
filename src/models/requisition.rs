//! Requisition request/response models
//!
//! Field names follow the web client: descriptive fields are camelCase,
//! ownership and approval fields are snake_case.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entities::requisitions::{self, ApprovalStatus};
use crate::entities::users::Role;

/// One requested data type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeRow {
    /// 1-based position in the list
    pub sl_no: u32,
    pub type_of_data: String,
    pub sl_no_required: String,
    pub data_observer: String,
    pub project_objective: String,
    pub remarks: String,
}

/// One contact/officer row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlNoRow {
    /// 1-based position in the list
    pub sl_no: u32,
    pub description: String,
    pub mobile_no: String,
    pub designation: String,
}

/// POST /requisitions body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequisitionRequest {
    /// Derived from projectDistrict/dateOfRequisition when absent
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub date_of_requisition: Option<NaiveDate>,
    #[serde(default)]
    pub project_district: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub data_types: Vec<DataTypeRow>,
    #[serde(default)]
    pub sl_no_data: Vec<SlNoRow>,
    #[serde(default)]
    pub prepared_by_signature: Option<String>,
    #[serde(default)]
    pub prepared_by_designation: Option<String>,
    #[serde(default)]
    pub group_coordinator_signature: Option<String>,
    #[serde(default)]
    pub group_coordinator_designation: Option<String>,
}

/// Query params for POST /requisitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequisitionQuery {
    pub requester_id: String,
    /// Falls back to the role registered for `requester_id`
    #[serde(default)]
    pub user_role: Option<Role>,
}

/// Query params identifying the caller for list and review endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorQuery {
    pub user_role: Role,
    pub user_id: String,
}

/// PATCH /requisitions/{id}/{approve|decline}_l{2|3} body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Must match `user_id` when present
    #[serde(default)]
    pub approver_id: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequisitionResponse {
    pub id: i32,
    pub subject: String,
    #[serde(rename = "dateOfRequisition")]
    pub date_of_requisition: Option<NaiveDate>,
    #[serde(rename = "projectDistrict")]
    pub project_district: Option<String>,
    pub sheet: Option<String>,
    pub remark: Option<String>,
    #[serde(rename = "dataTypes")]
    pub data_types: serde_json::Value,
    #[serde(rename = "slNoData")]
    pub sl_no_data: serde_json::Value,
    #[serde(rename = "preparedBySignature")]
    pub prepared_by_signature: Option<String>,
    #[serde(rename = "preparedByDesignation")]
    pub prepared_by_designation: Option<String>,
    #[serde(rename = "groupCoordinatorSignature")]
    pub group_coordinator_signature: Option<String>,
    #[serde(rename = "groupCoordinatorDesignation")]
    pub group_coordinator_designation: Option<String>,
    pub requester_user_id: String,
    pub current_approval_status: ApprovalStatus,
    pub l2_approver_id: Option<String>,
    pub l2_approval_date: Option<DateTime<FixedOffset>>,
    pub l2_comments: Option<String>,
    pub l3_approver_id: Option<String>,
    pub l3_approval_date: Option<DateTime<FixedOffset>>,
    pub l3_comments: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<requisitions::Model> for RequisitionResponse {
    fn from(model: requisitions::Model) -> Self {
        Self {
            id: model.id,
            subject: model.subject,
            date_of_requisition: model.date_of_requisition,
            project_district: model.project_district,
            sheet: model.sheet,
            remark: model.remark,
            data_types: model.data_types,
            sl_no_data: model.sl_no_data,
            prepared_by_signature: model.prepared_by_signature,
            prepared_by_designation: model.prepared_by_designation,
            group_coordinator_signature: model.group_coordinator_signature,
            group_coordinator_designation: model.group_coordinator_designation,
            requester_user_id: model.requester_user_id,
            current_approval_status: model.current_approval_status,
            l2_approver_id: model.l2_approver_id,
            l2_approval_date: model.l2_approval_date,
            l2_comments: model.l2_comments,
            l3_approver_id: model.l3_approver_id,
            l3_approval_date: model.l3_approval_date,
            l3_comments: model.l3_comments,
            created_at: model.created_at,
        }
    }
}

/// Response for a successful approve/decline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub message: String,
    pub requisition: RequisitionResponse,
}
