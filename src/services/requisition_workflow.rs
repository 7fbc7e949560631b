//! Requisition approval workflow
//!
//! Owns the requisition lifecycle: creation, role-filtered listing and the
//! two-stage review state machine
//!
//! ```text
//! Pending_L2_Approval --approve_l2--> L2_Approved --approve_l3--> L3_Approved
//!         |                               |
//!         +--decline_l2--> L2_Declined    +--decline_l3--> L3_Declined
//! ```
//!
//! Every transition is a single conditional UPDATE keyed on the expected
//! source status, so two reviewers racing on the same record cannot both win.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    Order, QueryFilter, QueryOrder, Set,
};
use std::fmt;
use tracing::{debug, info, warn};

use crate::entities::prelude::Requisitions;
use crate::entities::requisitions::{self, ApprovalStatus};
use crate::entities::users::Role;
use crate::models::requisition::{CreateRequisitionRequest, DataTypeRow, SlNoRow};

/// Errors surfaced by the workflow; each maps to a distinct HTTP status
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    State(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Authenticated caller, passed explicitly into every operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }
}

/// Review tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalLevel {
    L2,
    L3,
}

impl ApprovalLevel {
    /// Parse the numeric level used by the client (2 or 3)
    pub fn from_number(level: u8) -> Result<Self, WorkflowError> {
        match level {
            2 => Ok(ApprovalLevel::L2),
            3 => Ok(ApprovalLevel::L3),
            other => Err(WorkflowError::Validation(format!(
                "Unsupported approval level {}. Expected 2 or 3.",
                other
            ))),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            ApprovalLevel::L2 => 2,
            ApprovalLevel::L3 => 3,
        }
    }

    /// Status a record must be in before this tier may review it
    pub fn source_status(self) -> ApprovalStatus {
        match self {
            ApprovalLevel::L2 => ApprovalStatus::PendingL2Approval,
            ApprovalLevel::L3 => ApprovalStatus::L2Approved,
        }
    }

    /// Whether `role` holds the review capability for this tier
    pub fn reviewable_by(self, role: Role) -> bool {
        matches!(
            (self, role),
            (_, Role::Admin) | (ApprovalLevel::L2, Role::ReadOnlyL2) | (ApprovalLevel::L3, Role::ReadOnlyL3)
        )
    }
}

impl fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approve,
    Decline,
}

impl Decision {
    fn verb(self) -> &'static str {
        match self {
            Decision::Approve => "approval",
            Decision::Decline => "decline",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Decline => "declined",
        }
    }
}

/// Whether `role` may create requisitions
pub fn can_create(role: Role) -> bool {
    matches!(role, Role::Admin | Role::DataEntry)
}

/// Role a requester creates with.
///
/// The role stored at signup is authoritative; a differing claimed role is
/// rejected. Unregistered ids fall back to the claimed role.
pub fn resolve_requester_role(registered: Option<Role>, claimed: Option<Role>) -> Result<Role, WorkflowError> {
    match (registered, claimed) {
        (Some(stored), Some(claimed)) if stored != claimed => Err(WorkflowError::Authorization(
            "user_role does not match the requester's registered role.".to_string(),
        )),
        (Some(stored), _) => Ok(stored),
        (None, Some(claimed)) => Ok(claimed),
        (None, None) => Err(WorkflowError::Authorization(
            "Requester is not a registered user.".to_string(),
        )),
    }
}

/// Pure transition function for the review state machine.
///
/// Returns the target status, or a `State` error when `current` is not the
/// source status for `level`. Terminal states have no outgoing edges.
pub fn next_status(
    current: ApprovalStatus,
    level: ApprovalLevel,
    decision: Decision,
) -> Result<ApprovalStatus, WorkflowError> {
    match (current, level, decision) {
        (ApprovalStatus::PendingL2Approval, ApprovalLevel::L2, Decision::Approve) => Ok(ApprovalStatus::L2Approved),
        (ApprovalStatus::PendingL2Approval, ApprovalLevel::L2, Decision::Decline) => Ok(ApprovalStatus::L2Declined),
        (ApprovalStatus::L2Approved, ApprovalLevel::L3, Decision::Approve) => Ok(ApprovalStatus::L3Approved),
        (ApprovalStatus::L2Approved, ApprovalLevel::L3, Decision::Decline) => Ok(ApprovalStatus::L3Declined),
        (current, level, _) => Err(WorkflowError::State(format!(
            "Requisition is not pending {} approval. Current status: {}",
            level,
            status_label(current)
        ))),
    }
}

/// Wire label of a status (e.g. "Pending_L2_Approval")
pub fn status_label(status: ApprovalStatus) -> String {
    status.to_value()
}

/// Subject shown in list views.
///
/// A non-blank submitted subject wins; otherwise it is derived from the
/// project district and requisition date. `None` when nothing is available.
pub fn derive_subject(
    subject: Option<&str>,
    project_district: Option<&str>,
    date_of_requisition: Option<NaiveDate>,
) -> Option<String> {
    if let Some(s) = subject.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(s.to_string());
    }

    let district = project_district.map(str::trim).filter(|d| !d.is_empty());
    if district.is_none() && date_of_requisition.is_none() {
        return None;
    }

    Some(format!(
        "Requisition for {} on {}",
        district.unwrap_or("Unknown Project"),
        date_of_requisition
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ))
}

/// Row numbers must run 1, 2, 3, ... in submission order
fn check_sequence(name: &str, sl_nos: impl Iterator<Item = u32>) -> Result<(), WorkflowError> {
    for (index, sl_no) in sl_nos.enumerate() {
        let expected = index as u32 + 1;
        if sl_no != expected {
            return Err(WorkflowError::Validation(format!(
                "{} row {} has slNo {}, expected {}",
                name,
                index + 1,
                sl_no,
                expected
            )));
        }
    }
    Ok(())
}

pub fn validate_rows(data_types: &[DataTypeRow], sl_no_data: &[SlNoRow]) -> Result<(), WorkflowError> {
    check_sequence("dataTypes", data_types.iter().map(|r| r.sl_no))?;
    check_sequence("slNoData", sl_no_data.iter().map(|r| r.sl_no))?;
    Ok(())
}

/// Requisition workflow service
#[derive(Clone)]
pub struct RequisitionWorkflow {
    db: DatabaseConnection,
}

impl RequisitionWorkflow {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a new requisition in `Pending_L2_Approval` owned by `requester`
    pub async fn create(
        &self,
        request: CreateRequisitionRequest,
        requester: &Actor,
    ) -> Result<requisitions::Model, WorkflowError> {
        if requester.id.trim().is_empty() {
            return Err(WorkflowError::Validation("requester_id is required".to_string()));
        }

        if !can_create(requester.role) {
            return Err(WorkflowError::Authorization(
                "Not authorized to create requisitions.".to_string(),
            ));
        }

        let subject = derive_subject(
            request.subject.as_deref(),
            request.project_district.as_deref(),
            request.date_of_requisition,
        )
        .ok_or_else(|| {
            WorkflowError::Validation(
                "subject is required (or provide projectDistrict / dateOfRequisition to derive it)".to_string(),
            )
        })?;

        validate_rows(&request.data_types, &request.sl_no_data)?;

        let data_types = serde_json::to_value(&request.data_types)
            .map_err(|e| WorkflowError::Validation(format!("Invalid dataTypes: {}", e)))?;
        let sl_no_data = serde_json::to_value(&request.sl_no_data)
            .map_err(|e| WorkflowError::Validation(format!("Invalid slNoData: {}", e)))?;

        let requisition = requisitions::ActiveModel {
            subject: Set(subject),
            date_of_requisition: Set(request.date_of_requisition),
            project_district: Set(request.project_district),
            sheet: Set(request.sheet),
            remark: Set(request.remark),
            data_types: Set(data_types),
            sl_no_data: Set(sl_no_data),
            prepared_by_signature: Set(request.prepared_by_signature),
            prepared_by_designation: Set(request.prepared_by_designation),
            group_coordinator_signature: Set(request.group_coordinator_signature),
            group_coordinator_designation: Set(request.group_coordinator_designation),
            requester_user_id: Set(requester.id.clone()),
            current_approval_status: Set(ApprovalStatus::PendingL2Approval),
            l2_approver_id: Set(None),
            l2_approval_date: Set(None),
            l2_comments: Set(None),
            l3_approver_id: Set(None),
            l3_approval_date: Set(None),
            l3_comments: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        let stored = requisition.insert(&self.db).await?;

        info!(
            requisition_id = stored.id,
            requester = %requester.id,
            role = ?requester.role,
            "Requisition created"
        );

        Ok(stored)
    }

    /// Requisitions visible to `viewer`, in insertion order.
    ///
    /// admin and the L2/L3 reviewers see everything; data_entry and
    /// read_only_l1 see only what they submitted.
    pub async fn list(&self, viewer: &Actor) -> Result<Vec<requisitions::Model>, WorkflowError> {
        let condition = match viewer.role {
            Role::Admin | Role::ReadOnlyL2 | Role::ReadOnlyL3 => Condition::all(),
            Role::DataEntry | Role::ReadOnlyL1 => {
                Condition::all().add(requisitions::Column::RequesterUserId.eq(viewer.id.as_str()))
            }
        };

        let rows = Requisitions::find()
            .filter(condition)
            .order_by(requisitions::Column::Id, Order::Asc)
            .all(&self.db)
            .await?;

        debug!(viewer = %viewer.id, role = ?viewer.role, count = rows.len(), "Listed requisitions");

        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<requisitions::Model, WorkflowError> {
        Requisitions::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| WorkflowError::NotFound("Requisition form not found.".to_string()))
    }

    pub async fn approve(
        &self,
        id: i32,
        level: ApprovalLevel,
        approver: &Actor,
        comments: Option<String>,
    ) -> Result<requisitions::Model, WorkflowError> {
        self.review(id, level, Decision::Approve, approver, comments).await
    }

    pub async fn decline(
        &self,
        id: i32,
        level: ApprovalLevel,
        approver: &Actor,
        comments: Option<String>,
    ) -> Result<requisitions::Model, WorkflowError> {
        self.review(id, level, Decision::Decline, approver, comments).await
    }

    /// Apply one review decision.
    ///
    /// Order of checks: capability, existence, then source state. Nothing is
    /// written unless the conditional update matches the expected source.
    pub async fn review(
        &self,
        id: i32,
        level: ApprovalLevel,
        decision: Decision,
        approver: &Actor,
        comments: Option<String>,
    ) -> Result<requisitions::Model, WorkflowError> {
        authorize_review(level, decision, approver).inspect_err(|_| {
            warn!(
                requisition_id = id,
                approver = %approver.id,
                role = ?approver.role,
                level = level.number(),
                "Review rejected: role lacks capability"
            );
        })?;

        if approver.id.trim().is_empty() {
            return Err(WorkflowError::Validation("approver id is required".to_string()));
        }

        let source = level.source_status();
        let target = next_status(source, level, decision)?;
        let now = Utc::now().fixed_offset();

        let (approver_col, date_col, comments_col) = match level {
            ApprovalLevel::L2 => (
                requisitions::Column::L2ApproverId,
                requisitions::Column::L2ApprovalDate,
                requisitions::Column::L2Comments,
            ),
            ApprovalLevel::L3 => (
                requisitions::Column::L3ApproverId,
                requisitions::Column::L3ApprovalDate,
                requisitions::Column::L3Comments,
            ),
        };

        let result = Requisitions::update_many()
            .col_expr(requisitions::Column::CurrentApprovalStatus, Expr::value(target))
            .col_expr(approver_col, Expr::value(approver.id.clone()))
            .col_expr(date_col, Expr::value(now))
            .col_expr(comments_col, Expr::value(comments))
            .filter(requisitions::Column::Id.eq(id))
            .filter(requisitions::Column::CurrentApprovalStatus.eq(source))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Lost the compare-and-set: tell the caller why
            let current = self.get_by_id(id).await?;
            let err = next_status(current.current_approval_status, level, decision)
                .err()
                .unwrap_or_else(|| {
                    WorkflowError::State(format!(
                        "Requisition changed concurrently. Current status: {}",
                        status_label(current.current_approval_status)
                    ))
                });
            warn!(
                requisition_id = id,
                approver = %approver.id,
                status = %status_label(current.current_approval_status),
                level = level.number(),
                "Review rejected: requisition not in required state"
            );
            return Err(err);
        }

        info!(
            requisition_id = id,
            approver = %approver.id,
            level = level.number(),
            status = %status_label(target),
            "Requisition {}",
            decision.past_tense()
        );

        self.get_by_id(id).await
    }
}

/// Capability check for one review tier, independent of any record
pub fn authorize_review(level: ApprovalLevel, decision: Decision, approver: &Actor) -> Result<(), WorkflowError> {
    if level.reviewable_by(approver.role) {
        Ok(())
    } else {
        Err(WorkflowError::Authorization(format!(
            "Not authorized to perform {} {}.",
            level,
            decision.verb()
        )))
    }
}

/// Message returned to the client after a successful review
pub fn review_message(level: ApprovalLevel, decision: Decision) -> String {
    format!("Requisition {} at {}.", decision.past_tense(), level)
}
