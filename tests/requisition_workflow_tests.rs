mod common;

use chrono::NaiveDate;
use seismic_catalog_backend::entities::requisitions::ApprovalStatus;
use seismic_catalog_backend::entities::users::Role;
use seismic_catalog_backend::models::requisition::{CreateRequisitionRequest, DataTypeRow, SlNoRow};
use seismic_catalog_backend::services::requisition_workflow::{
    Actor, ApprovalLevel, RequisitionWorkflow, WorkflowError,
};

use common::setup_test_db;

async fn workflow() -> RequisitionWorkflow {
    RequisitionWorkflow::new(setup_test_db().await.expect("Failed to set up test DB"))
}

fn sample_request() -> CreateRequisitionRequest {
    CreateRequisitionRequest {
        date_of_requisition: NaiveDate::from_ymd_opt(2024, 5, 2),
        project_district: Some("Cambay".to_string()),
        sheet: Some("46 B/12".to_string()),
        data_types: vec![DataTypeRow {
            sl_no: 1,
            type_of_data: "3D seismic".to_string(),
            sl_no_required: "2".to_string(),
            data_observer: "GP-27".to_string(),
            project_objective: "Reservoir mapping".to_string(),
            remarks: "SEG-Y".to_string(),
        }],
        sl_no_data: vec![SlNoRow {
            sl_no: 1,
            description: "Data custodian".to_string(),
            mobile_no: "9876543210".to_string(),
            designation: "Chief Geophysicist".to_string(),
        }],
        prepared_by_signature: Some("R. Sharma".to_string()),
        prepared_by_designation: Some("Geophysicist".to_string()),
        ..Default::default()
    }
}

fn data_entry(id: &str) -> Actor {
    Actor::new(id, Role::DataEntry)
}

/// Scenario: create -> approve L2 -> decline L3 -> approve L3 fails
#[tokio::test]
async fn test_full_review_scenario() {
    let wf = workflow().await;

    let created = wf.create(sample_request(), &data_entry("U1")).await.unwrap();
    assert_eq!(created.current_approval_status, ApprovalStatus::PendingL2Approval);
    assert_eq!(created.requester_user_id, "U1");
    assert_eq!(created.subject, "Requisition for Cambay on 2024-05-02");
    assert_eq!(created.data_types[0]["slNo"], 1);
    assert!(created.l2_approver_id.is_none());
    assert!(created.l3_approver_id.is_none());

    let l2 = Actor::new("L2A", Role::ReadOnlyL2);
    let approved = wf
        .approve(created.id, ApprovalLevel::L2, &l2, Some("ok".to_string()))
        .await
        .unwrap();
    assert_eq!(approved.current_approval_status, ApprovalStatus::L2Approved);
    assert_eq!(approved.l2_approver_id.as_deref(), Some("L2A"));
    assert_eq!(approved.l2_comments.as_deref(), Some("ok"));
    assert!(approved.l2_approval_date.is_some());
    assert!(approved.l3_approver_id.is_none());

    let l3 = Actor::new("L3A", Role::ReadOnlyL3);
    let declined = wf
        .decline(created.id, ApprovalLevel::L3, &l3, Some("missing data".to_string()))
        .await
        .unwrap();
    assert_eq!(declined.current_approval_status, ApprovalStatus::L3Declined);
    assert_eq!(declined.l3_approver_id.as_deref(), Some("L3A"));
    assert_eq!(declined.l3_comments.as_deref(), Some("missing data"));
    assert_eq!(declined.l2_approver_id.as_deref(), Some("L2A"));

    let err = wf
        .approve(created.id, ApprovalLevel::L3, &l3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::State(_)), "got {:?}", err);

    let after = wf.get_by_id(created.id).await.unwrap();
    assert_eq!(after, declined);
}

#[tokio::test]
async fn test_l2_review_outside_pending_is_state_error_without_mutation() {
    let wf = workflow().await;
    let created = wf.create(sample_request(), &data_entry("U1")).await.unwrap();

    let l2 = Actor::new("L2A", Role::ReadOnlyL2);
    let declined = wf
        .decline(created.id, ApprovalLevel::L2, &l2, Some("incomplete".to_string()))
        .await
        .unwrap();
    assert_eq!(declined.current_approval_status, ApprovalStatus::L2Declined);

    let other = Actor::new("L2B", Role::ReadOnlyL2);
    for result in [
        wf.approve(created.id, ApprovalLevel::L2, &other, Some("late".to_string())).await,
        wf.decline(created.id, ApprovalLevel::L2, &other, Some("late".to_string())).await,
    ] {
        assert!(matches!(result, Err(WorkflowError::State(_))));
    }

    let unchanged = wf.get_by_id(created.id).await.unwrap();
    assert_eq!(unchanged, declined);
}

#[tokio::test]
async fn test_l3_cannot_skip_l2() {
    let wf = workflow().await;
    let created = wf.create(sample_request(), &data_entry("U1")).await.unwrap();

    let l3 = Actor::new("L3A", Role::ReadOnlyL3);
    let err = wf.approve(created.id, ApprovalLevel::L3, &l3, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::State(_)));

    let err = wf.decline(created.id, ApprovalLevel::L3, &l3, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::State(_)));

    let unchanged = wf.get_by_id(created.id).await.unwrap();
    assert_eq!(unchanged.current_approval_status, ApprovalStatus::PendingL2Approval);
    assert!(unchanged.l3_approver_id.is_none());
}

#[tokio::test]
async fn test_data_entry_cannot_review_l3_in_any_state() {
    let wf = workflow().await;
    let pending = wf.create(sample_request(), &data_entry("U1")).await.unwrap();
    let ready = wf.create(sample_request(), &data_entry("U1")).await.unwrap();
    wf.approve(ready.id, ApprovalLevel::L2, &Actor::new("ADM", Role::Admin), None)
        .await
        .unwrap();

    let clerk = data_entry("U1");
    for id in [pending.id, ready.id, 9999] {
        let err = wf.approve(id, ApprovalLevel::L3, &clerk, None).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Authorization(_)), "got {:?}", err);
        let err = wf.decline(id, ApprovalLevel::L3, &clerk, None).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Authorization(_)), "got {:?}", err);
    }

    let still_ready = wf.get_by_id(ready.id).await.unwrap();
    assert_eq!(still_ready.current_approval_status, ApprovalStatus::L2Approved);
}

#[tokio::test]
async fn test_wrong_tier_reviewer_is_rejected() {
    let wf = workflow().await;
    let created = wf.create(sample_request(), &data_entry("U1")).await.unwrap();

    let l3 = Actor::new("L3A", Role::ReadOnlyL3);
    let err = wf.approve(created.id, ApprovalLevel::L2, &l3, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Authorization(_)));

    let l1 = Actor::new("R1", Role::ReadOnlyL1);
    let err = wf.decline(created.id, ApprovalLevel::L2, &l1, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Authorization(_)));
}

#[tokio::test]
async fn test_admin_can_review_both_tiers() {
    let wf = workflow().await;
    let created = wf.create(sample_request(), &Actor::new("ADM", Role::Admin)).await.unwrap();

    let admin = Actor::new("ADM", Role::Admin);
    wf.approve(created.id, ApprovalLevel::L2, &admin, None).await.unwrap();
    let done = wf.approve(created.id, ApprovalLevel::L3, &admin, None).await.unwrap();

    assert_eq!(done.current_approval_status, ApprovalStatus::L3Approved);
    assert_eq!(done.l2_approver_id.as_deref(), Some("ADM"));
    assert_eq!(done.l3_approver_id.as_deref(), Some("ADM"));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let wf = workflow().await;

    assert!(matches!(wf.get_by_id(404).await, Err(WorkflowError::NotFound(_))));

    let l2 = Actor::new("L2A", Role::ReadOnlyL2);
    let err = wf.approve(404, ApprovalLevel::L2, &l2, None).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[tokio::test]
async fn test_create_requires_capable_role_and_requester() {
    let wf = workflow().await;

    for role in [Role::ReadOnlyL1, Role::ReadOnlyL2, Role::ReadOnlyL3] {
        let err = wf.create(sample_request(), &Actor::new("X", role)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Authorization(_)));
    }

    let err = wf.create(sample_request(), &data_entry("  ")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    assert!(wf.list(&Actor::new("ADM", Role::Admin)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_validates_subject_and_rows() {
    let wf = workflow().await;

    let no_subject = CreateRequisitionRequest {
        subject: None,
        project_district: None,
        date_of_requisition: None,
        ..sample_request()
    };
    let err = wf.create(no_subject, &data_entry("U1")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let mut bad_rows = sample_request();
    bad_rows.data_types[0].sl_no = 2;
    let err = wf.create(bad_rows, &data_entry("U1")).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let explicit = CreateRequisitionRequest {
        subject: Some("Well log request".to_string()),
        ..sample_request()
    };
    let created = wf.create(explicit, &data_entry("U1")).await.unwrap();
    assert_eq!(created.subject, "Well log request");
}

#[tokio::test]
async fn test_list_visibility_by_role() {
    let wf = workflow().await;

    let a1 = wf.create(sample_request(), &data_entry("U1")).await.unwrap();
    let b1 = wf.create(sample_request(), &data_entry("U2")).await.unwrap();
    let a2 = wf.create(sample_request(), &data_entry("U1")).await.unwrap();
    let c1 = wf.create(sample_request(), &Actor::new("ADM", Role::Admin)).await.unwrap();

    let ids = |rows: Vec<seismic_catalog_backend::entities::requisitions::Model>| {
        rows.into_iter().map(|r| r.id).collect::<Vec<_>>()
    };

    let all = vec![a1.id, b1.id, a2.id, c1.id];
    assert_eq!(ids(wf.list(&Actor::new("ADM", Role::Admin)).await.unwrap()), all);
    assert_eq!(ids(wf.list(&Actor::new("L2A", Role::ReadOnlyL2)).await.unwrap()), all);
    assert_eq!(ids(wf.list(&Actor::new("L3A", Role::ReadOnlyL3)).await.unwrap()), all);

    assert_eq!(ids(wf.list(&data_entry("U1")).await.unwrap()), vec![a1.id, a2.id]);
    assert_eq!(ids(wf.list(&data_entry("U2")).await.unwrap()), vec![b1.id]);
    assert!(wf.list(&data_entry("U3")).await.unwrap().is_empty());

    assert_eq!(
        ids(wf.list(&Actor::new("U1", Role::ReadOnlyL1)).await.unwrap()),
        vec![a1.id, a2.id]
    );
}

#[tokio::test]
async fn test_get_by_id_is_idempotent() {
    let wf = workflow().await;
    let created = wf.create(sample_request(), &data_entry("U1")).await.unwrap();

    let first = wf.get_by_id(created.id).await.unwrap();
    let second = wf.get_by_id(created.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, created);
}

#[tokio::test]
async fn test_concurrent_l2_reviews_have_one_winner() {
    let wf = workflow().await;
    let created = wf.create(sample_request(), &data_entry("U1")).await.unwrap();

    let first = Actor::new("L2A", Role::ReadOnlyL2);
    let second = Actor::new("L2B", Role::ReadOnlyL2);
    let (a, b) = tokio::join!(
        wf.approve(created.id, ApprovalLevel::L2, &first, Some("first".to_string())),
        wf.decline(created.id, ApprovalLevel::L2, &second, Some("second".to_string())),
    );

    let outcomes = [a.is_ok(), b.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1, "exactly one review must win");

    let loser = if a.is_ok() { b.unwrap_err() } else { a.unwrap_err() };
    assert!(matches!(loser, WorkflowError::State(_)));

    let stored = wf.get_by_id(created.id).await.unwrap();
    match stored.current_approval_status {
        ApprovalStatus::L2Approved => assert_eq!(stored.l2_approver_id.as_deref(), Some("L2A")),
        ApprovalStatus::L2Declined => assert_eq!(stored.l2_approver_id.as_deref(), Some("L2B")),
        other => panic!("unexpected status {:?}", other),
    }
}
