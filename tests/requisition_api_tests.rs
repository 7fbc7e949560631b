mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{send, test_app};

fn requisition_body() -> Value {
    json!({
        "dateOfRequisition": "2024-05-02",
        "projectDistrict": "Cambay",
        "sheet": "46 B/12",
        "remark": "urgent",
        "dataTypes": [
            {
                "slNo": 1,
                "typeOfData": "3D seismic",
                "slNoRequired": "2",
                "dataObserver": "GP-27",
                "projectObjective": "Reservoir mapping",
                "remarks": "SEG-Y"
            }
        ],
        "slNoData": [
            {
                "slNo": 1,
                "description": "Data custodian",
                "mobileNo": "9876543210",
                "designation": "Chief Geophysicist"
            }
        ],
        "preparedBySignature": "R. Sharma",
        "preparedByDesignation": "Geophysicist"
    })
}

async fn create_as(app: &axum::Router, requester: &str, role: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/requisitions?requester_id={}&user_role={}", requester, role),
        Some(requisition_body()),
    )
    .await
}

#[tokio::test]
async fn test_create_requisition_returns_created_record() {
    let (app, _) = test_app().await;

    let (status, body) = create_as(&app, "U1", "data_entry").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["requester_user_id"], "U1");
    assert_eq!(body["current_approval_status"], "Pending_L2_Approval");
    assert_eq!(body["subject"], "Requisition for Cambay on 2024-05-02");
    assert_eq!(body["projectDistrict"], "Cambay");
    assert_eq!(body["dataTypes"][0]["typeOfData"], "3D seismic");
    assert_eq!(body["slNoData"][0]["mobileNo"], "9876543210");
    assert!(body["l2_approver_id"].is_null());
    assert!(body["l3_approval_date"].is_null());

    let (status, fetched) = send(&app, Method::GET, &format!("/requisitions/{}", body["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_create_requisition_rejects_reviewer_roles() {
    let (app, _) = test_app().await;

    for role in ["read_only_l1", "read_only_l2", "read_only_l3"] {
        let (status, body) = create_as(&app, "R1", role).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "role {}", role);
        assert_eq!(body["code"], "NOT_AUTHORIZED");
    }
}

#[tokio::test]
async fn test_create_requisition_validation() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requisitions?requester_id=U1&user_role=data_entry",
        Some(json!({ "sheet": "46 B/12" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let mut gapped = requisition_body();
    gapped["dataTypes"][0]["slNo"] = json!(5);
    let (status, body) = send(
        &app,
        Method::POST,
        "/requisitions?requester_id=U1&user_role=data_entry",
        Some(gapped),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_requester_without_role_is_forbidden() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/requisitions?requester_id=ghost",
        Some(requisition_body()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_AUTHORIZED");
}

#[tokio::test]
async fn test_unknown_role_is_bad_request() {
    let (app, _) = test_app().await;

    let (status, _) = send(&app, Method::GET, "/requisitions?user_role=superuser&user_id=X", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = create_as(&app, "U1", "superuser").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_is_filtered_by_role() {
    let (app, _) = test_app().await;

    create_as(&app, "U1", "data_entry").await;
    create_as(&app, "U2", "data_entry").await;
    create_as(&app, "U1", "data_entry").await;

    let (status, mine) = send(&app, Method::GET, "/requisitions?user_role=data_entry&user_id=U1", None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r["requester_user_id"] == "U1"));

    let (_, all) = send(&app, Method::GET, "/requisitions?user_role=admin&user_id=ADM", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, l3) = send(&app, Method::GET, "/requisitions?user_role=read_only_l3&user_id=L3A", None).await;
    assert_eq!(l3.as_array().unwrap().len(), 3);

    let (_, none) = send(&app, Method::GET, "/requisitions?user_role=data_entry&user_id=U9", None).await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_review_flow_over_http() {
    let (app, _) = test_app().await;
    let (_, created) = create_as(&app, "U1", "data_entry").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/requisitions/{}/approve_l2?user_role=read_only_l2&user_id=L2A", id),
        Some(json!({ "approver_id": "L2A", "comments": "ok" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Requisition approved at Level 2.");
    assert_eq!(body["requisition"]["current_approval_status"], "L2_Approved");
    assert_eq!(body["requisition"]["l2_approver_id"], "L2A");
    assert_eq!(body["requisition"]["l2_comments"], "ok");
    assert!(body["requisition"]["l2_approval_date"].is_string());

    // data_entry may not act at L3
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/requisitions/{}/approve_l3?user_role=data_entry&user_id=U1", id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_AUTHORIZED");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/requisitions/{}/decline_l3?user_role=read_only_l3&user_id=L3A", id),
        Some(json!({ "comments": "missing data" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Requisition declined at Level 3.");
    assert_eq!(body["requisition"]["current_approval_status"], "L3_Declined");
    assert_eq!(body["requisition"]["l3_approver_id"], "L3A");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/requisitions/{}/approve_l3?user_role=read_only_l3&user_id=L3A", id),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
    assert_eq!(
        body["detail"],
        "Requisition is not pending Level 3 approval. Current status: L3_Declined"
    );
}

#[tokio::test]
async fn test_review_on_missing_requisition_is_not_found() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/requisitions/777/decline_l2?user_role=admin&user_id=ADM",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Requisition form not found.");

    let (status, _) = send(&app, Method::GET, "/requisitions/777", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_approver_id_must_match_user_id() {
    let (app, _) = test_app().await;
    let (_, created) = create_as(&app, "U1", "data_entry").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/requisitions/{}/approve_l2?user_role=read_only_l2&user_id=L2A", id),
        Some(json!({ "approver_id": "someone-else" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, unchanged) = send(&app, Method::GET, &format!("/requisitions/{}", id), None).await;
    assert_eq!(unchanged["current_approval_status"], "Pending_L2_Approval");
}

#[tokio::test]
async fn test_role_check_precedes_approver_id_check() {
    let (app, _) = test_app().await;
    let (_, created) = create_as(&app, "U1", "data_entry").await;
    let id = created["id"].as_i64().unwrap();

    for action in ["approve_l3", "decline_l3"] {
        let (status, body) = send(
            &app,
            Method::PATCH,
            &format!("/requisitions/{}/{}?user_role=data_entry&user_id=U1", id, action),
            Some(json!({ "approver_id": "SOMEONE_ELSE" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", action);
        assert_eq!(body["code"], "NOT_AUTHORIZED");
    }
}
