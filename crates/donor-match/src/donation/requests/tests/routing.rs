use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("encodes")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

fn create_payload(requester: &str) -> Value {
    serde_json::to_value(submission(requester)).expect("encodes")
}

async fn create_request(router: &axum::Router, payload: &Value) -> Value {
    let response = router
        .clone()
        .oneshot(post_json("/api/v1/requests", payload))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::CREATED);
    read_json_body(response).await
}

#[tokio::test]
async fn create_route_returns_the_stored_request() {
    let (router, _, _) = board_router();

    let body = create_request(&router, &create_payload("requester-1")).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["patient_blood_type"], "A+");
    assert_eq!(body["contact_phone"], "+525512345678");
    assert!(body["id"].as_str().expect("id assigned").starts_with("req-"));
}

#[tokio::test]
async fn create_route_maps_quota_to_conflict() {
    let (router, _, _) = board_router();
    let payload = create_payload("requester-1");

    for _ in 0..3 {
        create_request(&router, &payload).await;
    }

    let response = router
        .clone()
        .oneshot(post_json("/api/v1/requests", &payload))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "quota_exceeded");
}

#[tokio::test]
async fn create_route_maps_validation_to_unprocessable() {
    let (router, _, _) = board_router();
    let mut payload = create_payload("requester-1");
    payload["units_needed"] = json!(0);

    let response = router
        .clone()
        .oneshot(post_json("/api/v1/requests", &payload))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["code"], "invalid_submission");
}

#[tokio::test]
async fn discover_route_orders_compatible_requests() {
    let (router, _, _) = board_router();

    let mut low = create_payload("requester-1");
    low["urgency"] = json!("low");
    create_request(&router, &low).await;

    let mut urgent = create_payload("requester-1");
    urgent["urgency"] = json!("urgent");
    let urgent_body = create_request(&router, &urgent).await;

    let response = router
        .clone()
        .oneshot(get(
            "/api/v1/requests/open?blood_type=O-&lat=19.4326&lng=-99.1332",
        ))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::OK);

    let body = read_json_body(response).await;
    let open = body.as_array().expect("list");
    assert_eq!(open.len(), 2);
    assert_eq!(open[0]["id"], urgent_body["id"]);
    assert_eq!(open[0]["slots_remaining"], 5);
    assert!(open[0]["distance_label"].as_str().is_some());
}

#[tokio::test]
async fn discover_route_filters_incompatible_donors() {
    let (router, _, _) = board_router();
    create_request(&router, &create_payload("requester-1")).await; // A+ patient

    let response = router
        .clone()
        .oneshot(get("/api/v1/requests/open?blood_type=B-"))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::OK);
    let body = read_json_body(response).await;
    assert!(body.as_array().expect("list").is_empty());
}

#[tokio::test]
async fn respond_route_enforces_duplicates_and_capacity() {
    let (router, _, _) = board_router();

    let mut payload = create_payload("requester-1");
    payload["max_responses"] = json!(1);
    let request = create_request(&router, &payload).await;
    let respond_uri = format!(
        "/api/v1/requests/{}/responses",
        request["id"].as_str().expect("id")
    );

    let first = router
        .clone()
        .oneshot(post_json(
            &respond_uri,
            &json!({ "donor_id": "donor-1", "message": "On my way" }),
        ))
        .await
        .expect("route executes");
    assert_status(&first, StatusCode::CREATED);
    let first_body = read_json_body(first).await;
    assert_eq!(first_body["status"], "interested");

    let duplicate = router
        .clone()
        .oneshot(post_json(&respond_uri, &json!({ "donor_id": "donor-1" })))
        .await
        .expect("route executes");
    assert_status(&duplicate, StatusCode::CONFLICT);
    assert_eq!(read_json_body(duplicate).await["code"], "duplicate_response");

    let over_capacity = router
        .clone()
        .oneshot(post_json(&respond_uri, &json!({ "donor_id": "donor-2" })))
        .await
        .expect("route executes");
    assert_status(&over_capacity, StatusCode::CONFLICT);
    assert_eq!(
        read_json_body(over_capacity).await["code"],
        "capacity_reached"
    );
}

#[tokio::test]
async fn status_route_rejects_non_owners() {
    let (router, _, _) = board_router();
    let request = create_request(&router, &create_payload("requester-1")).await;
    let status_uri = format!(
        "/api/v1/requests/{}/status",
        request["id"].as_str().expect("id")
    );

    let response = router
        .clone()
        .oneshot(post_json(
            &status_uri,
            &json!({ "requester_id": "requester-2", "status": "cancelled" }),
        ))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::FORBIDDEN);

    let allowed = router
        .clone()
        .oneshot(post_json(
            &status_uri,
            &json!({ "requester_id": "requester-1", "status": "cancelled" }),
        ))
        .await
        .expect("route executes");
    assert_status(&allowed, StatusCode::OK);
    assert_eq!(read_json_body(allowed).await["status"], "cancelled");
}

#[tokio::test]
async fn status_route_returns_not_found_for_unknown_requests() {
    let (router, _, _) = board_router();

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/requests/req-999999/status",
            &json!({ "requester_id": "requester-1", "status": "fulfilled" }),
        ))
        .await
        .expect("route executes");
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn overview_routes_expose_dashboards() {
    let (router, _, _) = board_router();
    let request = create_request(&router, &create_payload("requester-1")).await;
    let respond_uri = format!(
        "/api/v1/requests/{}/responses",
        request["id"].as_str().expect("id")
    );
    let created = router
        .clone()
        .oneshot(post_json(&respond_uri, &json!({ "donor_id": "donor-1" })))
        .await
        .expect("route executes");
    assert_status(&created, StatusCode::CREATED);

    let requester_view = router
        .clone()
        .oneshot(get("/api/v1/requesters/requester-1/requests"))
        .await
        .expect("route executes");
    assert_status(&requester_view, StatusCode::OK);
    let body = read_json_body(requester_view).await;
    assert_eq!(body["active"].as_array().expect("active list").len(), 1);
    assert_eq!(body["active"][0]["response_count"], 1);

    let donor_view = router
        .clone()
        .oneshot(get("/api/v1/donors/donor-1/responses"))
        .await
        .expect("route executes");
    assert_status(&donor_view, StatusCode::OK);
    let body = read_json_body(donor_view).await;
    assert_eq!(body["responded"], 1);
    assert_eq!(body["completed"], 0);

    let listing = router
        .clone()
        .oneshot(get(&format!("{respond_uri}?requester_id=requester-1")))
        .await
        .expect("route executes");
    assert_status(&listing, StatusCode::OK);

    let forbidden = router
        .clone()
        .oneshot(get(&format!("{respond_uri}?requester_id=requester-2")))
        .await
        .expect("route executes");
    assert_status(&forbidden, StatusCode::FORBIDDEN);
}
