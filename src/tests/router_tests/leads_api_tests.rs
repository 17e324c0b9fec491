use crate::tests::utils::{
    body_json, get, send, send_json, test_app, test_app_with, CountingGeocoder, FakeParcels,
};
use astra::Body;
use http::Method;
use serde_json::json;
use std::sync::Arc;

#[test]
fn create_defaults_status_to_new() {
    let app = test_app();

    let resp = send_json(&app, Method::POST, "/api/leads", json!({ "name": "Ada Park" }));
    assert_eq!(resp.status(), 201);

    let lead = body_json(resp);
    assert_eq!(lead["name"], "Ada Park");
    assert_eq!(lead["status"], "New");
    assert!(lead["id"].as_i64().unwrap() > 0);
    assert!(lead["created_at"].is_string());
}

#[test]
fn create_keeps_given_status() {
    let app = test_app();

    let resp = send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Bo Grant", "status": "Quoted" }),
    );
    assert_eq!(body_json(resp)["status"], "Quoted");
}

#[test]
fn create_without_name_is_rejected() {
    let app = test_app();

    let resp = send_json(&app, Method::POST, "/api/leads", json!({ "name": "   " }));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["error"], "name is required");

    let list = body_json(get(&app, "/api/leads"));
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[test]
fn malformed_json_is_a_bad_request() {
    let app = test_app();

    let resp = send(
        &app,
        Method::POST,
        "/api/leads",
        Body::from("{not json".to_string()),
        "application/json",
    );
    assert_eq!(resp.status(), 400);
    assert!(body_json(resp)["error"].is_string());
}

#[test]
fn create_geocodes_address_and_city() {
    let geocoder = CountingGeocoder::answering(40.5, -111.8);
    let app = test_app_with(geocoder.clone(), Arc::new(FakeParcels::default()));

    let lead = body_json(send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Cy", "address": "1 Main St", "city": "Provo" }),
    ));

    assert_eq!(geocoder.calls(), 1);
    assert_eq!(lead["lat"], 40.5);
    assert_eq!(lead["lng"], -111.8);
}

#[test]
fn update_merges_fields() {
    let app = test_app();
    let created = body_json(send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Dee", "phone": "555-0100", "notes": "call back" }),
    ));
    let id = created["id"].as_i64().unwrap();

    let resp = send_json(
        &app,
        Method::PUT,
        &format!("/api/leads/{id}"),
        json!({ "status": "Contacted", "notes": null }),
    );
    assert_eq!(resp.status(), 200);

    let updated = body_json(resp);
    assert_eq!(updated["name"], "Dee");
    assert_eq!(updated["phone"], "555-0100");
    assert_eq!(updated["status"], "Contacted");
    assert!(updated["notes"].is_null());
}

#[test]
fn get_missing_lead_is_404_json() {
    let app = test_app();

    let resp = get(&app, "/api/leads/999");
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp), json!({ "error": "Not found" }));
}

#[test]
fn delete_removes_and_then_404s() {
    let app = test_app();
    let created = body_json(send_json(&app, Method::POST, "/api/leads", json!({ "name": "Eve" })));
    let uri = format!("/api/leads/{}", created["id"]);

    let resp = send(&app, Method::DELETE, &uri, Body::empty(), "application/json");
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp), json!({ "success": true }));

    let again = send(&app, Method::DELETE, &uri, Body::empty(), "application/json");
    assert_eq!(again.status(), 404);
}

#[test]
fn delete_of_missing_id_leaves_store_unchanged() {
    let app = test_app();
    send_json(&app, Method::POST, "/api/leads", json!({ "name": "Keep me" }));

    let resp = send(&app, Method::DELETE, "/api/leads/4242", Body::empty(), "application/json");
    assert_eq!(resp.status(), 404);

    let list = body_json(get(&app, "/api/leads"));
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn list_filters_by_search_and_status() {
    let app = test_app();
    for (name, city, status) in [
        ("Fay", "Ogden", "New"),
        ("Gus", "Provo", "Won"),
        ("Hal", "Ogden", "Won"),
    ] {
        send_json(
            &app,
            Method::POST,
            "/api/leads",
            json!({ "name": name, "city": city, "status": status }),
        );
    }

    let ogden = body_json(get(&app, "/api/leads?search=ogd"));
    assert_eq!(ogden.as_array().unwrap().len(), 2);

    let won_in_ogden = body_json(get(&app, "/api/leads?search=Ogden&status=Won"));
    let names: Vec<&str> = won_in_ogden
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Hal"]);

    // empty filters mean "no filter"
    let all = body_json(get(&app, "/api/leads?search=&status="));
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[test]
fn list_is_newest_first() {
    let app = test_app();
    for name in ["first", "second", "third"] {
        send_json(&app, Method::POST, "/api/leads", json!({ "name": name }));
    }

    let list = body_json(get(&app, "/api/leads"));
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    // same-second inserts fall back to id order
    assert_eq!(names, ["third", "second", "first"]);
}

#[test]
fn reverse_geocode_endpoint() {
    let app = test_app();

    let found = body_json(get(&app, "/api/geocode/reverse?lat=40.1&lng=-111.2"));
    assert_eq!(found["address"], "10 Test St");
    assert_eq!(found["city"], "Testville");

    let resp = get(&app, "/api/geocode/reverse?lat=north");
    assert_eq!(resp.status(), 400);
}
