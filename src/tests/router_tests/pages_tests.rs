use crate::tests::utils::{body_string, get, header, post_form, send_json, test_app};
use http::Method;
use serde_json::json;

#[test]
fn lead_list_renders_and_filters() {
    let app = test_app();
    send_json(&app, Method::POST, "/api/leads", json!({ "name": "Ivy Stone", "status": "Won" }));
    send_json(&app, Method::POST, "/api/leads", json!({ "name": "Jon Reyes" }));

    let body = body_string(get(&app, "/"));
    assert!(body.contains("Ivy Stone"));
    assert!(body.contains("Jon Reyes"));

    let body = body_string(get(&app, "/?status=Won"));
    assert!(body.contains("Ivy Stone"));
    assert!(!body.contains("Jon Reyes"));
}

#[test]
fn form_create_redirects_to_the_lead() {
    let app = test_app();

    let resp = post_form(
        &app,
        "/leads",
        "name=Kai+Moss&phone=&city=Orem&status=Contacted&source=Referral",
    );
    assert_eq!(resp.status(), 302);
    let location = header(&resp, "Location").unwrap();
    assert!(location.starts_with("/leads/"));

    let page = body_string(get(&app, &location));
    assert!(page.contains("Kai Moss"));
    assert!(page.contains("Orem"));
}

#[test]
fn form_create_without_name_rerenders_with_error() {
    let app = test_app();

    let resp = post_form(&app, "/leads", "name=&city=Orem");
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("name is required"));
}

#[test]
fn form_edit_clears_blank_fields() {
    let app = test_app();
    let created = crate::tests::utils::body_json(send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Lu", "phone": "555-0199" }),
    ));
    let id = created["id"].as_i64().unwrap();

    let resp = post_form(&app, &format!("/leads/{id}"), "name=Lu+Chen&phone=&status=Quoted");
    assert_eq!(resp.status(), 302);

    let lead = crate::tests::utils::body_json(get(&app, &format!("/api/leads/{id}")));
    assert_eq!(lead["name"], "Lu Chen");
    assert!(lead["phone"].is_null());
    assert_eq!(lead["status"], "Quoted");
}

#[test]
fn form_delete_redirects_home() {
    let app = test_app();
    let created = crate::tests::utils::body_json(send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Mo" }),
    ));

    let resp = post_form(&app, &format!("/leads/{}/delete", created["id"]), "");
    assert_eq!(header(&resp, "Location").as_deref(), Some("/"));
    assert_eq!(get(&app, &format!("/api/leads/{}", created["id"])).status(), 404);
}

#[test]
fn missing_lead_page_is_html_404() {
    let app = test_app();

    let resp = get(&app, "/leads/777");
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("<html"));
}

#[test]
fn map_embeds_located_leads() {
    let app = test_app();
    send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Ned", "lat": 40.7, "lng": -111.9 }),
    );

    let body = body_string(get(&app, "/map"));
    assert!(body.contains("leaflet"));
    assert!(body.contains("\"name\":\"Ned\""));
}

#[test]
fn prospecting_page_renders_region_checkboxes() {
    let app = test_app();

    let body = body_string(get(&app, "/prospecting"));
    assert!(body.contains("Prospecting"));
    assert!(body.contains("value=\"A\""));
    assert!(body.contains("No prospects found."));
}

#[test]
fn unknown_route_is_404() {
    let app = test_app();
    assert_eq!(get(&app, "/nope").status(), 404);
    assert_eq!(get(&app, "/api/nope").status(), 404);
}

#[test]
fn edit_form_keeps_a_custom_source() {
    let app = test_app();
    let created = crate::tests::utils::body_json(send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Ona", "source": "Instagram" }),
    ));
    let id = created["id"].as_i64().unwrap();

    let page = body_string(get(&app, &format!("/leads/{id}")));
    assert!(page.contains(r#"<option value="Instagram" selected>Instagram</option>"#));

    // what a browser submits for that form after only the status is changed
    let resp = post_form(
        &app,
        &format!("/leads/{id}"),
        "name=Ona&status=Contacted&source=Instagram",
    );
    assert_eq!(resp.status(), 302);

    let lead = crate::tests::utils::body_json(get(&app, &format!("/api/leads/{id}")));
    assert_eq!(lead["source"], "Instagram");
    assert_eq!(lead["status"], "Contacted");
}

#[test]
fn known_source_is_not_duplicated() {
    let app = test_app();
    let created = crate::tests::utils::body_json(send_json(
        &app,
        Method::POST,
        "/api/leads",
        json!({ "name": "Pat", "source": "Referral" }),
    ));

    let page = body_string(get(&app, &format!("/leads/{}", created["id"])));
    assert_eq!(page.matches(r#"value="Referral""#).count(), 1);
    assert!(page.contains(r#"<option value="Referral" selected>"#));
}

#[test]
fn lead_list_shows_pipeline_summary() {
    let app = test_app();
    send_json(&app, Method::POST, "/api/leads", json!({ "name": "Quin", "status": "Won" }));
    send_json(&app, Method::POST, "/api/leads", json!({ "name": "Rae", "status": "Won" }));

    let body = body_string(get(&app, "/"));
    for status in ["New", "Contacted", "Quoted", "Won", "Lost"] {
        assert!(body.contains(&format!("href=\"/?status={status}\"")), "{status}");
    }
    assert!(body.contains("<strong>2</strong>"));
    assert_eq!(body.matches("<strong>0</strong>").count(), 4);
}

#[test]
fn prospecting_form_submits_an_explicit_empty_selection() {
    let app = test_app();

    let body = body_string(get(&app, "/prospecting"));
    assert!(body.contains(r#"<input type="hidden" name="counties" value="">"#));

    // every box unchecked: only the hidden field is sent
    let body = body_string(get(&app, "/prospecting?counties="));
    assert!(!body.contains("checked"));
}
