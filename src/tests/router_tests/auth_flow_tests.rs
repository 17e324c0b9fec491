use crate::router::serve;
use crate::tests::utils::{body_string, header, test_app, TEST_PASSWORD, TEST_USERNAME};
use astra::Body;
use http::{Method, Request};

fn anonymous(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[test]
fn login_page_loads_successfully() {
    let app = test_app();

    let resp = serve(anonymous(Method::GET, "/login", ""), &app);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("form"));
    assert!(!body.contains("Invalid username"));
}

#[test]
fn pages_redirect_to_login_without_session() {
    let app = test_app();

    for uri in ["/", "/map", "/prospecting", "/leads/new"] {
        let resp = serve(anonymous(Method::GET, uri, ""), &app);
        assert_eq!(resp.status(), 302, "{uri}");
        assert_eq!(header(&resp, "Location").as_deref(), Some("/login"));
    }
}

#[test]
fn api_answers_401_without_session() {
    let app = test_app();

    let resp = serve(anonymous(Method::GET, "/api/leads", ""), &app);
    assert_eq!(resp.status(), 401);
    assert!(body_string(resp).contains("\"error\""));
}

#[test]
fn forged_cookie_is_rejected() {
    let app = test_app();

    let req = Request::builder()
        .uri("/api/leads")
        .header("Cookie", "crm_session=authenticated")
        .body(Body::empty())
        .unwrap();
    assert_eq!(serve(req, &app).status(), 401);
}

#[test]
fn correct_credentials_set_a_working_session() {
    let app = test_app();

    let form = format!("username={TEST_USERNAME}&password={TEST_PASSWORD}");
    let resp = serve(anonymous(Method::POST, "/login", &form), &app);
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location").as_deref(), Some("/"));

    let set_cookie = header(&resp, "Set-Cookie").expect("session cookie");
    assert!(set_cookie.contains("HttpOnly"));
    let pair = set_cookie.split(';').next().unwrap().to_string();

    let req = Request::builder()
        .uri("/api/leads")
        .header("Cookie", pair)
        .body(Body::empty())
        .unwrap();
    assert_eq!(serve(req, &app).status(), 200);
}

#[test]
fn wrong_password_goes_back_to_login() {
    let app = test_app();

    let form = format!("username={TEST_USERNAME}&password=nope");
    let resp = serve(anonymous(Method::POST, "/login", &form), &app);
    assert_eq!(resp.status(), 302);
    assert_eq!(header(&resp, "Location").as_deref(), Some("/login?error=1"));
    assert!(header(&resp, "Set-Cookie").is_none());

    let page = body_string(serve(anonymous(Method::GET, "/login?error=1", ""), &app));
    assert!(page.contains("Invalid username or password."));
}

#[test]
fn logout_clears_cookie() {
    let app = test_app();

    let resp = crate::tests::utils::send(
        &app,
        Method::POST,
        "/logout",
        Body::empty(),
        "text/plain",
    );
    assert_eq!(resp.status(), 302);
    assert!(header(&resp, "Set-Cookie").unwrap().contains("Max-Age=0"));
}
