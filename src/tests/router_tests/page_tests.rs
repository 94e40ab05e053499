// src/tests/router_tests/page_tests.rs
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, test_app};

#[test]
fn home_lists_every_flow() {
    let app = test_app();
    let resp = handle(get("/", None), &app);

    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("text/html"));
    let body = body_string(resp);
    for href in [
        "/evaluate/rent",
        "/evaluate/buy",
        "/evaluate/sell",
        "/evaluate/investment",
    ] {
        assert!(body.contains(href), "home page should link {href}");
    }
}

#[test]
fn first_visit_gets_session_cookie() {
    let app = test_app();
    let resp = handle(get("/", None), &app);

    let cookie = header(&resp, "Set-Cookie");
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[test]
fn returning_visit_keeps_cookie_unset() {
    let app = test_app();
    let first = handle(get("/", None), &app);
    let cookie = crate::tests::utils::session_cookie(&first);

    let second = handle(get("/", Some(&cookie)), &app);
    assert_eq!(header(&second, "Set-Cookie"), "");
}

#[test]
fn evaluate_form_renders_for_known_flow() {
    let app = test_app();
    let resp = handle(get("/evaluate/investment", None), &app);

    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("name=\"listing_url\""));
    assert!(body.contains("name=\"vacancy_rate\""));
}

#[test]
fn unknown_flow_is_not_found() {
    let app = test_app();
    let resp = handle(get("/evaluate/flip", None), &app);
    assert_eq!(resp.status(), 404);
}

#[test]
fn unknown_path_is_not_found() {
    let app = test_app();
    let resp = handle(get("/admin", None), &app);
    assert_eq!(resp.status(), 404);
}

#[test]
fn stylesheet_is_served() {
    let app = test_app();
    let resp = handle(get("/static/main.css", None), &app);

    assert_eq!(resp.status(), 200);
    assert!(header(&resp, "Content-Type").starts_with("text/css"));
    assert!(body_string(resp).contains(".status-bar"));
}
