// src/tests/router_tests/history_tests.rs
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, post_form, session_cookie, test_app};

#[test]
fn history_lists_saved_evaluations() {
    let app = test_app();
    let resp = handle(
        post_form("/evaluate/buy", &[("address", "7 Elm Ave, Austin, TX 78701")], None),
        &app,
    );
    let cookie = session_cookie(&resp);
    let location = header(&resp, "Location").to_string();

    let history = handle(get("/history", Some(&cookie)), &app);
    assert_eq!(history.status(), 200);
    let body = body_string(history);
    assert!(body.contains("7 Elm Ave, Austin, TX 78701"));
    assert!(body.contains(&location));
}

#[test]
fn new_session_sees_empty_history() {
    let app = test_app();
    let body = body_string(handle(get("/history", None), &app));
    assert!(body.contains("Nothing saved yet"));
}

#[test]
fn delete_removes_evaluation() {
    let app = test_app();
    let resp = handle(
        post_form("/evaluate/rent", &[("address", "9 Pine Rd, Denver, CO 80202")], None),
        &app,
    );
    let cookie = session_cookie(&resp);
    let location = header(&resp, "Location").to_string();

    let deleted = handle(
        post_form(&format!("{location}/delete"), &[], Some(&cookie)),
        &app,
    );
    assert_eq!(deleted.status(), 303);
    assert_eq!(header(&deleted, "Location"), "/history");

    let gone = handle(get(&location, Some(&cookie)), &app);
    assert_eq!(gone.status(), 404);
}

#[test]
fn other_session_cannot_delete() {
    let app = test_app();
    let resp = handle(
        post_form("/evaluate/rent", &[("address", "9 Pine Rd, Denver, CO 80202")], None),
        &app,
    );
    let owner = session_cookie(&resp);
    let location = header(&resp, "Location").to_string();

    let attempt = handle(post_form(&format!("{location}/delete"), &[], None), &app);
    assert_eq!(attempt.status(), 404);

    let still_there = handle(get(&location, Some(&owner)), &app);
    assert_eq!(still_there.status(), 200);
}
