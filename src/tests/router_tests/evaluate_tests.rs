// src/tests/router_tests/evaluate_tests.rs
use crate::router::handle;
use crate::tests::utils::{body_string, get, header, post_form, session_cookie, test_app};

const ADDRESS: &str = "12 Oak Street, Springfield, IL 62701";

#[test]
fn post_evaluation_redirects_to_saved_result() {
    let app = test_app();
    let resp = handle(
        post_form("/evaluate/rent", &[("address", ADDRESS)], None),
        &app,
    );

    assert_eq!(resp.status(), 303);
    let location = header(&resp, "Location").to_string();
    assert!(location.starts_with("/evaluations/"));
    let cookie = session_cookie(&resp);
    assert!(cookie.starts_with("session="));

    let page = handle(get(&location, Some(&cookie)), &app);
    assert_eq!(page.status(), 200);
    let body = body_string(page);
    assert!(body.contains(ADDRESS));
    assert!(body.contains("Limited market data"));
    assert!(body.contains("Analysis Summary"));
}

#[test]
fn investment_evaluation_shows_return_metrics() {
    let app = test_app();
    let resp = handle(
        post_form(
            "/evaluate/investment",
            &[
                ("address", ADDRESS),
                ("interest_rate", "6.5"),
                ("down_payment_pct", "25"),
                ("loan_term_years", "30"),
            ],
            None,
        ),
        &app,
    );
    assert_eq!(resp.status(), 303);

    let location = header(&resp, "Location").to_string();
    let cookie = session_cookie(&resp);
    let body = body_string(handle(get(&location, Some(&cookie)), &app));
    assert!(body.contains("Cap Rate"));
    assert!(body.contains("Cash-on-Cash"));
}

#[test]
fn empty_form_is_bad_request() {
    let app = test_app();
    let resp = handle(
        post_form("/evaluate/buy", &[("address", "   ")], None),
        &app,
    );

    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("listing URL or a property address"));
}

#[test]
fn bad_loan_term_is_bad_request() {
    let app = test_app();
    let resp = handle(
        post_form(
            "/evaluate/buy",
            &[("address", ADDRESS), ("loan_term_years", "12.5")],
            None,
        ),
        &app,
    );
    assert_eq!(resp.status(), 400);
}

#[test]
fn result_is_hidden_from_other_sessions() {
    let app = test_app();
    let resp = handle(
        post_form("/evaluate/sell", &[("address", ADDRESS)], None),
        &app,
    );
    let location = header(&resp, "Location").to_string();

    let stranger = handle(get(&location, None), &app);
    assert_eq!(stranger.status(), 404);
}
