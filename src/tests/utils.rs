// src/tests/utils.rs
use crate::app::{App, Services};
use crate::db::{init_db, Database};
use crate::narrative::HeuristicNarrator;
use crate::providers::OfflineProvider;
use crate::scraper::ListingScraper;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh on-disk database per test, built from the production schema.
pub fn init_test_db() -> Database {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!("router_test_{nanos}_{n}.sqlite"));

    let db = Database::new(path);
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

/// App wired to offline collaborators, so no test touches the network.
pub fn test_app() -> App {
    let services = Services::new(
        Box::new(OfflineProvider),
        Box::new(HeuristicNarrator),
        ListingScraper::new(Duration::from_secs(1)).unwrap(),
        10,
    );
    App::new(init_test_db(), services)
}

pub fn get(path: &str, cookie: Option<&str>) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = path.parse().unwrap();
    if let Some(cookie) = cookie {
        req.headers_mut().insert("cookie", cookie.parse().unwrap());
    }
    req
}

pub fn post_form(path: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();

    let mut req = Request::new(Body::from(body));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = path.parse().unwrap();
    req.headers_mut().insert(
        "content-type",
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    if let Some(cookie) = cookie {
        req.headers_mut().insert("cookie", cookie.parse().unwrap());
    }
    req
}

pub fn header<'a>(resp: &'a Response, name: &str) -> &'a str {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// `session=...` pair from a `Set-Cookie` header, ready to send back.
pub fn session_cookie(resp: &Response) -> String {
    header(resp, "Set-Cookie")
        .split(';')
        .next()
        .unwrap_or("")
        .to_string()
}

pub fn body_string(resp: Response) -> String {
    let mut out = String::new();
    resp.into_body()
        .reader()
        .read_to_string(&mut out)
        .unwrap();
    out
}
