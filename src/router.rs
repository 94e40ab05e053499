use crate::app::App;
use crate::auth::Session;
use crate::db::evaluations::{
    delete_evaluation, get_evaluation, list_evaluations_for_session, save_evaluation,
};
use crate::domain::Flow;
use crate::errors::ServerError;
use crate::pipeline::{EvaluationRequest, Evaluator};
use crate::responses::{css_response, error_response, html_response, see_other, ResultResp};
use crate::templates::pages;
use astra::{Request, Response};
use chrono::Utc;
use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info};

const MAIN_CSS: &str = include_str!("../static/main.css");

/// Largest form body we are willing to read.
const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Routes one request. Failures become HTML error pages, and a session
/// cookie is attached whenever this request started a new session.
pub fn handle(req: Request, app: &App) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let session = Session::from_request(&req);

    let mut resp = route(req, app, &session, &method, &path).unwrap_or_else(error_response);

    if let Some(cookie) = session.set_cookie() {
        if let Ok(value) = cookie.parse() {
            resp.headers_mut().insert("Set-Cookie", value);
        }
    }

    debug!(%method, %path, status = resp.status().as_u16(), elapsed = ?start.elapsed(), "request");
    resp
}

fn route(req: Request, app: &App, session: &Session, method: &str, path: &str) -> ResultResp {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method, segments.as_slice()) {
        ("GET", []) => html_response(pages::home_page()),

        ("GET", ["static", "main.css"]) => css_response(MAIN_CSS),

        ("GET", ["evaluate", flow]) => html_response(pages::evaluate_page(parse_flow(flow)?)),

        ("POST", ["evaluate", flow]) => {
            let flow = parse_flow(flow)?;
            let form = read_form(req)?;
            let request = EvaluationRequest::from_form(flow, &form)?;

            let record = Evaluator::new(&app.services).evaluate(&request, Utc::now())?;
            app.db
                .with_conn(|conn| save_evaluation(conn, session.owner_key(), &record))?;

            see_other(&format!("/evaluations/{}", record.id))
        }

        ("GET", ["evaluations", id]) => {
            let record = app
                .db
                .with_conn(|conn| get_evaluation(conn, session.owner_key(), id))?
                .ok_or(ServerError::NotFound)?;
            html_response(pages::result_page(&record))
        }

        ("POST", ["evaluations", id, "delete"]) => {
            let deleted = app
                .db
                .with_conn(|conn| delete_evaluation(conn, session.owner_key(), id))?;
            if !deleted {
                return Err(ServerError::NotFound);
            }
            info!(%id, "evaluation removed by owner");
            see_other("/history")
        }

        ("GET", ["history"]) => {
            let rows = app
                .db
                .with_conn(|conn| list_evaluations_for_session(conn, session.owner_key()))?;
            html_response(pages::history_page(&rows))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn parse_flow(slug: &str) -> Result<Flow, ServerError> {
    Flow::from_slug(slug).ok_or(ServerError::NotFound)
}

/// Decodes an `application/x-www-form-urlencoded` body.
fn read_form(req: Request) -> Result<HashMap<String, String>, ServerError> {
    let mut bytes = Vec::new();
    req.into_body()
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("Could not read form: {e}")))?;

    Ok(url::form_urlencoded::parse(&bytes).into_owned().collect())
}
