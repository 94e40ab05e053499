// src/auth/sessions.rs
use astra::Request;
use tracing::debug;

use crate::auth::token::{generate_token_default, hash_token, is_well_formed};

pub const SESSION_COOKIE: &str = "session";

/// One year; history should survive browser restarts.
const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365;

/// The anonymous browser session that owns saved evaluations.
///
/// Only the SHA-256 of the token is ever handed to the database.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    hash: [u8; 32],
    is_new: bool,
}

impl Session {
    /// Picks up the `session` cookie, or starts a new session when it is
    /// missing or not one of ours.
    pub fn from_request(req: &Request) -> Session {
        let existing = req
            .headers()
            .get_all("cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| cookie_value(header, SESSION_COOKIE))
            .filter(|token| is_well_formed(token));

        match existing {
            Some(token) => Session::resume(token),
            None => {
                debug!("starting new session");
                Session::start()
            }
        }
    }

    pub fn start() -> Session {
        let token = generate_token_default();
        Session {
            hash: hash_token(&token),
            token,
            is_new: true,
        }
    }

    pub fn resume(token: &str) -> Session {
        Session {
            token: token.to_string(),
            hash: hash_token(token),
            is_new: false,
        }
    }

    pub fn owner_key(&self) -> &[u8] {
        &self.hash
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// `Set-Cookie` value for sessions created by this request.
    pub fn set_cookie(&self) -> Option<String> {
        self.is_new.then(|| {
            format!(
                "{SESSION_COOKIE}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; HttpOnly; SameSite=Lax",
                self.token
            )
        })
    }
}

/// Value of `name` in a `Cookie:` header (`a=1; b=2`).
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value.trim())
    })
}
