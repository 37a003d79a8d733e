//! Per-client session resolution.
//!
//! Clients are identified by a cookie (or the `x-rem-session` header for
//! clients without a cookie jar). Every API request runs inside a session;
//! a session is initialized with the default datasets on its first request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use rem_session::{Session, SessionId};

use crate::error::ServerError;
use crate::state::AppState;

/// Header carrying the session id, accepted on requests and always set on
/// API responses.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("x-rem-session");

/// The session a request runs in, placed in request extensions.
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Arc<Session>);

/// Resolve or open the client's session and make sure it is initialized.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    state
        .sessions
        .prune_idle(state.config.session_idle(), Utc::now());

    let requested = requested_session(request.headers(), &state.config.cookie_name);
    let (session, created) = state.sessions.get_or_create(requested);

    {
        let store = session.lock().await;
        if !state.engine.has_dataset(&*store) {
            if let Err(e) = state.engine.init(&*store) {
                return ServerError::from(e).into_response();
            }
        }
    }

    request
        .extensions_mut()
        .insert(CurrentSession(Arc::clone(&session)));
    let mut response = next.run(request).await;

    let id = session.id().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    if created {
        let cookie = format!(
            "{}={id}; Path=/; HttpOnly; SameSite=Lax",
            state.config.cookie_name
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "cannot encode session cookie"),
        }
    }
    response
}

/// Session id the client presented: the header first, then the cookie.
pub fn requested_session(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    let from_header = headers
        .get(&SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok());
    from_header.or_else(|| cookie_value(headers, cookie_name).and_then(|v| v.parse().ok()))
}

/// Value of the first cookie called `name` across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
