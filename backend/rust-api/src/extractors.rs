use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;

use crate::config::Config;
use crate::errors::TutorError;

pub const VISITOR_COOKIE_NAME: &str = "visitor_id";

/// JSON body extractor whose rejection is a `TutorError::InvalidInput`,
/// so malformed bodies get the same `{ "error": ... }` shape as everything else.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = TutorError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let message = format!("Failed to parse JSON request body: {}", rejection);
                tracing::warn!("{}", message);
                Err(TutorError::InvalidInput(message))
            }
        }
    }
}

/// The visitor id from the `visitor_id` cookie. Rejects with 401 when absent.
#[derive(Debug, Clone)]
pub struct VisitorId(pub String);

impl<S> FromRequestParts<S> for VisitorId
where
    S: Send + Sync,
{
    type Rejection = TutorError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        match jar.get(VISITOR_COOKIE_NAME).map(|c| c.value().trim()) {
            Some(id) if !id.is_empty() => Ok(VisitorId(id.to_string())),
            _ => Err(TutorError::MissingVisitor),
        }
    }
}

/// 16 random bytes, hex encoded.
pub fn generate_visitor_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

pub fn visitor_cookie(visitor_id: String, config: &Config) -> Cookie<'static> {
    let max_age = i64::try_from(config.session_ttl_seconds).unwrap_or(i64::MAX);

    Cookie::build((VISITOR_COOKIE_NAME, visitor_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Removal cookie; path must match the one used when issuing.
pub fn expired_visitor_cookie() -> Cookie<'static> {
    Cookie::build((VISITOR_COOKIE_NAME, "")).path("/").build()
}
