//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user (and optionally the
//! seller role) in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Header HTMX sets on its requests.
const HX_REQUEST: &str = "hx-request";
/// Header telling HTMX to do a full-page navigation.
const HX_REDIRECT: &str = "hx-redirect";

/// Extractor that requires a logged-in user.
///
/// If the user is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Halo, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in seller.
///
/// Anonymous users go to the login page; buyers go back to the home page.
pub struct RequireSeller(pub CurrentUser);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for full page requests).
    RedirectToLogin,
    /// Tell HTMX to navigate to the login page (for fragment requests).
    HtmxRedirectToLogin,
    /// Logged in, but not allowed here.
    Forbidden,
    /// No session layer on this route.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::HtmxRedirectToLogin => (
                StatusCode::UNAUTHORIZED,
                [(HX_REDIRECT, HeaderValue::from_static("/login"))],
            )
                .into_response(),
            Self::Forbidden => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

async fn current_user(parts: &Parts) -> Result<CurrentUser, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| {
            if parts.headers.contains_key(HX_REQUEST) {
                AuthRejection::HtmxRedirectToLogin
            } else {
                AuthRejection::RedirectToLogin
            }
        })
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireSeller
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await?;
        if !user.role.is_seller() {
            tracing::debug!(user = %user.name, "Buyer tried to open the seller dashboard");
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if the user is not logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to set the current user in the session.
///
/// The session ID is cycled first so a pre-login session ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    fn location(response: &Response) -> Option<&str> {
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_rejections() {
        let response = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(location(&response), Some("/login"));

        let response = AuthRejection::Forbidden.into_response();
        assert_eq!(location(&response), Some("/"));

        let response = AuthRejection::HtmxRedirectToLogin.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(HX_REDIRECT).and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }
}
