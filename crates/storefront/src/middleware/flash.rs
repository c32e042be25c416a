//! One-shot toast messages carried in the session.
//!
//! Handlers push a flash before redirecting; the next rendered page takes
//! every pending flash and shows it as a toast.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::auth::OptionalAuth;
use crate::models::{CurrentUser, session_keys};

/// Toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    /// CSS modifier for the toast.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A pending toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Queue a toast for the next page render.
///
/// A session failure only loses the toast, so it is logged and ignored.
pub async fn flash(session: &Session, kind: FlashKind, message: impl Into<String>) {
    let mut pending: Vec<Flash> = session
        .get(session_keys::FLASHES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    pending.push(Flash::new(kind, message));

    if let Err(e) = session.insert(session_keys::FLASHES, pending).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

/// Remove and return every pending toast.
pub async fn take_flashes(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(session_keys::FLASHES).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        }
    }
}

/// Shared page chrome: the header's login state and the toasts to show.
///
/// Extracting this consumes the pending toasts, so only extract it in
/// handlers that render a full page.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user: Option<CurrentUser>,
    pub flashes: Vec<Flash>,
}

impl Layout {
    /// Add a toast for this render only.
    pub fn push(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flashes.push(Flash::new(kind, message));
    }

    /// Whether the header should show the seller dashboard link.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_seller())
    }
}

impl<S> FromRequestParts<S> for Layout
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalAuth(user) = OptionalAuth::from_request_parts(parts, state).await?;
        let flashes = match parts.extensions.get::<Session>() {
            Some(session) => take_flashes(session).await,
            None => Vec::new(),
        };
        Ok(Self { user, flashes })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flashes_are_taken_once() {
        let session = session();
        flash(&session, FlashKind::Success, "Tersimpan").await;
        flash(&session, FlashKind::Error, "Gagal").await;

        let taken = take_flashes(&session).await;
        assert_eq!(
            taken,
            vec![
                Flash::new(FlashKind::Success, "Tersimpan"),
                Flash::new(FlashKind::Error, "Gagal"),
            ]
        );
        assert!(take_flashes(&session).await.is_empty());
    }

    #[test]
    fn test_flash_kind_serde() {
        assert_eq!(
            serde_json::to_string(&FlashKind::Success).unwrap(),
            r#""success""#
        );
        assert_eq!(FlashKind::Info.as_str(), "info");
    }

    #[test]
    fn test_layout_push() {
        let mut layout = Layout::default();
        layout.push(FlashKind::Info, "Halo");
        assert_eq!(layout.flashes.len(), 1);
        assert!(!layout.is_seller());
    }
}
