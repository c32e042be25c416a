//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (fill in the span field, echo the header)
//! 4. Security headers (CSP, frame options, cache control)
//! 5. Session layer (tower-sessions with in-memory store)
//!
//! Authentication is done per handler with the extractors in [`auth`].

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, RequireSeller, clear_current_user, set_current_user};
pub use flash::{Flash, FlashKind, Layout, flash, take_flashes};
pub use request_id::request_id_middleware;
pub use security_headers::{SecurityHeaders, security_headers_middleware};
pub use session::create_session_layer;
