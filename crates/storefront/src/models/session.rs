//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use pusatoleh_core::{Role, UserId};

use crate::api::{AccessToken, LoginResponse};

/// Session-stored user identity.
///
/// Holds the bearer token for the marketplace API. The token never leaves
/// the server: the browser only sees the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's API ID.
    pub id: UserId,
    /// Username shown in the header.
    pub name: String,
    /// Buyer or seller.
    pub role: Role,
    /// API bearer token.
    pub token: AccessToken,
}

impl CurrentUser {
    /// Landing page after login for this user's role.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        if self.role.is_seller() {
            "/dashboard/seller"
        } else {
            "/"
        }
    }
}

impl From<LoginResponse> for CurrentUser {
    fn from(response: LoginResponse) -> Self {
        Self {
            id: response.user.id,
            name: response.user.name,
            role: response.user.role,
            token: response.token,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for pending toast messages.
    pub const FLASHES: &str = "flashes";
}
