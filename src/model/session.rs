//! Session Model
//!
//! Who is signed in and whether the server is reachable. A single profile is
//! fetched once after login and shared by every screen.

use crate::api::{Role, UserProfile};
use crate::logic::errors::ErrorType;

/// Reachability of the API, as seen by the last request
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionState {
    Online,
    Offline {
        error_type: ErrorType,
        message: String,
    },
}

#[derive(Clone, Debug)]
pub struct SessionModel {
    /// Bearer token of the signed-in user
    pub token: Option<String>,

    /// Profile from `/auth/me` (or the login response)
    pub profile: Option<UserProfile>,

    /// A login request is in flight
    pub signing_in: bool,

    pub connection_state: ConnectionState,
}

impl SessionModel {
    pub fn new() -> Self {
        Self {
            token: None,
            profile: None,
            signing_in: false,
            connection_state: ConnectionState::Online,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn sign_in(&mut self, token: String, profile: Option<UserProfile>) {
        self.token = Some(token);
        self.profile = profile;
        self.signing_in = false;
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.profile = None;
        self.signing_in = false;
    }

    pub fn role(&self) -> Role {
        self.profile.as_ref().map(|p| p.role).unwrap_or_default()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.profile.as_ref().map(|p| p.id)
    }

    pub fn display_name(&self) -> &str {
        self.profile.as_ref().map(|p| p.name.as_str()).unwrap_or("-")
    }
}

impl Default for SessionModel {
    fn default() -> Self {
        Self::new()
    }
}
