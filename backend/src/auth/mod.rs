//! Caller identity.
//!
//! Requests carry an `Authorization: Bearer <token>` header. An
//! [`IdentityProvider`] maps the token to a [`CurrentUser`], whose completed
//! courses drive eligibility checks.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::UserSettings;
use crate::models::normalize_code;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format")]
    InvalidFormat,

    #[error("Invalid Bearer token")]
    InvalidToken,
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    /// Course codes the user has finished, possibly empty
    #[serde(default)]
    pub completed_courses: Vec<String>,
}

impl CurrentUser {
    pub fn new(id: impl Into<String>, completed_courses: Vec<String>) -> Self {
        Self {
            id: id.into(),
            completed_courses,
        }
    }
}

/// Extract the token from an `Authorization` header value.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidFormat)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }
    Ok(token)
}

/// Resolves bearer tokens to users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<CurrentUser, AuthError>;
}

/// Fixed token table, loaded from `[[auth.users]]`.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    users: RwLock<HashMap<String, CurrentUser>>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(users: &[UserSettings]) -> Self {
        let provider = Self::new();
        for user in users {
            provider.insert(
                user.token.clone(),
                CurrentUser::new(user.id.clone(), user.completed_courses.clone()),
            );
        }
        provider
    }

    /// Register `user` under `token`; completed course codes are normalised.
    pub fn insert(&self, token: impl Into<String>, mut user: CurrentUser) {
        user.completed_courses = user
            .completed_courses
            .iter()
            .map(|c| normalize_code(c))
            .filter(|c| !c.is_empty())
            .collect();
        self.users.write().insert(token.into(), user);
    }

    pub fn with_user(self, token: impl Into<String>, user: CurrentUser) -> Self {
        self.insert(token, user);
        self
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn resolve(&self, token: &str) -> Result<CurrentUser, AuthError> {
        self.users
            .read()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
