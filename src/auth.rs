//! Token authentication seam. The HTTP layer only needs "is this token valid, and for whom".

use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashSet;

/// Identity attached to an authenticated request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Principal, AppError>;
}

/// Accepts a fixed set of tokens (from `API_TOKENS`).
#[derive(Clone, Debug, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashSet<String>,
}

impl StaticTokenAuthenticator {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticTokenAuthenticator {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        if self.tokens.contains(token) {
            // Log-safe subject: never echo the whole token.
            let prefix: String = token.chars().take(4).collect();
            Ok(Principal {
                subject: format!("token:{}...", prefix),
            })
        } else {
            Err(AppError::Unauthorized("invalid token".into()))
        }
    }
}
