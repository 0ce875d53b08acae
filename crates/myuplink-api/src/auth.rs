// Bearer token plumbing
//
// The OAuth2 authorization-code flow and token storage live outside this
// crate. The client only asks a `TokenProvider` for a currently valid access
// token before every request; refreshing a stale token is the provider's job.

use std::future;

use futures_util::future::BoxFuture;
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Source of OAuth2 bearer tokens.
///
/// Implementations may suspend to refresh an expired token. Returning an
/// error aborts the request with [`Error::Token`].
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>>;
}

/// A fixed access token, for CLIs and tests.
///
/// Never refreshes: once the token expires every call fails with
/// [`Error::Authentication`].
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>> {
        let result = if self.token.expose_secret().trim().is_empty() {
            Err(Error::Token {
                message: "access token is empty".into(),
            })
        } else {
            Ok(self.token.clone())
        };
        Box::pin(future::ready(result))
    }
}

/// Format the `authorization` header value for a token.
pub(crate) fn bearer(token: &SecretString) -> String {
    format!("Bearer {}", token.expose_secret())
}
