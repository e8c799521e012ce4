use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClientResult, RequestValidationError};
use crate::tokens::Token;
use crate::utils::constants::TOKEN_API_VERSION;

/// Token protocol payload, borrowed from the builder that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPayload<'a> {
    #[serde(rename = "tokenApiVersion")]
    pub token_api_version: &'static str,
    pub tokens: Vec<&'a Token>,
}

/// Collects tokens for one request; insertion order is wire order.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    tokens: Vec<Token>,
}

impl RequestBuilder {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Build the payload, or fail with every invalid token reported at once.
    pub fn build(&self) -> Result<TokenPayload<'_>, RequestValidationError> {
        let mut payload = TokenPayload {
            token_api_version: TOKEN_API_VERSION,
            tokens: Vec::with_capacity(self.tokens.len()),
        };
        let mut errors: Vec<String> = Vec::new();

        for (index, token) in self.tokens.iter().enumerate() {
            if token.is_valid() {
                payload.tokens.push(token);
            } else {
                errors.push(format!("token {}: {}", index + 1, token.errors().join(", ")));
            }
        }

        if !errors.is_empty() {
            warn!(invalid = errors.len(), total = self.tokens.len(), "token request rejected");
            return Err(RequestValidationError::new(errors));
        }

        debug!(tokens = payload.tokens.len(), "token payload built");
        Ok(payload)
    }

    pub fn to_json(&self) -> ClientResult<String> {
        let payload = self.build()?;
        Ok(serde_json::to_string(&payload)?)
    }
}
