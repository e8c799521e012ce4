use serde::{Deserialize, Serialize};

/// Options shared by the `hmac` and `rsa` tokens.
///
/// Values are kept as raw strings so that an unsupported algorithm or encoding
/// can still be represented and reported by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_to_sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl SigningOptions {
    pub fn new(algorithm: &str, secret_name: &str, string_to_sign: &str, encoding: &str) -> Self {
        Self {
            algorithm: Some(algorithm.to_owned()),
            secret_name: Some(secret_name.to_owned()),
            string_to_sign: Some(string_to_sign.to_owned()),
            encoding: Some(encoding.to_owned()),
        }
    }
}

/// Options for the `sha1` token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sha1Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Secrets interpolated into `text` before hashing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<NestedToken>>,
}

impl Sha1Options {
    pub fn new(text: &str, encoding: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            encoding: Some(encoding.to_owned()),
            tokens: None,
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<NestedToken>) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

/// Entry of the sha1 `tokens` array. Only `secret` entries are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedToken {
    pub name: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl NestedToken {
    pub fn secret(name: &str, path: &str) -> Self {
        Self {
            name: name.to_owned(),
            token_type: "secret".to_owned(),
            path: Some(path.to_owned()),
        }
    }

    pub fn is_valid_secret(&self) -> bool {
        self.token_type == "secret" && self.path.as_deref().is_some_and(|p| !p.is_empty())
    }
}
