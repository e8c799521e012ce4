use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::tokens::options::{Sha1Options, SigningOptions};
use crate::tokens::validator;

/// Wire tags of the supported token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Replace,
    ReplaceLarge,
    Secret,
    Hmac,
    Rsa,
    Sha1,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            TokenType::Replace => "replace",
            TokenType::ReplaceLarge => "replaceLarge",
            TokenType::Secret => "secret",
            TokenType::Hmac => "hmac",
            TokenType::Rsa => "rsa",
            TokenType::Sha1 => "sha1",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific payload of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Replace { value: Option<String> },
    ReplaceLarge { value: Option<String> },
    Secret { path: Option<String> },
    Hmac { options: SigningOptions },
    Rsa { options: SigningOptions },
    Sha1 { options: Sha1Options },
}

impl TokenKind {
    pub fn token_type(&self) -> TokenType {
        match self {
            TokenKind::Replace { .. } => TokenType::Replace,
            TokenKind::ReplaceLarge { .. } => TokenType::ReplaceLarge,
            TokenKind::Secret { .. } => TokenType::Secret,
            TokenKind::Hmac { .. } => TokenType::Hmac,
            TokenKind::Rsa { .. } => TokenType::Rsa,
            TokenKind::Sha1 { .. } => TokenType::Sha1,
        }
    }
}

/// Attributes shared by every token type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBase {
    pub name: Option<String>,
    /// used by the cache key instead of the real value
    pub cache_override: Option<String>,
    /// excludes the token from the cache key entirely
    pub skip_cache: bool,
}

impl TokenBase {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_owned()),
            ..Self::default()
        }
    }

    pub fn cache_override(mut self, cache_override: &str) -> Self {
        self.cache_override = Some(cache_override.to_owned());
        self
    }

    pub fn skip_cache(mut self, skip_cache: bool) -> Self {
        self.skip_cache = skip_cache;
        self
    }
}

/// A single placeholder substitution resolved by the remote service.
///
/// Validation runs once in [`Token::new`]; the resulting errors are stored with
/// the token and never recomputed. A token with a non-empty error list cannot be
/// sent, and neither can any request containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    base: TokenBase,
    kind: TokenKind,
    errors: Vec<String>,
}

impl Token {
    pub fn new(base: TokenBase, kind: TokenKind) -> Self {
        let errors = validator::validate(&base, &kind);
        Self { base, kind, errors }
    }

    pub fn replace(base: TokenBase, value: impl Into<String>) -> Self {
        Self::new(base, TokenKind::Replace { value: Some(value.into()) })
    }

    pub fn replace_large(base: TokenBase, value: impl Into<String>) -> Self {
        Self::new(base, TokenKind::ReplaceLarge { value: Some(value.into()) })
    }

    pub fn secret(base: TokenBase, path: impl Into<String>) -> Self {
        Self::new(base, TokenKind::Secret { path: Some(path.into()) })
    }

    pub fn hmac(base: TokenBase, options: SigningOptions) -> Self {
        Self::new(base, TokenKind::Hmac { options })
    }

    pub fn rsa(base: TokenBase, options: SigningOptions) -> Self {
        Self::new(base, TokenKind::Rsa { options })
    }

    pub fn sha1(base: TokenBase, options: Sha1Options) -> Self {
        Self::new(base, TokenKind::Sha1 { options })
    }

    pub fn name(&self) -> Option<&str> {
        self.base.name.as_deref()
    }

    pub fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    pub fn cache_override(&self) -> Option<&str> {
        self.base.cache_override.as_deref()
    }

    pub fn skip_cache(&self) -> bool {
        self.base.skip_cache
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Replace value, for the token types that carry one
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Replace { value } | TokenKind::ReplaceLarge { value } => value.as_deref(),
            _ => None,
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// Field order is part of the wire contract: name, type, cacheOverride, skipCache, then variant fields.
impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("name", &self.base.name)?;
        map.serialize_entry("type", self.token_type().as_str())?;
        map.serialize_entry("cacheOverride", &self.base.cache_override)?;
        map.serialize_entry("skipCache", &self.base.skip_cache)?;
        match &self.kind {
            TokenKind::Replace { value } | TokenKind::ReplaceLarge { value } => {
                map.serialize_entry("value", value)?
            }
            TokenKind::Secret { path } => map.serialize_entry("path", path)?,
            TokenKind::Hmac { options } | TokenKind::Rsa { options } => {
                map.serialize_entry("options", options)?
            }
            TokenKind::Sha1 { options } => map.serialize_entry("options", options)?,
        }
        map.end()
    }
}
