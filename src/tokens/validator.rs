//! Token validation.
//!
//! Each token type maps to a [`Rule`]: the properties it requires, in declared
//! order, and the type-specific checks appended after them. Every check runs and
//! every failure is collected; nothing short-circuits.

use crate::tokens::options::SigningOptions;
use crate::tokens::token::{TokenBase, TokenKind, TokenType};
use crate::utils::constants::{ALLOWED_ALGORITHMS, ALLOWED_ENCODINGS, CHAR_LIMIT, SHA1_ENCODINGS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    Name,
    Value,
    Path,
}

impl Property {
    fn as_str(&self) -> &'static str {
        match self {
            Property::Name => "name",
            Property::Value => "value",
            Property::Path => "path",
        }
    }
}

type Check = fn(&TokenKind) -> Option<String>;

struct Rule {
    required: &'static [Property],
    checks: &'static [Check],
}

static REPLACE: Rule = Rule {
    required: &[Property::Name, Property::Value],
    checks: &[replace_within_limit],
};

static REPLACE_LARGE: Rule = Rule {
    required: &[Property::Name, Property::Value],
    checks: &[replace_large_over_limit],
};

static SECRET: Rule = Rule {
    required: &[Property::Name, Property::Path],
    checks: &[],
};

static SIGNING: Rule = Rule {
    required: &[Property::Name],
    checks: &[signing_algorithm, signing_secret_name, signing_encoding],
};

static SHA1: Rule = Rule {
    required: &[Property::Name],
    checks: &[sha1_text, sha1_encoding, sha1_secrets],
};

fn rule_for(token_type: TokenType) -> &'static Rule {
    match token_type {
        TokenType::Replace => &REPLACE,
        TokenType::ReplaceLarge => &REPLACE_LARGE,
        TokenType::Secret => &SECRET,
        TokenType::Hmac | TokenType::Rsa => &SIGNING,
        TokenType::Sha1 => &SHA1,
    }
}

/// Returns every validation error for the token, in a stable order:
/// missing properties, cacheOverride length, then type-specific checks.
pub fn validate(base: &TokenBase, kind: &TokenKind) -> Vec<String> {
    let token_type = kind.token_type();
    let rule = rule_for(token_type);
    let mut errors = Vec::new();

    let missing: Vec<&str> = rule
        .required
        .iter()
        .filter(|property| !is_present(**property, base, kind))
        .map(|property| property.as_str())
        .collect();

    if !missing.is_empty() {
        errors.push(format!(
            "Missing properties for {} token: \"{}\"",
            token_type,
            missing.join(", ")
        ));
    }

    if base
        .cache_override
        .as_deref()
        .is_some_and(|value| text_len(value) > CHAR_LIMIT)
    {
        errors.push(format!("cacheOverride cannot be over {} characters", CHAR_LIMIT));
    }

    errors.extend(rule.checks.iter().filter_map(|check| check(kind)));
    errors
}

fn is_present(property: Property, base: &TokenBase, kind: &TokenKind) -> bool {
    match (property, kind) {
        (Property::Name, _) => non_empty(base.name.as_deref()),
        // an empty replace value is still a value
        (Property::Value, TokenKind::Replace { value } | TokenKind::ReplaceLarge { value }) => {
            value.is_some()
        }
        (Property::Path, TokenKind::Secret { path }) => non_empty(path.as_deref()),
        _ => false,
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

// Limits are measured in UTF-16 code units, like the cache-key hash.
fn text_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn replace_within_limit(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Replace { value: Some(value) } if text_len(value) > CHAR_LIMIT => {
            Some(format!("Replace value exceeds {} character limit", CHAR_LIMIT))
        }
        _ => None,
    }
}

fn replace_large_over_limit(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::ReplaceLarge { value: Some(value) } if text_len(value) <= CHAR_LIMIT => Some(format!(
            "ReplaceLarge token can only be used when value exceeds {} character limit",
            CHAR_LIMIT
        )),
        _ => None,
    }
}

fn signing_scope(kind: &TokenKind) -> Option<(&'static str, &SigningOptions)> {
    match kind {
        TokenKind::Hmac { options } => Some(("HMAC", options)),
        TokenKind::Rsa { options } => Some(("RSA", options)),
        _ => None,
    }
}

fn signing_algorithm(kind: &TokenKind) -> Option<String> {
    let (scope, options) = signing_scope(kind)?;
    let allowed = options
        .algorithm
        .as_deref()
        .is_some_and(|algorithm| ALLOWED_ALGORITHMS.contains(&algorithm));
    (!allowed).then(|| format!("{} algorithm is invalid", scope))
}

fn signing_secret_name(kind: &TokenKind) -> Option<String> {
    let (scope, options) = signing_scope(kind)?;
    (!non_empty(options.secret_name.as_deref())).then(|| format!("{} secret name not provided", scope))
}

fn signing_encoding(kind: &TokenKind) -> Option<String> {
    let (scope, options) = signing_scope(kind)?;
    let allowed = options
        .encoding
        .as_deref()
        .is_some_and(|encoding| ALLOWED_ENCODINGS.contains(&encoding));
    (!allowed).then(|| format!("{} encoding is invalid", scope))
}

fn sha1_text(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Sha1 { options } if !non_empty(options.text.as_deref()) => {
            Some("Missing text to encrypt".to_owned())
        }
        _ => None,
    }
}

fn sha1_encoding(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Sha1 { options }
            if !options
                .encoding
                .as_deref()
                .is_some_and(|encoding| SHA1_ENCODINGS.contains(&encoding)) =>
        {
            Some("SHA1 encoding is invalid".to_owned())
        }
        _ => None,
    }
}

fn sha1_secrets(kind: &TokenKind) -> Option<String> {
    match kind {
        TokenKind::Sha1 { options } => {
            let nested = options.tokens.as_deref().unwrap_or_default();
            nested
                .iter()
                .any(|token| !token.is_valid_secret())
                .then(|| "Invalid secret token passed into SHA1 tokens array".to_owned())
        }
        _ => None,
    }
}
