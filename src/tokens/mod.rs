//! Token model: the closed set of token types, their options and validation.

pub mod options;
pub mod token;
pub mod validator;

pub use options::{NestedToken, Sha1Options, SigningOptions};
pub use token::{Token, TokenBase, TokenKind, TokenType};
