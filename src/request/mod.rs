pub mod builder;
pub mod options;

pub use builder::{RequestBuilder, TokenPayload};
pub use options::{RequestOptions, TargetingParams};
