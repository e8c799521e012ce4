pub mod cache_key;

pub use cache_key::{hash_for_request, hash_mode, hash_string, HashMode};
