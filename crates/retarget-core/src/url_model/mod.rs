//! URL normalization and host helpers.
//!
//! Normalization is deliberately string-based rather than going through
//! `url::Url`: only the fragment is dropped and the authority lowercased,
//! every other byte of the input is kept as written.

mod host;
mod normalize;

pub use host::host_only;
pub use normalize::{normalize, split_authority, Authority};
