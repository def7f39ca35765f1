//! HAR (HTTP Archive) source: recorded responses for offline replay through
//! the response hook.

mod load;
mod parse;

pub use load::load_responses;
