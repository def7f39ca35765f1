//! CLI command handlers, one file per command.

mod extract;
mod normalize;
mod replay;
mod rewrite;

pub use extract::run_extract;
pub use normalize::run_normalize;
pub use replay::run_replay;
pub use rewrite::run_rewrite;
