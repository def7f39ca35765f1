pub mod config;
pub mod logging;

pub mod content_type;
pub mod discovery;
pub mod extract;
pub mod har;
pub mod intercept;
pub mod rewrite;
pub mod url_model;
