//! Normalize command.

use anyhow::Result;
use retarget_core::url_model::normalize;

pub fn run_normalize(urls: &[String]) -> Result<()> {
    for url in urls {
        println!("{}", normalize(url));
    }
    Ok(())
}
