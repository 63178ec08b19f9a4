use crate::config::write_sample_config;
use anyhow::Context;
use console::style;
use std::path::Path;

pub fn exec(path: &Path) -> anyhow::Result<()> {
    write_sample_config(path)
        .with_context(|| format!("Failed to create config file {}", path.display()))?;
    println!("Created config file: {}", style(path.display()).green());
    println!("Edit it to tune thresholds and exclusions, then run `vibector analyze`.");
    Ok(())
}
