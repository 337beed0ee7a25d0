use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::extract::extract;

/// Replays extraction over agent output captured earlier, e.g. `agentcore invoke ... > out.txt`.
pub fn run_extract(file: Option<&Path>) -> Result<()> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("Failed to read stdin")?,
    };

    let Some(reply) = extract(&raw) else {
        bail!("could not parse agent output ({} bytes)", raw.len());
    };
    println!("{reply}");
    Ok(())
}
