//! Subcommand implementations

pub mod compose;
pub mod context;
pub mod post;

use crate::ResultArgs;
use anyhow::{Context, Result};
use resultsink::Tags;
use std::fs;

/// Read the raw bytes of the log file named in `args`, if any
pub fn read_log(args: &ResultArgs) -> Result<Option<Vec<u8>>> {
    args.log_file
        .as_ref()
        .map(|path| {
            fs::read(path).with_context(|| format!("Failed to read log file: {}", path.display()))
        })
        .transpose()
}

/// Collect `--tags-json` then `--tag` pairs, in that order
pub fn collect_tags(args: &ResultArgs) -> Result<Option<Tags>> {
    if args.tags.is_empty() && args.tags_json.is_none() {
        return Ok(None);
    }

    let mut tags = Tags::new();
    if let Some(raw) = &args.tags_json {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("--tags-json is not valid JSON")?;
        tags.extend(Tags::from_json(&value)?);
    }
    for raw in &args.tags {
        tags.push(Tags::parse_pair(raw)?);
    }
    Ok(Some(tags))
}
