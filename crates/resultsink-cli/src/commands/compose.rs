//! Compose command - print a result record without sending it

use super::{collect_tags, read_log};
use crate::ResultArgs;
use anyhow::Result;

pub fn run(args: &ResultArgs) -> Result<()> {
    let log = read_log(args)?;
    let tags = collect_tags(args)?;

    let result = resultsink::compose_with_log_bytes(
        &args.test_id,
        &args.status,
        !args.unexpected,
        log.as_deref(),
        tags,
    )?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
