//! Post command - report one result to the sink

use super::{collect_tags, read_log};
use crate::ResultArgs;
use anyhow::{Context, Result};
use resultsink::{compose_with_log_bytes, ResultSinkClient};
use resultsink_config::ClientSettings;

pub fn run(args: &ResultArgs, settings: &ClientSettings) -> Result<()> {
    let mut client =
        ResultSinkClient::with_settings(settings).context("Failed to open ResultSink session")?;

    if !client.is_configured() {
        eprintln!("No ResultSink configured; skipping {}", args.test_id);
        return Ok(());
    }

    let log = read_log(args)?;
    let tags = collect_tags(args)?;

    let result = compose_with_log_bytes(
        &args.test_id,
        &args.status,
        !args.unexpected,
        log.as_deref(),
        tags,
    )?;

    let outcome = client.post_composed_result(&result);
    client.close();

    outcome.with_context(|| format!("Failed to report {}", args.test_id))?;
    log::info!("Reported {} as {}", args.test_id, args.status);
    Ok(())
}
