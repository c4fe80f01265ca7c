//! Context command - show where results would be reported

use anyhow::Result;
use resultsink_config::context::try_resolve;
use resultsink_config::ClientSettings;

pub fn run(settings: &ClientSettings) -> Result<()> {
    let var = settings.context_var();
    match try_resolve(var) {
        Ok(endpoint) => {
            println!("address:    {}", endpoint.address());
            println!(
                "auth_token: {}",
                if endpoint.auth_token().is_empty() {
                    "missing"
                } else {
                    "present"
                }
            );
        }
        Err(e) => {
            println!("No ResultSink configured ({}): {}", var, e);
        }
    }
    if let Some(timeout) = settings.timeout() {
        println!("timeout:    {}s", timeout.as_secs());
    }
    Ok(())
}
