//! Blocking commands: `blocking status|enable|disable`.

use std::time::Duration;

use pihole_api::{BlockingStatus, DEFAULT_DISABLE_SECS, Error, PiholeClient};

use crate::cli::{BlockingArgs, BlockingCommand, GlobalOpts};
use crate::output;

pub async fn handle(
    client: &PiholeClient,
    args: BlockingArgs,
    global: &GlobalOpts,
) -> Result<(), Error> {
    match args.command {
        BlockingCommand::Status => {}
        BlockingCommand::Enable => {
            client.blocking_enable().await?;
        }
        BlockingCommand::Disable {
            duration,
            indefinitely,
        } => {
            let timer = if indefinitely {
                None
            } else {
                Some(duration.map_or(DEFAULT_DISABLE_SECS, whole_secs))
            };
            tracing::debug!(?timer, "disabling blocking");
            client.blocking_disable(timer).await?;
        }
    }

    // Re-read so the output reflects what the appliance settled on.
    client.blocking_status().await?;
    let state = client.blocking_state()?;

    let out = output::render_single(&global.output, &state, describe, |s| s.blocking.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Seconds for the appliance timer, rounding any fraction up.
fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn describe(state: &BlockingStatus) -> String {
    let label = match state.blocking.as_str() {
        "enabled" => output::state_label(true),
        "disabled" => output::state_label(false),
        other => other.to_owned(),
    };
    match state.timer {
        Some(secs) if secs > 0.0 => format!("Blocking: {label} (flips back in {secs:.0}s)"),
        _ => format!("Blocking: {label}"),
    }
}
