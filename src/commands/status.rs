// `atlas status`: check (or wait on) a generation job.

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::api::types::StoreStatus;
use crate::api::AtlasClient;
use crate::poll::{self, JobState, PollOptions};
use crate::ui::{self, ProgressTracker};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// The job ID to check
    pub job_id: String,

    /// Wait for the job to complete
    #[arg(long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(client: &AtlasClient, cancel: &CancellationToken, args: StatusArgs) -> Result<()> {
    let status = if args.wait {
        let bar = ui::spinner("Waiting for completion...");
        let mut tracker = ProgressTracker::new();
        let mut on_progress = |status: &StoreStatus| {
            if let Some(percent) = tracker.update(status.percentage_complete) {
                bar.set_message(format!("Processing... {percent}%"));
            }
        };
        let result = poll::wait_for_completion(
            || client.store_status(&args.job_id),
            &PollOptions::interactive(),
            cancel,
            Some(&mut on_progress),
        )
        .await;
        bar.finish_and_clear();
        result?
    } else {
        let bar = ui::spinner("Fetching status...");
        let result = client.store_status(&args.job_id).await;
        bar.finish_and_clear();
        result?
    };

    if args.json {
        ui::print_json(&status);
    } else {
        ui::print_store_status(&status);
    }

    // A plain query is informational; only a wait that ended in failure is
    // itself a failed command.
    if args.wait && status.status == JobState::Failed {
        std::process::exit(1);
    }
    Ok(())
}
