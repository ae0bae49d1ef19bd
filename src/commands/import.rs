// `atlas import` / `atlas import-status`: push a generated store to Shopify
// and poll the import job. A timeout here is not a failure verdict — the
// import keeps running server-side, so the user is pointed at
// `import-status` instead.

use anyhow::Result;
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::api::types::{ImportOptions, StoreStatus};
use crate::api::AtlasClient;
use crate::error::AtlasError;
use crate::poll::{self, JobState, PollOptions};
use crate::ui::{self, ProgressTracker};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// The generation job ID to import
    pub job_id: String,

    /// Only import the product, not the theme
    #[arg(long = "only-import-product")]
    pub only_import_product: bool,

    /// Wait for the import to complete
    #[arg(long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ImportStatusArgs {
    /// The import job ID to check
    pub job_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(client: &AtlasClient, cancel: &CancellationToken, args: ImportArgs) -> Result<()> {
    let bar = ui::spinner("Starting import...");
    let submitted = client
        .import_store(
            &args.job_id,
            ImportOptions {
                only_import_product: args.only_import_product,
            },
        )
        .await;
    bar.finish_and_clear();
    let response = submitted?;

    if args.json && !args.wait {
        ui::print_json(&response);
        return Ok(());
    }

    if !args.json {
        println!("✓ Import started!");
        println!("\n  Import Job ID: {}", response.import_job_id);
    }

    if !args.wait {
        if !args.json {
            println!("\n  To check import status, run:");
            println!("    atlas import-status {}\n", response.import_job_id);
        }
        return Ok(());
    }

    if !args.json {
        println!("\n  Waiting for import to complete...\n");
    }

    let wait_bar = ui::spinner("Importing to Shopify...");
    let mut tracker = ProgressTracker::new();
    let mut on_progress = |status: &StoreStatus| {
        if let Some(percent) = tracker.update(status.percentage_complete) {
            wait_bar.set_message(format!("Importing to Shopify... {percent}%"));
        }
    };

    let import_job_id = response.import_job_id.clone();
    let outcome = poll::wait_for_completion(
        || client.import_status(&import_job_id),
        &PollOptions::import(),
        cancel,
        Some(&mut on_progress),
    )
    .await;
    wait_bar.finish_and_clear();

    match outcome {
        Ok(status) if status.status == JobState::Completed => {
            if args.json {
                ui::print_json(&status);
            } else {
                println!("✓ Import completed!");
                match status.result.as_ref().and_then(|r| r.theme_id) {
                    Some(theme_id) => println!("\n  Theme ID: {theme_id}"),
                    None => println!("\n  Theme ID: N/A"),
                }
                println!("\n✓ Store imported successfully!\n");
                println!("  View your new theme in Shopify Admin > Online Store > Themes\n");
            }
            Ok(())
        }
        Ok(status) => {
            // Terminal failed state: expected business outcome, exit 1.
            if args.json {
                ui::print_json(&status);
            } else {
                println!("✗ Import failed");
                println!(
                    "\n  Error: {}\n",
                    status.error.as_deref().unwrap_or("Unknown error")
                );
            }
            std::process::exit(1);
        }
        Err(AtlasError::Timeout) => {
            println!("✗ Import timed out");
            println!("\n  Import is still processing. Check status with:");
            println!("    atlas import-status {}\n", response.import_job_id);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn run_status(client: &AtlasClient, args: ImportStatusArgs) -> Result<()> {
    let bar = ui::spinner("Fetching import status...");
    let result = client.import_status(&args.job_id).await;
    bar.finish_and_clear();
    let status = result?;

    if args.json {
        ui::print_json(&status);
    } else {
        println!("\nImport Status");
        println!("  Job ID:   {}", status.job_id);
        println!("  Status:   {}", status.status);
        println!("  Progress: {}%", status.percentage_complete.round());

        if status.status == JobState::Completed {
            match status.result.as_ref().and_then(|r| r.theme_id) {
                Some(theme_id) => println!("\n  Theme ID: {theme_id}"),
                None => println!("\n  Theme ID: N/A"),
            }
            println!("\n✓ Import completed!\n");
        }
        if status.status == JobState::Failed {
            println!(
                "\n  Error: {}\n",
                status.error.as_deref().unwrap_or("Unknown error")
            );
        }
    }
    Ok(())
}
