// UI layer: spinners and terminal rendering shared by the command modules.
// The functions are small and synchronous to keep the flow easy to follow.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

use crate::api::types::{FunnelStatus, Store, StoreStatus};
use crate::poll::JobState;

/// Build the standard spinner used while a request or wait is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Display-side progress gate: reports a percentage only when it exceeds
/// the last one shown. The server does not promise monotone progress, so
/// dips are silently ignored rather than displayed or treated as an error.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last_percent: u32,
}

impl ProgressTracker {
    pub fn new() -> Self {
        ProgressTracker::default()
    }

    /// Returns the rounded percentage when it increased past the last
    /// displayed value, `None` otherwise.
    pub fn update(&mut self, percentage_complete: f64) -> Option<u32> {
        let percent = percentage_complete.round().max(0.0) as u32;
        if percent > self.last_percent {
            self.last_percent = percent;
            Some(percent)
        } else {
            None
        }
    }
}

/// Print any API payload as pretty JSON (the `--json` path of every command).
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Error: could not serialize output: {err}"),
    }
}

/// Render a generation/import status envelope in the human-readable format.
pub fn print_store_status(status: &StoreStatus) {
    println!("\nJob Status");
    println!("  Job ID:   {}", status.job_id);
    println!("  Status:   {}", status.status);
    println!("  Progress: {}%", status.percentage_complete.round());

    if status.status == JobState::Completed {
        if let Some(result) = &status.result {
            println!("\nResult");
            println!(
                "  Product: {}",
                result.product_name.as_deref().unwrap_or("N/A")
            );
            println!(
                "  Price:   {}",
                result.product_price.as_deref().unwrap_or("N/A")
            );
            println!("  Images:  {}", result.product_images.unwrap_or(0));
            if let Some(theme_id) = result.theme_id {
                println!("  Theme ID: {theme_id}");
            }
        }
        if status.history_id.is_some() {
            println!("\n  Ready to import! Run:");
            println!("    atlas import {}\n", status.job_id);
        }
    }

    if status.status == JobState::Failed {
        println!(
            "\n  Error: {}\n",
            status.error.as_deref().unwrap_or("Unknown error")
        );
    }
}

/// Render a funnel status envelope.
pub fn print_funnel_status(status: &FunnelStatus) {
    println!("\n  Job ID:   {}", status.job_id);
    println!("  Status:   {}", status.status);
    println!("  Progress: {}%", status.percentage_complete.round());

    if status.status == JobState::Completed {
        if let Some(result) = &status.result {
            println!(
                "\n  Page Title:  {}",
                result.page_title.as_deref().unwrap_or("N/A")
            );
            println!(
                "  Page Handle: {}",
                result.page_handle.as_deref().unwrap_or("N/A")
            );
            if let Some(preview) = &result.preview_url {
                println!("  Preview:     {preview}");
            }
        }
    } else if status.status == JobState::Failed {
        println!(
            "\n  Error: {}",
            status.error.as_deref().unwrap_or("Unknown error")
        );
    }
    println!();
}

/// Render one store record in the detail view.
pub fn print_store(store: &Store) {
    println!("\nStore #{}\n", store.id);
    println!(
        "  Product: {}",
        store.product_name.as_deref().unwrap_or("Untitled")
    );
    println!("  Type:    {}", store.store_type);
    println!("  Status:  {}", store.status.as_deref().unwrap_or("unknown"));
    println!("  Created: {}", store.created_at);
    if let Some(url) = &store.source_url {
        println!("  Source URL: {url}");
    }
    if let Some(theme_id) = store.theme_id {
        println!("  Theme ID: {theme_id}");
    }
    if let Some(version) = &store.theme_version {
        println!("  Theme Version: {version}");
    }
    println!();
}
