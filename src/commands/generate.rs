// `atlas generate`: submit a store-generation job, optionally waiting for
// the terminal state with a progress spinner. Prompts interactively for the
// product source when neither a URL nor a product id was given.

use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Select};
use tokio_util::sync::CancellationToken;

use crate::api::types::{GenerateOptions, StoreStatus};
use crate::api::AtlasClient;
use crate::poll::{self, JobState, PollOptions};
use crate::ui::{self, ProgressTracker};

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Product URL (Amazon, AliExpress, Etsy, etc.)
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Existing Shopify product ID
    #[arg(short = 'p', long = "product-id")]
    pub product_id: Option<String>,

    /// Region code (us, uk, de, etc.)
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// Language code (en, es, de, etc.)
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Generation type: single_product_shop or product_page
    #[arg(short = 't', long = "type")]
    pub generation_type: Option<String>,

    /// Theme template ID to use
    #[arg(long = "template")]
    pub template: Option<String>,

    /// Shopify theme ID (required for product_page generation)
    #[arg(long = "theme-id")]
    pub theme_id: Option<String>,

    /// Wait for generation to complete
    #[arg(long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(
    client: &AtlasClient,
    cancel: &CancellationToken,
    mut args: GenerateArgs,
) -> Result<()> {
    // Interactive mode when no product source was provided.
    if args.url.is_none() && args.product_id.is_none() {
        println!("\nAtlas Store Generator\n");
        let choices = [
            "From a product URL (Amazon, AliExpress, Etsy, etc.)",
            "From an existing Shopify product",
        ];
        let source = Select::new()
            .with_prompt("How would you like to generate your store?")
            .items(&choices)
            .default(0)
            .interact()?;
        if source == 0 {
            let url: String = Input::new()
                .with_prompt("Enter the product URL")
                .validate_with(|value: &String| {
                    if value.starts_with("http://") || value.starts_with("https://") {
                        Ok(())
                    } else {
                        Err("Please enter a valid URL")
                    }
                })
                .interact_text()?;
            args.url = Some(url);
        } else {
            let product_id: String = Input::new()
                .with_prompt("Enter the Shopify product ID")
                .interact_text()?;
            args.product_id = Some(product_id);
        }
    }

    let bar = ui::spinner("Starting store generation...");
    let submitted = client
        .generate_store(GenerateOptions {
            url: args.url,
            shopify_product_id: args.product_id,
            region: args.region,
            language: args.language,
            generation_type: args.generation_type,
            template_id: args.template,
            theme_id: args.theme_id,
            ..GenerateOptions::default()
        })
        .await;
    bar.finish_and_clear();
    let response = submitted?;

    if args.json {
        ui::print_json(&response);
    } else {
        println!("✓ Generation started!");
        println!("\n  Job ID: {}", response.job_id);
        println!("  Status: {}", response.status);
    }

    if args.wait {
        if !args.json {
            println!("\n  Waiting for generation to complete...\n");
        }

        let wait_bar = ui::spinner("Generating store...");
        let mut tracker = ProgressTracker::new();
        let mut on_progress = |status: &StoreStatus| {
            if let Some(percent) = tracker.update(status.percentage_complete) {
                wait_bar.set_message(format!("Generating store... {percent}%"));
            }
        };

        let job_id = response.job_id.clone();
        let final_status = poll::wait_for_completion(
            || client.store_status(&job_id),
            &PollOptions::interactive(),
            cancel,
            Some(&mut on_progress),
        )
        .await;
        wait_bar.finish_and_clear();
        let final_status = final_status?;

        if args.json {
            ui::print_json(&final_status);
            if final_status.status == JobState::Failed {
                std::process::exit(1);
            }
        } else if final_status.status == JobState::Completed {
            println!("\n✓ Store generated successfully!\n");
            println!(
                "  Product: {}",
                final_status
                    .result
                    .as_ref()
                    .and_then(|r| r.product_name.as_deref())
                    .unwrap_or("N/A")
            );
            match final_status.history_id {
                Some(history_id) => println!("  History ID: {history_id}"),
                None => println!("  History ID: N/A"),
            }
            println!("\n  To import to Shopify, run:");
            println!("    atlas import {}\n", response.job_id);
        } else {
            println!("\n✗ Generation failed");
            println!(
                "  Error: {}\n",
                final_status.error.as_deref().unwrap_or("Unknown error")
            );
            std::process::exit(1);
        }
    } else if !args.json {
        println!("\n  To check status, run:");
        println!("    atlas status {}\n", response.job_id);
    }

    Ok(())
}
