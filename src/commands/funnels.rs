// `atlas funnels`: generate listicle and advertorial funnel pages. The
// interactive flow walks funnel type, product source, target theme
// (fetched from the API, preferring Atlas themes), marketing angle, tone
// and an optional headline. `atlas listicle` / `atlas advertorial` are
// non-interactive shortcuts over the same runner with the type fixed.

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{Input, Select};
use tokio_util::sync::CancellationToken;

use crate::api::types::{FunnelOptions, FunnelStatus};
use crate::api::AtlasClient;
use crate::poll::{self, JobState, PollOptions};
use crate::ui::{self, ProgressTracker};

#[derive(Debug, Args)]
pub struct FunnelsArgs {
    #[command(subcommand)]
    pub command: FunnelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FunnelsCommand {
    /// Generate a listicle or advertorial funnel page
    Generate(FunnelGenerateArgs),
    /// Check funnel generation status
    Status {
        /// The generation job ID
        job_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct FunnelGenerateArgs {
    /// Product URL (Amazon, AliExpress, Etsy, etc.)
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Existing Shopify product ID
    #[arg(short = 'p', long = "product-id")]
    pub product_id: Option<String>,

    /// Funnel type: listicle or advertorial
    #[arg(long = "type")]
    pub funnel_type: Option<String>,

    /// Target Shopify theme ID
    #[arg(long = "theme-id")]
    pub theme_id: Option<String>,

    /// Custom headline for the funnel page
    #[arg(long)]
    pub headline: Option<String>,

    /// Marketing angle: problem_solution, comparison, story, urgency
    #[arg(long)]
    pub angle: Option<String>,

    /// Writing tone: professional, casual, urgent, luxury
    #[arg(long)]
    pub tone: Option<String>,

    /// Language code (en, es, de, etc.)
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Wait for generation to complete
    #[arg(long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Shared flags for the `listicle` / `advertorial` shortcut commands, which
/// skip the interactive flow entirely.
#[derive(Debug, Args)]
pub struct FunnelShortcutArgs {
    /// Product URL
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Existing Shopify product ID
    #[arg(short = 'p', long = "product-id")]
    pub product_id: Option<String>,

    /// Target Shopify theme ID
    #[arg(long = "theme-id")]
    pub theme_id: Option<String>,

    /// Custom headline
    #[arg(long)]
    pub headline: Option<String>,

    /// Marketing angle: problem_solution, comparison, story, urgency
    #[arg(long)]
    pub angle: Option<String>,

    /// Writing tone: professional, casual, urgent, luxury
    #[arg(long)]
    pub tone: Option<String>,

    /// Language code
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Wait for generation to complete
    #[arg(long)]
    pub wait: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(client: &AtlasClient, cancel: &CancellationToken, args: FunnelsArgs) -> Result<()> {
    match args.command {
        FunnelsCommand::Generate(args) => run_generate(client, cancel, args).await,
        FunnelsCommand::Status { job_id, json } => run_status(client, &job_id, json).await,
    }
}

/// Entry point for the `listicle` / `advertorial` shortcuts.
pub async fn run_shortcut(
    client: &AtlasClient,
    cancel: &CancellationToken,
    funnel_type: &str,
    args: FunnelShortcutArgs,
) -> Result<()> {
    if args.url.is_none() && args.product_id.is_none() {
        eprintln!("Error: --url or --product-id is required");
        eprintln!("Tip: Use `atlas funnels generate` for interactive mode.");
        std::process::exit(1);
    }
    let Some(theme_id) = args.theme_id else {
        eprintln!("Error: --theme-id is required");
        std::process::exit(1);
    };

    submit_and_report(
        client,
        cancel,
        FunnelOptions {
            funnel_type: funnel_type.to_string(),
            theme_id,
            language: args.language,
            url: args.url,
            shopify_product_id: args.product_id,
            headline: args.headline,
            angle: args.angle,
            tone: args.tone,
        },
        args.wait,
        args.json,
    )
    .await
}

async fn run_generate(
    client: &AtlasClient,
    cancel: &CancellationToken,
    mut args: FunnelGenerateArgs,
) -> Result<()> {
    // Interactive mode when no product source was given.
    if args.url.is_none() && args.product_id.is_none() {
        println!("\nAtlas Funnel Generator\n");

        if args.funnel_type.is_none() {
            let choices = [
                "Listicle - \"Top 10 Reasons...\", \"5 Ways...\" format",
                "Advertorial - Editorial-style native ad content",
            ];
            let selected = Select::new()
                .with_prompt("What type of funnel page would you like to generate?")
                .items(&choices)
                .default(0)
                .interact()?;
            let funnel_type = if selected == 0 { "listicle" } else { "advertorial" };
            args.funnel_type = Some(funnel_type.to_string());
        }

        let sources = [
            "From a product URL (Amazon, AliExpress, Etsy, etc.)",
            "From an existing Shopify product",
        ];
        let source = Select::new()
            .with_prompt("How would you like to source the product?")
            .items(&sources)
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

        if args.theme_id.is_none() {
            args.theme_id = Some(prompt_theme(client).await?);
        }

        if args.angle.is_none() {
            let angles = [
                "Problem/Solution - Focus on pain points and how product solves them",
                "Comparison - Compare to alternatives and competitors",
                "Story - Narrative-driven, testimonial style",
                "Urgency - Scarcity, limited time, act now",
            ];
            let values = ["problem_solution", "comparison", "story", "urgency"];
            let selected = Select::new()
                .with_prompt("What marketing angle should the content use?")
                .items(&angles)
                .default(0)
                .interact()?;
            args.angle = Some(values[selected].to_string());
        }

        if args.tone.is_none() {
            let tones = [
                "Professional - Authoritative, expert voice",
                "Casual - Friendly, conversational",
                "Urgent - High-energy, action-oriented",
                "Luxury - Premium, sophisticated",
            ];
            let values = ["professional", "casual", "urgent", "luxury"];
            let selected = Select::new()
                .with_prompt("What tone should the content have?")
                .items(&tones)
                .default(0)
                .interact()?;
            args.tone = Some(values[selected].to_string());
        }

        if args.headline.is_none() {
            let choices = [
                "No, let AI generate the headline",
                "Yes, I have a specific headline in mind",
            ];
            let wants_headline = Select::new()
                .with_prompt("Would you like to provide a custom headline?")
                .items(&choices)
                .default(0)
                .interact()?;
            if wants_headline == 1 {
                let headline: String =
                    Input::new().with_prompt("Enter your headline").interact_text()?;
                args.headline = Some(headline);
            }
        }
    }

    let Some(funnel_type) = args.funnel_type else {
        eprintln!("Error: --type (listicle or advertorial) is required");
        std::process::exit(1);
    };
    let Some(theme_id) = args.theme_id else {
        eprintln!("Error: --theme-id is required for funnel generation");
        std::process::exit(1);
    };

    submit_and_report(
        client,
        cancel,
        FunnelOptions {
            funnel_type,
            theme_id,
            language: args.language,
            url: args.url,
            shopify_product_id: args.product_id,
            headline: args.headline,
            angle: args.angle,
            tone: args.tone,
        },
        args.wait,
        args.json,
    )
    .await
}

/// Fetch the merchant's themes and prompt for one, preferring Atlas themes.
/// Falls back to a plain text prompt when the listing fails.
async fn prompt_theme(client: &AtlasClient) -> Result<String> {
    let bar = ui::spinner("Fetching your themes...");
    let themes = client.list_themes().await;
    bar.finish_and_clear();

    match themes {
        Ok(response) if !response.themes.is_empty() => {
            let atlas_themes: Vec<_> = response
                .themes
                .iter()
                .filter(|t| t.is_atlas_theme)
                .cloned()
                .collect();
            let theme_list = if atlas_themes.is_empty() {
                println!("Note: Funnel pages work best with Atlas themes.");
                response.themes
            } else {
                atlas_themes
            };

            let labels: Vec<String> = theme_list
                .iter()
                .map(|t| {
                    format!(
                        "{}{}{}",
                        t.name,
                        if t.role.as_deref() == Some("main") {
                            " (live)"
                        } else {
                            ""
                        },
                        if t.is_atlas_theme {
                            format!(" [Atlas v{}]", t.atlas_version.as_deref().unwrap_or("?"))
                        } else {
                            String::new()
                        }
                    )
                })
                .collect();
            let selected = Select::new()
                .with_prompt("Select the theme to add the funnel page to")
                .items(&labels)
                .default(0)
                .interact()?;
            Ok(theme_list[selected].id.to_string())
        }
        _ => {
            println!("Could not fetch themes.");
            let theme_id: String = Input::new().with_prompt("Enter theme ID").interact_text()?;
            Ok(theme_id)
        }
    }
}

async fn submit_and_report(
    client: &AtlasClient,
    cancel: &CancellationToken,
    options: FunnelOptions,
    wait: bool,
    json: bool,
) -> Result<()> {
    let funnel_type = options.funnel_type.clone();
    let type_label = if funnel_type == "listicle" {
        "Listicle"
    } else {
        "Advertorial"
    };

    let bar = ui::spinner(&format!("Starting {funnel_type} generation..."));
    let submitted = client.generate_funnel(options).await;
    bar.finish_and_clear();
    let response = submitted?;

    if json {
        ui::print_json(&response);
    } else {
        println!("✓ {type_label} generation started!");
        println!("\n  Job ID: {}", response.job_id);
        if let Some(funnel_type) = &response.funnel_type {
            println!("  Type:   {funnel_type}");
        }
        println!("  Status: {}", response.status);
    }

    if wait {
        if !json {
            println!("\n  Waiting for generation to complete...\n");
        }

        let wait_bar = ui::spinner(&format!("Generating {funnel_type}..."));
        let mut tracker = ProgressTracker::new();
        let mut on_progress = |status: &FunnelStatus| {
            if let Some(percent) = tracker.update(status.percentage_complete) {
                wait_bar.set_message(format!("Generating {funnel_type}... {percent}%"));
            }
        };

        let job_id = response.job_id.clone();
        let final_status = poll::wait_for_completion(
            || client.funnel_status(&job_id),
            &PollOptions::interactive(),
            cancel,
            Some(&mut on_progress),
        )
        .await;
        wait_bar.finish_and_clear();
        let final_status = final_status?;

        if json {
            ui::print_json(&final_status);
            if final_status.status == JobState::Failed {
                std::process::exit(1);
            }
        } else if final_status.status == JobState::Completed {
            println!("\n✓ {type_label} generated successfully!\n");
            let result = final_status.result.as_ref();
            println!(
                "  Page Title:  {}",
                result
                    .and_then(|r| r.page_title.as_deref())
                    .unwrap_or("N/A")
            );
            let handle = result.and_then(|r| r.page_handle.as_deref());
            println!("  Page Handle: {}", handle.unwrap_or("N/A"));
            if let Some(preview) = result.and_then(|r| r.preview_url.as_deref()) {
                println!("  Preview:     {preview}");
            }
            println!("\n  The funnel page has been added to your theme.");
            println!("  View it at: /pages/{}\n", handle.unwrap_or("funnel"));
        } else {
            println!("\n✗ Generation failed");
            println!(
                "  Error: {}\n",
                final_status.error.as_deref().unwrap_or("Unknown error")
            );
            std::process::exit(1);
        }
    } else if !json {
        println!("\n  To check status, run:");
        println!("    atlas funnels status {}\n", response.job_id);
    }

    Ok(())
}

async fn run_status(client: &AtlasClient, job_id: &str, json: bool) -> Result<()> {
    let bar = ui::spinner("Fetching status...");
    let result = client.funnel_status(job_id).await;
    bar.finish_and_clear();
    let status = result?;

    if json {
        ui::print_json(&status);
    } else {
        ui::print_funnel_status(&status);
    }
    Ok(())
}
