// `atlas templates`: browse the Atlas template library.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::AtlasClient;
use crate::ui;

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: Option<TemplatesCommand>,

    /// Number of templates to show
    #[arg(short = 'l', long, default_value_t = 20)]
    pub limit: u32,

    /// Offset for pagination
    #[arg(short = 'o', long, default_value_t = 0)]
    pub offset: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// Show details for a specific template
    Show {
        /// Template ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(client: &AtlasClient, args: TemplatesArgs) -> Result<()> {
    if let Some(TemplatesCommand::Show { id, json }) = args.command {
        return run_show(client, id, json).await;
    }

    let bar = ui::spinner("Fetching templates...");
    let result = client.list_templates(args.limit, args.offset).await;
    bar.finish_and_clear();
    let response = result?;

    if args.json {
        ui::print_json(&response);
        return Ok(());
    }

    println!("\nAtlas Theme Templates\n");
    println!(
        "Showing {} of {} templates\n",
        response.templates.len(),
        response.total
    );

    if response.templates.is_empty() {
        println!("No templates available.");
        return Ok(());
    }

    for template in &response.templates {
        println!("  {:>3}  {}", template.id, template.name);
        println!(
            "       Version: {} | Used by: {} stores",
            template.theme_version.as_deref().unwrap_or("N/A"),
            template.stores_using
        );
        if let Some(badge) = &template.badge_text {
            println!("       [{badge}]");
        }
        println!();
    }
    Ok(())
}

async fn run_show(client: &AtlasClient, id: i64, json: bool) -> Result<()> {
    let bar = ui::spinner("Fetching template...");
    let result = client.template(id).await;
    bar.finish_and_clear();
    let template = result?;

    if json {
        ui::print_json(&template);
        return Ok(());
    }

    println!("\nTemplate: {}\n", template.name);
    println!("  ID:      {}", template.id);
    println!(
        "  Version: {}",
        template.theme_version.as_deref().unwrap_or("N/A")
    );
    println!(
        "  Folder:  {}",
        template.theme_version_folder.as_deref().unwrap_or("N/A")
    );
    println!("  Stores Using: {}", template.stores_using);
    if let Some(category) = &template.category {
        println!("  Category: {category}");
    }
    if let Some(description) = &template.description {
        println!("  Description: {description}");
    }
    if let Some(thumbnail) = &template.thumbnail_url {
        println!("  Preview: {thumbnail}");
    }
    println!();
    Ok(())
}
