// `atlas themes`: browse the merchant's Shopify themes and their product
// page templates.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::AtlasClient;
use crate::ui;

#[derive(Debug, Args)]
pub struct ThemesArgs {
    #[command(subcommand)]
    pub command: Option<ThemesCommand>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum ThemesCommand {
    /// Show details for a specific theme including product page templates
    Show {
        /// Theme ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List product page templates for a specific theme
    ProductTemplates {
        /// Theme ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(client: &AtlasClient, args: ThemesArgs) -> Result<()> {
    match args.command {
        Some(ThemesCommand::Show { id, json }) => run_show(client, id, json).await,
        Some(ThemesCommand::ProductTemplates { id, json }) => {
            run_product_templates(client, id, json).await
        }
        None => run_list(client, args.json).await,
    }
}

async fn run_list(client: &AtlasClient, json: bool) -> Result<()> {
    let bar = ui::spinner("Fetching themes...");
    let result = client.list_themes().await;
    bar.finish_and_clear();
    let response = result?;

    if json {
        ui::print_json(&response);
        return Ok(());
    }

    println!("\nYour Shopify Themes\n");

    if response.themes.is_empty() {
        println!("No themes found.");
        return Ok(());
    }

    for theme in &response.themes {
        let role_tag = match theme.role.as_deref() {
            Some("main") => " [LIVE]",
            Some("unpublished") => " [draft]",
            _ => "",
        };
        let atlas_tag = if theme.is_atlas_theme {
            format!(
                " [Atlas v{}]",
                theme.atlas_version.as_deref().unwrap_or("?")
            )
        } else {
            String::new()
        };
        println!("  {:>12}  {}{}{}", theme.id, theme.name, role_tag, atlas_tag);
    }

    println!();
    println!("Use --theme-id <id> with generate command for product pages or existing_theme template\n");
    Ok(())
}

async fn run_show(client: &AtlasClient, id: i64, json: bool) -> Result<()> {
    let bar = ui::spinner("Fetching theme details...");
    let result = client.theme(id).await;
    bar.finish_and_clear();
    let theme = result?;

    if json {
        ui::print_json(&theme);
        return Ok(());
    }

    println!("\nTheme: {}\n", theme.name);
    println!("  ID:   {}", theme.id);
    println!("  Role: {}", theme.role.as_deref().unwrap_or("unknown"));
    println!(
        "  Atlas Theme: {}",
        if theme.is_atlas_theme {
            format!("Yes (v{})", theme.atlas_version.as_deref().unwrap_or("?"))
        } else {
            "No".to_string()
        }
    );
    if let Some(updated_at) = &theme.updated_at {
        println!("  Updated: {updated_at}");
    }

    if let Some(product_templates) = &theme.product_templates {
        if !product_templates.is_empty() {
            println!("\n  Product Page Templates:");
            for template in product_templates {
                println!("    - {} ({})", template.name, template.key);
            }
        }
    }
    println!();
    Ok(())
}

async fn run_product_templates(client: &AtlasClient, id: i64, json: bool) -> Result<()> {
    let bar = ui::spinner("Fetching product templates...");
    let result = client.theme_product_templates(id).await;
    bar.finish_and_clear();
    let response = result?;

    if json {
        ui::print_json(&response);
        return Ok(());
    }

    println!("\nProduct Page Templates for Theme {id}\n");

    if response.product_templates.is_empty() {
        println!("No product page templates found.");
        return Ok(());
    }

    for template in &response.product_templates {
        println!("  - {} ({})", template.name, template.key);
    }
    println!();
    println!("Use --product-page-template <name> with generate for existing_page template source\n");
    Ok(())
}
