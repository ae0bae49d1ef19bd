// `atlas list` / `atlas show`: browse generated stores.

use anyhow::Result;
use clap::Args;

use crate::api::AtlasClient;
use crate::ui;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Number of stores to show
    #[arg(short = 'l', long, default_value_t = 20)]
    pub limit: u32,

    /// Offset for pagination
    #[arg(short = 'o', long, default_value_t = 0)]
    pub offset: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Store ID
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(client: &AtlasClient, args: ListArgs) -> Result<()> {
    let bar = ui::spinner("Fetching stores...");
    let result = client.list_stores(args.limit, args.offset).await;
    bar.finish_and_clear();
    let response = result?;

    if args.json {
        ui::print_json(&response);
        return Ok(());
    }

    println!("\nYour Generated Stores ({} total)\n", response.total);

    if response.stores.is_empty() {
        println!("  No stores found. Generate one with:");
        println!("    atlas generate --url \"https://amazon.com/dp/...\"\n");
        return Ok(());
    }

    for store in &response.stores {
        println!(
            "  #{} {}",
            store.id,
            store.product_name.as_deref().unwrap_or("Untitled")
        );
        println!("    Type:    {}", store.store_type);
        println!(
            "    Status:  {}",
            store.status.as_deref().unwrap_or("unknown")
        );
        println!("    Created: {}", store.created_at);
        if let Some(theme_id) = store.theme_id {
            println!("    Theme ID: {theme_id}");
        }
        println!();
    }

    if response.total > response.offset + response.limit {
        let next_offset = response.offset + response.limit;
        println!(
            "  Showing {} of {}. For more:",
            response.stores.len(),
            response.total
        );
        println!("    atlas list --offset {next_offset}\n");
    }
    Ok(())
}

pub async fn run_show(client: &AtlasClient, args: ShowArgs) -> Result<()> {
    let bar = ui::spinner("Fetching store details...");
    let result = client.store(args.id).await;
    bar.finish_and_clear();
    let store = result?;

    if args.json {
        ui::print_json(&store);
    } else {
        ui::print_store(&store);
    }
    Ok(())
}
