// `atlas products`: browse the merchant's Shopify products, searching and
// paginating by cursor.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::AtlasClient;
use crate::ui;

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,

    /// Number of products to show
    #[arg(short = 'l', long, default_value_t = 20)]
    pub limit: u32,

    /// Search query to filter products
    #[arg(short = 'q', long)]
    pub query: Option<String>,

    /// Pagination cursor
    #[arg(short = 'c', long)]
    pub cursor: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// Show details for a specific product
    Show {
        /// Product ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(client: &AtlasClient, args: ProductsArgs) -> Result<()> {
    if let Some(ProductsCommand::Show { id, json }) = args.command {
        return run_show(client, &id, json).await;
    }

    let bar = ui::spinner("Fetching products...");
    let result = client
        .list_products(args.limit, args.cursor.as_deref(), args.query.as_deref())
        .await;
    bar.finish_and_clear();
    let response = result?;

    if args.json {
        ui::print_json(&response);
        return Ok(());
    }

    println!("\nYour Shopify Products\n");

    if response.products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &response.products {
        let status = product
            .status
            .as_deref()
            .map(|s| format!("[{}]", s.to_lowercase()))
            .unwrap_or_default();
        println!("  {:>12}  {} {}", product.numeric_id, product.title, status);
        if let Some(min) = product.price_range.as_ref().and_then(|p| p.min.as_deref()) {
            println!(
                "                ${} - {} variants",
                min,
                product.variants_count.unwrap_or(0)
            );
        }
    }
    println!();

    if let Some(page_info) = &response.page_info {
        if page_info.has_next_page {
            if let Some(cursor) = &page_info.next_cursor {
                println!("More products available. Use --cursor \"{cursor}\" for next page\n");
            }
        }
    }

    println!("Use --product-id <numeric_id> with generate command\n");
    Ok(())
}

async fn run_show(client: &AtlasClient, id: &str, json: bool) -> Result<()> {
    let bar = ui::spinner("Fetching product...");
    let result = client.product(id).await;
    bar.finish_and_clear();
    let product = result?;

    if json {
        ui::print_json(&product);
        return Ok(());
    }

    println!("\nProduct: {}\n", product.title);
    println!("  ID:       {}", product.numeric_id);
    println!("  Handle:   {}", product.handle.as_deref().unwrap_or("N/A"));
    println!("  Status:   {}", product.status.as_deref().unwrap_or("N/A"));
    println!("  Vendor:   {}", product.vendor.as_deref().unwrap_or("N/A"));
    println!(
        "  Type:     {}",
        product.product_type.as_deref().unwrap_or("N/A")
    );
    println!(
        "  Images:   {}",
        product.images.as_ref().map(Vec::len).unwrap_or(0)
    );
    println!(
        "  Variants: {}",
        product.variants.as_ref().map(Vec::len).unwrap_or(0)
    );
    if let Some(range) = &product.price_range {
        if let (Some(min), Some(max)) = (range.min.as_deref(), range.max.as_deref()) {
            println!("  Price:    ${min} - ${max}");
        }
    }
    println!();
    Ok(())
}
