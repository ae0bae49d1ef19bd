// `atlas auth`: manage the persisted API key and base URL. Credential
// storage is a plain JSON config file; environment overrides always win at
// request time, see `config::Settings`.

use anyhow::Result;
use clap::Args;
use dialoguer::{Confirm, Input};

use crate::config::{Settings, StoredConfig, DEFAULT_API_BASE};

#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Set API key directly
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Set custom API base URL (for local dev, use your Shopify app URL)
    #[arg(long = "api-base")]
    pub api_base: Option<String>,

    /// Configure for local development (prompts for a tunnel URL)
    #[arg(long)]
    pub local: bool,

    /// Clear stored credentials
    #[arg(long)]
    pub clear: bool,

    /// Show current configuration
    #[arg(long)]
    pub show: bool,
}

pub async fn run(args: AuthArgs) -> Result<()> {
    if args.show {
        let settings = Settings::load()?;
        let is_local = settings.api_base.contains("localhost")
            || settings.api_base.contains(".trycloudflare.com")
            || settings.api_base.contains("ngrok");
        println!("\nCurrent Configuration:");
        println!(
            "  API Base: {}{}",
            settings.api_base,
            if is_local { " (local dev)" } else { "" }
        );
        match &settings.api_key {
            Some(key) => {
                let prefix: String = key.chars().take(12).collect();
                println!("  API Key:  {prefix}...");
            }
            None => println!("  API Key:  Not set"),
        }
        println!();
        if is_local {
            println!("  Note: Using local dev URL. For production, run:");
            println!("    atlas auth --api-base {DEFAULT_API_BASE}");
        }
        return Ok(());
    }

    if args.local {
        println!("\nLocal Development Setup\n");
        println!("When running `shopify app dev`, your app gets a tunnel URL like:");
        println!("  https://admin.shopify.com/store/YOUR-STORE/apps/YOUR-APP");
        println!("  or a cloudflare/ngrok tunnel URL\n");

        let tunnel_url: String = Input::new()
            .with_prompt("Enter your Shopify app URL or tunnel URL")
            .validate_with(|value: &String| {
                if value.starts_with("http") {
                    Ok(())
                } else {
                    Err("URL should start with http:// or https://")
                }
            })
            .interact_text()?;

        let mut api_base = tunnel_url.trim_end_matches('/').to_string();
        if !api_base.ends_with("/api/v1") {
            api_base = format!("{api_base}/api/v1");
        }

        StoredConfig::set_api_base(&api_base)?;
        println!("\n✓ API base set to: {api_base}");
        println!("  Now set your API key with: atlas auth --key YOUR_KEY\n");
        return Ok(());
    }

    if args.clear {
        let confirmed = Confirm::new()
            .with_prompt("Clear stored API credentials?")
            .default(false)
            .interact()?;
        if confirmed {
            StoredConfig::clear_api_key()?;
            println!("✓ Credentials cleared");
        }
        return Ok(());
    }

    if let Some(api_base) = &args.api_base {
        StoredConfig::set_api_base(api_base)?;
        println!("✓ API base set to: {api_base}");
        if args.key.is_none() {
            return Ok(());
        }
    }

    let key = match args.key {
        Some(key) => key,
        None => {
            println!("\nAtlas API Authentication");
            println!("Get your API key from the Atlas app settings.\n");
            Input::new()
                .with_prompt("Enter your Atlas API key")
                .validate_with(|value: &String| {
                    if !value.starts_with("atlas_") {
                        Err("API key should start with \"atlas_\"")
                    } else if value.len() < 20 {
                        Err("API key seems too short")
                    } else {
                        Ok(())
                    }
                })
                .interact_text()?
        }
    };

    StoredConfig::set_api_key(&key)?;
    println!("\n✓ API key saved successfully");
    println!("  You can now use atlas commands to generate stores.\n");
    Ok(())
}
