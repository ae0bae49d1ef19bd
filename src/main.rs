// Entrypoint for the `atlas` CLI.
// - Keeps `main` small: resolve settings, build one API client, dispatch to
//   the command modules.
// - Ctrl-C cancels the shared token so in-flight waits abort cleanly.
// - Exit codes: 0 on success, 1 on any caught error (auth, network,
//   validation, job failure).

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use atlas_cli::api::AtlasClient;
use atlas_cli::commands::{
    auth, funnels, generate, import, list, products, status, templates, themes,
};
use atlas_cli::config::Settings;

#[derive(Parser)]
#[command(
    name = "atlas",
    version,
    about = "CLI for AI agents to generate and manage Shopify stores via Atlas"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Configure Atlas API authentication
    Auth(auth::AuthArgs),
    /// Generate a new Shopify store from a product URL
    Generate(generate::GenerateArgs),
    /// Check the status of a generation job
    Status(status::StatusArgs),
    /// Import a generated store to Shopify
    Import(import::ImportArgs),
    /// Check the status of an import job
    ImportStatus(import::ImportStatusArgs),
    /// List your generated stores
    List(list::ListArgs),
    /// Show details of a specific store
    Show(list::ShowArgs),
    /// List available Atlas theme templates
    Templates(templates::TemplatesArgs),
    /// List your Shopify themes
    Themes(themes::ThemesArgs),
    /// List your Shopify products
    Products(products::ProductsArgs),
    /// Generate listicles and advertorials (sales funnel pages)
    Funnels(funnels::FunnelsArgs),
    /// Generate a listicle funnel page (shortcut for: funnels generate --type listicle)
    Listicle(funnels::FunnelShortcutArgs),
    /// Generate an advertorial funnel page (shortcut for: funnels generate --type advertorial)
    Advertorial(funnels::FunnelShortcutArgs),
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    if let Err(err) = run(cli, &cancel).await {
        eprintln!("\nError: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, cancel: &CancellationToken) -> anyhow::Result<()> {
    // `auth` manages the stored credentials and must work without a key.
    let command = match cli.command {
        Command::Auth(args) => return auth::run(args).await,
        command => command,
    };

    let settings = Settings::load()?;
    let client = AtlasClient::new(settings)?;

    match command {
        Command::Auth(_) => unreachable!("handled above"),
        Command::Generate(args) => generate::run(&client, cancel, args).await,
        Command::Status(args) => status::run(&client, cancel, args).await,
        Command::Import(args) => import::run(&client, cancel, args).await,
        Command::ImportStatus(args) => import::run_status(&client, args).await,
        Command::List(args) => list::run(&client, args).await,
        Command::Show(args) => list::run_show(&client, args).await,
        Command::Templates(args) => templates::run(&client, args).await,
        Command::Themes(args) => themes::run(&client, args).await,
        Command::Products(args) => products::run(&client, args).await,
        Command::Funnels(args) => funnels::run(&client, cancel, args).await,
        Command::Listicle(args) => funnels::run_shortcut(&client, cancel, "listicle", args).await,
        Command::Advertorial(args) => {
            funnels::run_shortcut(&client, cancel, "advertorial", args).await
        }
    }
}
