// One module per CLI subcommand. Each exposes its clap args struct and an
// async `run` function; `main.rs` does the dispatch. Commands print their
// own human/JSON output and return `Err` only for transport-level failures;
// a job that terminates in `failed` is printed and exits with code 1
// without going through the error channel.
pub mod auth;
pub mod funnels;
pub mod generate;
pub mod import;
pub mod list;
pub mod products;
pub mod status;
pub mod templates;
pub mod themes;
