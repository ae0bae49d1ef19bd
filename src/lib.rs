// Library root
// -----------
// This crate exposes a small library surface for the `atlas` CLI. The binary
// (`main.rs`) wires these modules together; programmatic users can depend on
// the library instead and drive `api::AtlasClient` plus
// `poll::wait_for_completion` directly.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with the Atlas service (store
//   generation, import, funnels, listings) behind typed methods.
// - `poll`: The generic bounded polling loop shared by all job families.
// - `config`: API key / base URL resolution (environment > config file >
//   built-in default) and the persisted config file.
// - `error`: The `AtlasError` taxonomy every fallible call returns.
// - `ui`: Spinners and terminal rendering used by the command modules.
// - `commands`: One module per CLI subcommand.
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod poll;
pub mod ui;
