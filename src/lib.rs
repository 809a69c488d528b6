// Library root
// -----------
// This crate exposes the pieces the `vision-ledger` binary wires together.
//
// Module responsibilities:
// - `config`: environment-driven settings (API key, endpoint, database path).
// - `encode`: reads an image file and produces its base64 payload.
// - `api`: the blocking HTTP client for the vision chat endpoint.
// - `parser`: splits response text into `name: value` fields.
// - `store`: the SQLite table that grows one text column per field name.
// - `ui`: dialogs, prompts and the loading spinner.
// - `app`: the read/process flow tying all of the above together.
// - `logging`: tracing subscriber setup.
//
// `app` only talks to `ui` and `api` through traits, so the whole flow can
// be driven from tests without a display or network.
pub mod api;
pub mod app;
pub mod config;
pub mod encode;
pub mod error;
pub mod logging;
pub mod parser;
pub mod store;
pub mod ui;
