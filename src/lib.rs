// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive flow.
//
// Module responsibilities:
// - `api`: the blocking invite client, the request payload, and the
//   outcome classification for HTTP statuses and transport failures.
// - `input`: pure helpers that validate email addresses and normalize
//   redemption codes before they ever reach a request.
// - `output`: the `StatusSink` trait and its terminal implementation,
//   keeping color handling out of the business logic.
// - `ui`: the interactive prompt sequence that ties the above together.
pub mod api;
pub mod input;
pub mod output;
pub mod ui;
