//! CLI domain: parse, route and output only.
//! Walks, filters and checksums live in the tree module.

mod output;
mod parse;
mod route;

pub use output::{format_entry_json, format_entry_text, map_error, CommandOutput};
pub use parse::{Cli, Commands};
pub use route::RunContext;
