pub mod args;
pub mod cli;
pub mod config;
pub mod import;
pub mod ledger;
pub mod notion_api;
pub mod schema;
mod terminal;
