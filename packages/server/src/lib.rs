// Themed Catalog Scraper - API Core
//
// This crate provides the backend API for theme-driven catalog scraping:
// a caller submits a theme, gets a job id back immediately, and polls for
// the scraped + enriched listings while the pipeline runs in the background.

pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
