//! Configuration module for Lame-Sitemapper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; command line flags are applied on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use lame_sitemapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_DEPTH_LIMIT, MAX_SCRAPER_THREADS};
