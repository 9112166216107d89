// src/lib.rs
// =============================================================================
// series-crawler: discover and collect a serialized series of forum posts.
//
// Layers, bottom up:
// - canon: post identity and URL normalization
// - fetch: rate-limited HTTP source + session cache
// - collect: one post at a time, or an explicit batch
// - discover: index-page and next-link strategies
// - observe: progress callbacks and how a crawl ended
// - export: the title page + sections handed to a document builder
//
// The binary (main.rs) wires these to the command line.
// =============================================================================

pub mod canon;
pub mod collect;
pub mod config;
pub mod discover;
pub mod error;
pub mod export;
pub mod fetch;
pub mod observe;

pub use error::{CrawlError, Result};
