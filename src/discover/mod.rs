// src/discover/mod.rs
// =============================================================================
// Series discovery: from one starting URL to an ordered list of parts.
//
// Two independent strategies:
// - index: the author keeps a wiki page listing every part
// - follow: each part links to the next one ("Next", "Part 2 >>", ...)
//
// Both go through the same Collector, so a post fetched by one strategy is
// already cached for the other and for the batch collector.
// =============================================================================

mod follow;
mod index;
mod links;

pub use follow::{follow_series, NextLinkMatcher};
pub use index::{discover_from_index, Series};
