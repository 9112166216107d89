// src/collect/mod.rs
// =============================================================================
// Turning post references into fetched posts.
//
// Submodules:
// - post: PostRef / Post types and the single-post Collector
// - batch: Collects an explicit list of parts in order
// =============================================================================

mod batch;
mod post;

pub use batch::collect_batch;
pub use post::{Collector, Post, PostRef};
