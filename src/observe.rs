// src/observe.rs
// =============================================================================
// How callers watch (and stop) a crawl.
//
// The link-following strategy and the batch collector both run a loop that
// reports each step to a `CrawlObserver`:
//
//   next_url  -> a successor link was found, not yet followed
//   collected -> a post was fetched
//   failed    -> a fetch or parse failed; the loop stops
//   done      -> nothing left to fetch; carries every collected post
//
// `next_url` and `collected` return a `Flow`. Returning `Flow::Abort` ends the
// loop without that counting as an error, so the final `CrawlOutcome` always
// says which of the three endings happened.
// =============================================================================

use crate::collect::{Post, PostRef};
use crate::error::CrawlError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Receives progress from a crawl loop. Every method has a no-op default.
pub trait CrawlObserver {
    fn next_url(&mut self, _url: &str) -> Flow {
        Flow::Continue
    }

    fn collected(&mut self, _post: &Post) -> Flow {
        Flow::Continue
    }

    fn failed(&mut self, _target: &PostRef, _error: &CrawlError) {}

    fn done(&mut self, _posts: &[Post]) {}
}

/// How a crawl loop ended.
#[derive(Debug)]
pub enum CrawlOutcome {
    /// Ran to the end
    Done(Vec<Post>),
    /// An observer returned `Flow::Abort`
    Aborted(Vec<Post>),
    /// A fetch failed; `posts` holds everything collected before it
    Failed {
        posts: Vec<Post>,
        target: PostRef,
        error: CrawlError,
    },
}

impl CrawlOutcome {
    pub fn posts(&self) -> &[Post] {
        match self {
            Self::Done(posts) | Self::Aborted(posts) => posts,
            Self::Failed { posts, .. } => posts,
        }
    }

    pub fn into_posts(self) -> Vec<Post> {
        match self {
            Self::Done(posts) | Self::Aborted(posts) => posts,
            Self::Failed { posts, .. } => posts,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}
