// src/discover/follow.rs
// =============================================================================
// Series discovery by following "next" links.
//
// How it works:
// 1. Collect the current post
// 2. Remember its identifier (so we never go back to it)
// 3. Look through its body for the first link whose text matches the
//    pattern AND that points at a post we haven't seen
// 4. Found one? Make it the current post and go to 1. Otherwise we're done.
//
// This is a plain loop with an accumulator rather than recursion, so a
// series with hundreds of parts doesn't grow the stack. Visiting each post
// at most once means a link back to an earlier part ends the chain instead of
// looping forever.
// =============================================================================

use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

use super::links::extract_links;
use crate::canon::{extract_identifier, PostId};
use crate::collect::{Collector, PostRef};
use crate::error::Result;
use crate::fetch::JsonSource;
use crate::observe::{CrawlObserver, CrawlOutcome, Flow};

/// Finds the "next part" link in a post body.
#[derive(Debug, Clone)]
pub struct NextLinkMatcher {
    pattern: Regex,
}

impl NextLinkMatcher {
    /// Compiles `pattern`, always case-insensitive.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    // Returns the href of the first qualifying link, or None
    //
    // A link qualifies when its visible text matches the pattern and it names
    // a post that isn't in `visited`. Links that don't name a post can't be
    // followed, so they never qualify.
    pub fn find_next(&self, html: &str, visited: &[PostId]) -> Option<String> {
        extract_links(html)
            .into_iter()
            .filter(|link| self.pattern.is_match(&link.text))
            .find(|link| match extract_identifier(&link.href) {
                Some(id) => !visited.contains(&id),
                None => {
                    debug!(href = %link.href, "matching link is not a post");
                    false
                }
            })
            .map(|link| link.href)
    }
}

pub async fn follow_series<S: JsonSource>(
    collector: &Collector<S>,
    start_url: &str,
    matcher: &NextLinkMatcher,
    observer: &mut dyn CrawlObserver,
) -> CrawlOutcome {
    let mut posts = Vec::new();
    let mut visited: Vec<PostId> = Vec::new();
    let mut current = start_url.to_string();

    loop {
        let post = match collector.collect_post(&current).await {
            Ok(post) => post,
            Err(error) => {
                warn!(url = %current, %error, "follow stopped");
                let target = PostRef::from_url(current);
                observer.failed(&target, &error);
                return CrawlOutcome::Failed {
                    posts,
                    target,
                    error,
                };
            }
        };

        visited.push(post.name.clone());
        let next = matcher.find_next(&post.content, &visited);
        posts.push(post);

        if observer.collected(&posts[posts.len() - 1]) == Flow::Abort {
            info!(collected = posts.len(), "follow aborted by observer");
            return CrawlOutcome::Aborted(posts);
        }

        match next {
            Some(url) => {
                debug!(%url, "next part");
                if observer.next_url(&url) == Flow::Abort {
                    info!(collected = posts.len(), "follow aborted by observer");
                    return CrawlOutcome::Aborted(posts);
                }
                current = url;
            }
            None => {
                info!(collected = posts.len(), "no further part found");
                observer.done(&posts);
                return CrawlOutcome::Done(posts);
            }
        }
    }
}
