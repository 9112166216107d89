// src/collect/batch.rs
// =============================================================================
// Collects an explicit, ordered list of parts.
//
// Strictly one after another: part i+1 is not requested until part i is
// done. A non-empty listing title wins over the post's own title. The first
// failure stops the batch; nothing after it is attempted.
// =============================================================================

use tracing::{info, warn};

use super::{Collector, PostRef};
use crate::fetch::JsonSource;
use crate::observe::{CrawlObserver, CrawlOutcome, Flow};

pub async fn collect_batch<S: JsonSource>(
    collector: &Collector<S>,
    parts: &[PostRef],
    observer: &mut dyn CrawlObserver,
) -> CrawlOutcome {
    let mut posts = Vec::with_capacity(parts.len());

    for (index, part) in parts.iter().enumerate() {
        let mut post = match collector.collect_post(&part.url).await {
            Ok(post) => post,
            Err(error) => {
                warn!(part = index + 1, url = %part.url, %error, "batch stopped");
                observer.failed(part, &error);
                return CrawlOutcome::Failed {
                    posts,
                    target: part.clone(),
                    error,
                };
            }
        };

        if !part.title.is_empty() {
            post.title = part.title.clone();
        }
        posts.push(post);

        if observer.collected(&posts[posts.len() - 1]) == Flow::Abort {
            info!(collected = posts.len(), "batch aborted by observer");
            return CrawlOutcome::Aborted(posts);
        }
    }

    info!(collected = posts.len(), "batch complete");
    observer.done(&posts);
    CrawlOutcome::Done(posts)
}
