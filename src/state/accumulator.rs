//! Run-wide post accumulator

use crate::state::Post;
use std::sync::{Mutex, MutexGuard};

/// Ordered, append-only list of the posts scraped in one run
///
/// Shared by reference between the crawl and the flush path, so posts
/// appended before an interruption are still written out.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    posts: Mutex<Vec<Post>>,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Post>> {
        self.posts.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, post: Post) {
        self.lock().push(post);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the posts appended so far, in order
    pub fn snapshot(&self) -> Vec<Post> {
        self.lock().clone()
    }
}
