//! Suppression of repeated text and links

use std::collections::HashSet;

/// Text keys and hrefs already emitted in the current dedup scope
///
/// Paragraph text and list-item text live in separate sets, so a bullet that
/// repeats a paragraph is still emitted.
#[derive(Debug, Default, Clone)]
pub struct DedupState {
    paragraphs: HashSet<String>,
    list_items: HashSet<String>,
    links: HashSet<String>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_text(&self, key: &str, bullet: bool) -> bool {
        if bullet {
            self.list_items.contains(key)
        } else {
            self.paragraphs.contains(key)
        }
    }

    pub fn record_text(&mut self, key: &str, bullet: bool) {
        let set = if bullet {
            &mut self.list_items
        } else {
            &mut self.paragraphs
        };
        set.insert(key.to_string());
    }

    pub fn has_link(&self, href: &str) -> bool {
        self.links.contains(href)
    }

    pub fn commit_links<I>(&mut self, hrefs: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.links.extend(hrefs);
    }
}
