//! Static page driver
//!
//! Fetches pages over plain HTTP and answers element queries from the parsed
//! HTML. Scripts do not run, so this only sees what the server renders. That
//! covers server-rendered mirrors and saved snapshots, and makes every step of
//! the pipeline testable against fixed markup.
//!
//! A loaded page is kept as a [`Snapshot`]: an arena of elements in document
//! order, each with its attributes and its mixed text/element content.
//! Selector matching re-parses the source with `scraper`, because the parsed
//! tree itself cannot be shared across tasks.

use crate::config::BrowserConfig;
use crate::driver::{
    DriverError, DriverResult, ElementHandle, InlineSegment, PageDriver, RelativePath,
};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Elements whose text never shows up in rendered output
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Builds the HTTP client used by the static driver
///
/// # Example
///
/// ```no_run
/// use pathloom_export::config::BrowserConfig;
/// use pathloom_export::driver::build_http_client;
///
/// let client = build_http_client(&BrowserConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BrowserConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[derive(Debug)]
enum Segment {
    Text(String),
    Element(usize),
}

#[derive(Debug)]
struct SnapshotNode {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    content: Vec<Segment>,
}

/// One loaded page
#[derive(Debug)]
pub struct Snapshot {
    url: Option<Url>,
    source: String,
    nodes: Vec<SnapshotNode>,
    hidden: RwLock<HashSet<usize>>,
}

impl Snapshot {
    fn parse(url: Option<Url>, source: String) -> Self {
        let document = Html::parse_document(&source);
        let elements: Vec<ElementRef<'_>> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();
        let index: HashMap<_, usize> = elements
            .iter()
            .enumerate()
            .map(|(i, el)| (el.id(), i))
            .collect();

        let nodes = elements
            .iter()
            .map(|el| {
                let parent = el.parent().and_then(|p| index.get(&p.id()).copied());
                let content = el
                    .children()
                    .filter_map(|child| match child.value() {
                        Node::Text(text) => Some(Segment::Text((**text).to_owned())),
                        Node::Element(_) => index.get(&child.id()).copied().map(Segment::Element),
                        _ => None,
                    })
                    .collect();
                SnapshotNode {
                    tag: el.value().name().to_string(),
                    attributes: el
                        .value()
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                    parent,
                    content,
                }
            })
            .collect();

        Self {
            url,
            source,
            nodes,
            hidden: RwLock::new(HashSet::new()),
        }
    }

    /// Indices of elements matching `selector`, in document order
    fn select(&self, selector: &str) -> DriverResult<Vec<usize>> {
        let parsed = Selector::parse(selector).map_err(|e| DriverError::Query {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;

        let document = Html::parse_document(&self.source);
        let order: HashMap<_, usize> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .map(|(i, el)| (el.id(), i))
            .collect();

        // select() walks nodes in creation order, which the parser's tree
        // fixups (foster parenting, adoption agency) can make differ from
        // document order
        let mut matched: Vec<usize> = document
            .select(&parsed)
            .filter_map(|el| order.get(&el.id()).copied())
            .filter(|&i| !self.is_hidden(i))
            .collect();
        matched.sort_unstable();
        Ok(matched)
    }

    fn hide(&self, indices: &[usize]) {
        let mut hidden = self.hidden.write().unwrap_or_else(|e| e.into_inner());
        hidden.extend(indices.iter().copied());
    }

    /// True when the element or one of its ancestors is hidden
    fn is_hidden(&self, index: usize) -> bool {
        let hidden = self.hidden.read().unwrap_or_else(|e| e.into_inner());
        if hidden.is_empty() {
            return false;
        }
        let mut current = Some(index);
        while let Some(i) = current {
            if hidden.contains(&i) {
                return true;
            }
            current = self.nodes.get(i).and_then(|node| node.parent);
        }
        false
    }

    fn node(&self, index: usize) -> DriverResult<&SnapshotNode> {
        self.nodes
            .get(index)
            .ok_or_else(|| DriverError::Element(format!("stale element index {}", index)))
    }

    fn attribute(&self, index: usize, name: &str) -> DriverResult<Option<String>> {
        let node = self.node(index)?;
        let raw = node
            .attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.clone());

        Ok(match (raw, name) {
            (Some(value), "href" | "src") => Some(self.resolve(&value)),
            (raw, _) => raw,
        })
    }

    fn resolve(&self, value: &str) -> String {
        self.url
            .as_ref()
            .and_then(|base| base.join(value).ok())
            .map(String::from)
            .unwrap_or_else(|| value.to_string())
    }

    fn element_children(&self, index: usize) -> DriverResult<Vec<usize>> {
        let node = self.node(index)?;
        let hidden = self.hidden.read().unwrap_or_else(|e| e.into_inner());
        Ok(node
            .content
            .iter()
            .filter_map(|segment| match segment {
                Segment::Element(child) if !hidden.contains(child) => Some(*child),
                _ => None,
            })
            .collect())
    }

    fn collect_descendants(&self, index: usize, tag: &str, out: &mut Vec<usize>) -> DriverResult<()> {
        for child in self.element_children(index)? {
            if self.node(child)?.tag == tag {
                out.push(child);
            }
            self.collect_descendants(child, tag, out)?;
        }
        Ok(())
    }

    fn locate_relative(&self, index: usize, path: RelativePath<'_>) -> DriverResult<Vec<usize>> {
        match path {
            RelativePath::Child(tag) => {
                let children = self.element_children(index)?;
                Ok(children
                    .into_iter()
                    .filter(|&child| self.nodes[child].tag == tag)
                    .collect())
            }
            RelativePath::Children => self.element_children(index),
            RelativePath::Descendant(tag) => {
                let mut found = Vec::new();
                self.collect_descendants(index, tag, &mut found)?;
                Ok(found)
            }
        }
    }

    /// Text nodes and visible element children, in order
    fn segments(&self, index: usize) -> DriverResult<Vec<InlineSegment<usize>>> {
        if self.is_hidden(index) {
            return Ok(Vec::new());
        }
        let node = self.node(index)?;
        let hidden = self.hidden.read().unwrap_or_else(|e| e.into_inner());
        Ok(node
            .content
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(InlineSegment::Text(collapse_whitespace(text))),
                Segment::Element(child) if !hidden.contains(child) => {
                    Some(InlineSegment::Element(*child))
                }
                Segment::Element(_) => None,
            })
            .collect())
    }

    /// Rendered text: hidden and non-rendered subtrees skipped, whitespace collapsed
    fn text(&self, index: usize) -> DriverResult<String> {
        if self.is_hidden(index) {
            return Ok(String::new());
        }
        let hidden = self.hidden.read().unwrap_or_else(|e| e.into_inner());
        let mut raw = String::new();
        self.push_text(index, &hidden, &mut raw)?;
        Ok(collapse_whitespace(&raw))
    }

    fn push_text(&self, index: usize, hidden: &HashSet<usize>, out: &mut String) -> DriverResult<()> {
        let node = self.node(index)?;
        if NON_RENDERED.contains(&node.tag.as_str()) {
            return Ok(());
        }
        if node.tag == "br" {
            out.push('\n');
            return Ok(());
        }
        for segment in &node.content {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Element(child) if !hidden.contains(child) => {
                    self.push_text(*child, hidden, out)?
                }
                Segment::Element(_) => {}
            }
        }
        Ok(())
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// An element of a [`Snapshot`]
#[derive(Debug, Clone)]
pub struct StaticElement {
    snapshot: Arc<Snapshot>,
    index: usize,
}

#[async_trait]
impl ElementHandle for StaticElement {
    async fn tag_kind(&self) -> DriverResult<String> {
        Ok(self.snapshot.node(self.index)?.tag.clone())
    }

    async fn text(&self) -> DriverResult<String> {
        self.snapshot.text(self.index)
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.snapshot.attribute(self.index, name)
    }

    async fn locate_all(&self, path: RelativePath<'_>) -> DriverResult<Vec<Self>> {
        Ok(self
            .snapshot
            .locate_relative(self.index, path)?
            .into_iter()
            .map(|index| StaticElement {
                snapshot: Arc::clone(&self.snapshot),
                index,
            })
            .collect())
    }

    async fn inline_segments(&self) -> DriverResult<Vec<InlineSegment<Self>>> {
        Ok(self
            .snapshot
            .segments(self.index)?
            .into_iter()
            .map(|segment| match segment {
                InlineSegment::Text(text) => InlineSegment::Text(text),
                InlineSegment::Element(index) => InlineSegment::Element(StaticElement {
                    snapshot: Arc::clone(&self.snapshot),
                    index,
                }),
            })
            .collect())
    }
}

/// Page driver over plain HTTP
pub struct StaticDriver {
    client: Client,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl StaticDriver {
    /// Creates a driver with an HTTP client built from `config`
    pub fn new(config: &BrowserConfig) -> DriverResult<Self> {
        let client = build_http_client(config).map_err(|e| DriverError::Browser(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            current: RwLock::new(None),
        }
    }

    /// Loads markup directly, as if `url` had been navigated to
    pub fn load_html(&self, url: Option<&str>, html: &str) {
        let base = url.and_then(|u| Url::parse(u).ok());
        self.replace(Snapshot::parse(base, html.to_string()));
    }

    /// Creates a driver with `html` already loaded
    pub fn from_html(url: Option<&str>, html: &str) -> Self {
        let driver = Self::with_client(Client::new());
        driver.load_html(url, html);
        driver
    }

    fn replace(&self, snapshot: Snapshot) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(Arc::new(snapshot));
    }

    fn snapshot(&self) -> DriverResult<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(DriverError::NoPage)
    }

    fn elements(snapshot: &Arc<Snapshot>, indices: Vec<usize>) -> Vec<StaticElement> {
        indices
            .into_iter()
            .map(|index| StaticElement {
                snapshot: Arc::clone(snapshot),
                index,
            })
            .collect()
    }
}

#[async_trait]
impl PageDriver for StaticDriver {
    type Element = StaticElement;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DriverError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriverError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|source| DriverError::Http {
            url: url.to_string(),
            source,
        })?;

        tracing::trace!("Loaded {} ({} bytes)", final_url, body.len());
        self.replace(Snapshot::parse(Some(final_url), body));
        Ok(())
    }

    async fn locate(&self, selector: &str) -> DriverResult<Vec<StaticElement>> {
        let snapshot = self.snapshot()?;
        let indices = snapshot.select(selector)?;
        Ok(Self::elements(&snapshot, indices))
    }

    async fn run_script(&self, code: &str) -> DriverResult<serde_json::Value> {
        tracing::trace!("Static driver ignores script: {}", code);
        Ok(serde_json::Value::Null)
    }

    async fn wait_for_elements(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> DriverResult<Vec<StaticElement>> {
        // Static markup never changes, so one look decides it
        let found = self.locate(selector).await?;
        if found.is_empty() {
            return Err(DriverError::Timeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis(),
            });
        }
        Ok(found)
    }

    async fn hide_elements(&self, selector: &str) -> DriverResult<()> {
        let snapshot = self.snapshot()?;
        let indices = snapshot.select(selector)?;
        snapshot.hide(&indices);
        Ok(())
    }
}
