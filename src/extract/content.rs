//! Content extraction
//!
//! Walks the post body in document order and turns every matched element into
//! at most one [`ContentBlock`]. Images are filtered against the blocklist,
//! headings are recognised by their class signature and every other match is
//! treated as a text container: either a body paragraph (possibly carrying
//! inline links) or a list item.
//!
//! Repeated text and repeated links are suppressed through a [`DedupState`].
//! Hrefs embedded by a block are committed to it only once that block is
//! emitted, so a paragraph that falls back to plain text leaves its links free
//! for later blocks.

use crate::driver::{DriverResult, ElementHandle, InlineSegment, PageDriver, RelativePath};
use crate::extract::block::{anchor_html, BlockKind, ContentBlock};
use crate::extract::dedup::DedupState;
use crate::extract::filter::is_blocked_image;
use crate::extract::signatures::SiteSignatures;
use crate::retry::{retry, RetryPolicy};
use std::collections::HashSet;

/// Inline line assembled from a wrapper's children
#[derive(Debug, Default)]
struct InlineMarkup {
    html: String,
    /// Hrefs embedded as anchors, in order
    links: Vec<String>,
}

impl InlineMarkup {
    fn has_link(&self) -> bool {
        !self.links.is_empty()
    }
}

/// Extracts the ordered content of a loaded post page
pub struct ContentExtractor<'a> {
    signatures: &'a SiteSignatures,
    retry: RetryPolicy,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(signatures: &'a SiteSignatures, retry: RetryPolicy) -> Self {
        Self { signatures, retry }
    }

    /// Extracts every content block of the page currently loaded in `driver`
    ///
    /// Never fails: a query that keeps failing yields no blocks and an element
    /// that cannot be read is skipped.
    ///
    /// # Arguments
    ///
    /// * `driver` - Driver with a fully scrolled post page loaded
    /// * `dedup` - Text and link history for the current dedup scope
    ///
    /// # Returns
    ///
    /// Blocks in document order, with blank blocks and repeated list items removed
    pub async fn extract<D: PageDriver>(
        &self,
        driver: &D,
        dedup: &mut DedupState,
    ) -> Vec<ContentBlock> {
        let selector = self.signatures.content_selector();
        let selector = selector.as_str();

        let elements = match retry(&self.retry, "content query", move || driver.locate(selector)).await
        {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!("Content query failed, post will have no content: {}", e);
                return Vec::new();
            }
        };

        tracing::debug!("Content query matched {} elements", elements.len());

        let mut blocks = Vec::with_capacity(elements.len());
        for (position, element) in elements.iter().enumerate() {
            match self.classify(element, dedup).await {
                Ok(Some(block)) => {
                    tracing::trace!("[{}] {}: {}", position, block.kind, preview(&block.value));
                    blocks.push(block);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!("Skipping content element {}: {}", position, e),
            }
        }

        finalize(blocks)
    }

    async fn classify<E: ElementHandle>(
        &self,
        element: &E,
        dedup: &mut DedupState,
    ) -> DriverResult<Option<ContentBlock>> {
        if element.tag_kind().await? == "img" {
            return image_block(element).await;
        }

        let class_attr = element.class_signature().await?;
        if let Some(level) = self.signatures.heading_level(&class_attr) {
            let text = element.text().await?;
            return Ok(Some(ContentBlock::new(BlockKind::Heading(level), text.trim())));
        }

        let bullet = self.signatures.is_list_item(&class_attr);
        let text = element.text().await?;
        let key = text.trim();
        if key.is_empty() {
            return Ok(None);
        }
        if dedup.has_text(key, bullet) {
            tracing::debug!("Skipping repeated text: {}", preview(key));
            return Ok(None);
        }

        let (block, links) = if bullet {
            list_item(element, key, dedup).await
        } else {
            paragraph(element, key, dedup).await
        };

        dedup.record_text(key, bullet);
        dedup.commit_links(links);
        Ok(Some(block))
    }
}

async fn image_block<E: ElementHandle>(element: &E) -> DriverResult<Option<ContentBlock>> {
    let Some(src) = element.attribute("src").await? else {
        return Ok(None);
    };
    let alt = element.attribute("alt").await?.unwrap_or_default();

    if src.trim().is_empty() || is_blocked_image(&src, &alt) {
        tracing::debug!("Skipping blocked image: {}", src);
        return Ok(None);
    }
    Ok(Some(ContentBlock::new(BlockKind::Image, src)))
}

async fn paragraph<E: ElementHandle>(
    element: &E,
    key: &str,
    dedup: &DedupState,
) -> (ContentBlock, Vec<String>) {
    match inline_markup(element, dedup).await {
        Ok(Some(markup)) if markup.has_link() => (
            ContentBlock::new(BlockKind::HyperlinkParagraph, markup.html.trim()),
            markup.links,
        ),
        Ok(_) => (ContentBlock::new(BlockKind::Paragraph, key), Vec::new()),
        Err(e) => {
            tracing::debug!("Inline read failed, keeping plain text: {}", e);
            (ContentBlock::new(BlockKind::Paragraph, key), Vec::new())
        }
    }
}

async fn list_item<E: ElementHandle>(
    element: &E,
    key: &str,
    dedup: &DedupState,
) -> (ContentBlock, Vec<String>) {
    match linked_bullet(element, dedup).await {
        Ok(Some(markup)) => (
            ContentBlock::new(BlockKind::ListItem, markup.html.trim()),
            markup.links,
        ),
        Ok(None) => (ContentBlock::new(BlockKind::ListItem, key), Vec::new()),
        Err(e) => {
            tracing::debug!("Bullet link read failed, keeping plain text: {}", e);
            (ContentBlock::new(BlockKind::ListItem, key), Vec::new())
        }
    }
}

/// Markup for a bullet whose paragraph carries a link not yet embedded
async fn linked_bullet<E: ElementHandle>(
    element: &E,
    dedup: &DedupState,
) -> DriverResult<Option<InlineMarkup>> {
    let Some(paragraph) = element.find_optional(RelativePath::Child("p")).await? else {
        return Ok(None);
    };
    let Some(anchor) = paragraph.find_optional(RelativePath::Descendant("a")).await? else {
        return Ok(None);
    };
    let Some(href) = anchor.attribute("href").await? else {
        return Ok(None);
    };
    if dedup.has_link(&href) {
        return Ok(None);
    }

    match inline_markup(&paragraph, dedup).await {
        Ok(Some(markup)) if markup.links.contains(&href) => return Ok(Some(markup)),
        Ok(_) => {}
        Err(e) => tracing::debug!("Bullet line read failed, using bare anchor: {}", e),
    }

    let text = anchor.text().await?;
    Ok(Some(InlineMarkup {
        html: anchor_html(&href, text.trim()),
        links: vec![href],
    }))
}

/// Assembles the inline line under `container`'s `span` wrapper
///
/// Text nodes are kept as they are. Returns `None` when there is no wrapper.
/// Anchors whose href is already
/// embedded in the scope (or earlier on the same line) contribute their plain
/// text only.
async fn inline_markup<E: ElementHandle>(
    container: &E,
    dedup: &DedupState,
) -> DriverResult<Option<InlineMarkup>> {
    let Some(wrapper) = container.find_optional(RelativePath::Child("span")).await? else {
        return Ok(None);
    };

    let mut markup = InlineMarkup::default();
    let mut embedded: HashSet<String> = HashSet::new();

    for segment in wrapper.inline_segments().await? {
        let child = match segment {
            InlineSegment::Text(text) => {
                markup.html.push_str(&text);
                continue;
            }
            InlineSegment::Element(child) => child,
        };

        let text = child.text().await?;
        if child.tag_kind().await? != "a" {
            markup.html.push_str(&text);
            continue;
        }

        match child.attribute("href").await? {
            Some(href) if !dedup.has_link(&href) && !embedded.contains(&href) => {
                markup.html.push_str(&anchor_html(&href, &text));
                embedded.insert(href.clone());
                markup.links.push(href);
            }
            _ => markup.html.push_str(&text),
        }
    }

    Ok(Some(markup))
}

/// Drops blank blocks and repeated list items (first one wins)
pub fn finalize(blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    let mut list_values: HashSet<String> = HashSet::new();
    blocks
        .into_iter()
        .filter(|block| !block.is_blank())
        .filter(|block| block.kind != BlockKind::ListItem || list_values.insert(block.value.clone()))
        .collect()
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 60;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let cut: String = text.chars().take(LIMIT).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::StaticDriver;
    use crate::extract::block::HeadingLevel;

    const POST_URL: &str = "https://www.pathloom.com/post/spring-garden";
    const PARAGRAPH: &str = "-XFiF FMjBj sw7z0 bfpEf";
    const H2: &str = "edXX- QdIE9 sw7z0 bfpEf";
    const H3: &str = "_6Aw8R NfA7j rIsue QMtOy";

    fn page(body: &str) -> String {
        format!("<html><body><article>{}</article></body></html>", body)
    }

    fn paragraph_html(inner: &str) -> String {
        format!(r#"<p class="{}"><span>{}</span></p>"#, PARAGRAPH, inner)
    }

    fn image_html(src: &str, alt: &str) -> String {
        format!(r#"<wow-image><img src="{}" alt="{}"></wow-image>"#, src, alt)
    }

    async fn extract_page(body: &str) -> Vec<ContentBlock> {
        let driver = StaticDriver::from_html(Some(POST_URL), &page(body));
        let extractor = ContentExtractor::new(SiteSignatures::latest(), RetryPolicy::once());
        extractor.extract(&driver, &mut DedupState::new()).await
    }

    fn h(level: u8) -> BlockKind {
        BlockKind::Heading(HeadingLevel::new(level).unwrap())
    }

    #[tokio::test]
    async fn test_duplicate_paragraph_is_dropped() {
        let body = format!(
            r#"<h2 class="{}">Intro</h2>{}{}{}"#,
            H2,
            paragraph_html("<span>Hello world</span>"),
            image_html("https://static.site.com/media/garden.jpg", "Garden"),
            paragraph_html("<span>Hello world</span>"),
        );

        let blocks = extract_page(&body).await;
        assert_eq!(
            blocks,
            vec![
                ContentBlock::new(h(2), "Intro"),
                ContentBlock::new(BlockKind::Paragraph, "Hello world"),
                ContentBlock::new(BlockKind::Image, "https://static.site.com/media/garden.jpg"),
            ]
        );
    }

    #[tokio::test]
    async fn test_logo_image_is_dropped() {
        let body = format!(
            "{}{}{}",
            image_html("https://static.site.com/media/site-logo.png", ""),
            paragraph_html("<span>Body text</span>"),
            image_html("https://static.site.com/media/face.jpg", "Writer's picture"),
        );

        let blocks = extract_page(&body).await;
        assert_eq!(blocks, vec![ContentBlock::new(BlockKind::Paragraph, "Body text")]);
    }

    #[tokio::test]
    async fn test_document_order_is_preserved() {
        let body = format!(
            r#"{}<h3 class="{}">Second</h3>{}<ul><li class="NdNAj"><p>Fourth</p></li></ul>"#,
            paragraph_html("<span>First</span>"),
            H3,
            image_html("https://static.site.com/media/third.jpg", ""),
        );

        let kinds: Vec<BlockKind> = extract_page(&body)
            .await
            .into_iter()
            .map(|block| block.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Paragraph, h(3), BlockKind::Image, BlockKind::ListItem]
        );
    }

    #[tokio::test]
    async fn test_hyperlink_paragraph() {
        let body = paragraph_html(
            r#"<span>See </span><a href="https://ref.example.com/guide">the guide</a><span> first.</span>"#,
        );

        let blocks = extract_page(&body).await;
        assert_eq!(
            blocks,
            vec![ContentBlock::new(
                BlockKind::HyperlinkParagraph,
                r#"See <a href="https://ref.example.com/guide" target="_blank" rel="noopener">the guide</a> first."#
            )]
        );
    }

    #[tokio::test]
    async fn test_bare_text_around_link_is_kept() {
        let body = paragraph_html(r#"See <a href="https://ref.example.com/g">the guide</a> first."#);

        let blocks = extract_page(&body).await;
        assert_eq!(
            blocks,
            vec![ContentBlock::new(
                BlockKind::HyperlinkParagraph,
                r#"See <a href="https://ref.example.com/g" target="_blank" rel="noopener">the guide</a> first."#
            )]
        );
    }

    #[tokio::test]
    async fn test_repeated_link_is_embedded_once() {
        let body = format!(
            "{}{}",
            paragraph_html(r#"<span>Read </span><a href="https://ref.example.com/a">this</a>"#),
            paragraph_html(r#"<span>Again </span><a href="https://ref.example.com/a">this</a><span> here</span>"#),
        );

        let blocks = extract_page(&body).await;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::HyperlinkParagraph);
        assert_eq!(blocks[1], ContentBlock::new(BlockKind::Paragraph, "Again this here"));

        let embedding = blocks
            .iter()
            .filter(|block| block.value.contains("href=\"https://ref.example.com/a\""))
            .count();
        assert_eq!(embedding, 1);
    }

    #[tokio::test]
    async fn test_same_link_twice_on_one_line() {
        let body = paragraph_html(
            r#"<a href="https://ref.example.com/a">one</a><span> and </span><a href="https://ref.example.com/a">two</a>"#,
        );

        let blocks = extract_page(&body).await;
        assert_eq!(
            blocks[0].value,
            r#"<a href="https://ref.example.com/a" target="_blank" rel="noopener">one</a> and two"#
        );
    }

    #[tokio::test]
    async fn test_paragraph_without_wrapper_is_plain() {
        let body = format!(r#"<p class="{}">No wrapper here</p>"#, PARAGRAPH);
        let blocks = extract_page(&body).await;
        assert_eq!(blocks, vec![ContentBlock::new(BlockKind::Paragraph, "No wrapper here")]);
    }

    #[tokio::test]
    async fn test_bullets() {
        let body = r#"<ul>
            <li class="NdNAj"><p><span><span>Read </span><a href="https://ref.example.com/b">this</a></span></p></li>
            <li class="NdNAj"><p><span><span>Also </span><a href="https://ref.example.com/b">that</a></span></p></li>
            <li class="B229E"><p>Plain point</p></li>
        </ul>"#;

        let blocks = extract_page(body).await;
        assert_eq!(
            blocks,
            vec![
                ContentBlock::new(
                    BlockKind::ListItem,
                    r#"Read <a href="https://ref.example.com/b" target="_blank" rel="noopener">this</a>"#
                ),
                ContentBlock::new(BlockKind::ListItem, "Also that"),
                ContentBlock::new(BlockKind::ListItem, "Plain point"),
            ]
        );
    }

    #[tokio::test]
    async fn test_bullet_with_bare_anchor() {
        let body = r#"<ul><li class="NdNAj"><p><a href="https://ref.example.com/c">Only a link</a></p></li></ul>"#;
        let blocks = extract_page(body).await;
        assert_eq!(
            blocks,
            vec![ContentBlock::new(
                BlockKind::ListItem,
                r#"<a href="https://ref.example.com/c" target="_blank" rel="noopener">Only a link</a>"#
            )]
        );
    }

    #[tokio::test]
    async fn test_list_and_paragraph_text_deduped_separately() {
        let body = format!(
            r#"{}<ul><li class="NdNAj"><p>Shared line</p></li><li class="NdNAj"><p>Shared line</p></li></ul>"#,
            paragraph_html("<span>Shared line</span>"),
        );

        let blocks = extract_page(&body).await;
        assert_eq!(
            blocks,
            vec![
                ContentBlock::new(BlockKind::Paragraph, "Shared line"),
                ContentBlock::new(BlockKind::ListItem, "Shared line"),
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_elements_are_removed() {
        let body = format!(
            r#"<h2 class="{}">   </h2>{}"#,
            H2,
            paragraph_html("<span>  </span>")
        );
        assert!(extract_page(&body).await.is_empty());
    }

    #[tokio::test]
    async fn test_hidden_overlays_are_not_extracted() {
        let body = format!(
            r#"<div class="MS7sOC">{}</div>{}"#,
            paragraph_html("<span>Subscribe to the newsletter</span>"),
            paragraph_html("<span>Real content</span>"),
        );
        let driver = StaticDriver::from_html(Some(POST_URL), &page(&body));
        driver
            .hide_elements(SiteSignatures::latest().overlays)
            .await
            .unwrap();

        let extractor = ContentExtractor::new(SiteSignatures::latest(), RetryPolicy::once());
        let blocks = extractor.extract(&driver, &mut DedupState::new()).await;
        assert_eq!(blocks, vec![ContentBlock::new(BlockKind::Paragraph, "Real content")]);
    }

    #[tokio::test]
    async fn test_shared_state_dedups_across_pages() {
        let body = format!(
            r#"<h2 class="{}">Title</h2>{}"#,
            H2,
            paragraph_html(r#"<span>Footer </span><a href="https://ref.example.com/about">about us</a>"#),
        );
        let driver = StaticDriver::from_html(Some(POST_URL), &page(&body));
        let extractor = ContentExtractor::new(SiteSignatures::latest(), RetryPolicy::once());
        let mut state = DedupState::new();

        let first = extractor.extract(&driver, &mut state).await;
        assert_eq!(first.len(), 2);

        let second = extractor.extract(&driver, &mut state).await;
        assert_eq!(second, vec![ContentBlock::new(h(2), "Title")]);
    }

    #[tokio::test]
    async fn test_no_page_yields_no_blocks() {
        let driver = StaticDriver::with_client(reqwest::Client::new());
        let extractor = ContentExtractor::new(SiteSignatures::latest(), RetryPolicy::once());
        assert!(extractor.extract(&driver, &mut DedupState::new()).await.is_empty());
    }

    /// Hand-built element tree; `broken` elements fail tag and attribute reads
    #[derive(Debug, Clone, Default)]
    struct FakeElement {
        tag: &'static str,
        class: &'static str,
        href: Option<&'static str>,
        broken: bool,
        content: Vec<FakeNode>,
    }

    #[derive(Debug, Clone)]
    enum FakeNode {
        Text(&'static str),
        Element(FakeElement),
    }

    impl FakeElement {
        fn new(tag: &'static str, content: Vec<FakeNode>) -> Self {
            Self {
                tag,
                content,
                ..Self::default()
            }
        }

        fn children(&self) -> Vec<FakeElement> {
            self.content
                .iter()
                .filter_map(|node| match node {
                    FakeNode::Element(el) => Some(el.clone()),
                    FakeNode::Text(_) => None,
                })
                .collect()
        }

        fn plain_text(&self) -> String {
            self.content
                .iter()
                .map(|node| match node {
                    FakeNode::Text(text) => text.to_string(),
                    FakeNode::Element(el) => el.plain_text(),
                })
                .collect()
        }

        fn detached(&self) -> DriverResult<()> {
            if self.broken {
                Err(crate::driver::DriverError::Element("node detached".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn text(value: &'static str) -> FakeNode {
        FakeNode::Text(value)
    }

    fn anchor(href: &'static str, label: &'static str) -> FakeNode {
        FakeNode::Element(FakeElement {
            href: Some(href),
            ..FakeElement::new("a", vec![text(label)])
        })
    }

    fn span(content: Vec<FakeNode>) -> FakeNode {
        FakeNode::Element(FakeElement::new("span", content))
    }

    fn fake_paragraph(content: Vec<FakeNode>) -> FakeElement {
        FakeElement {
            class: PARAGRAPH,
            ..FakeElement::new("p", vec![span(content)])
        }
    }

    #[async_trait::async_trait]
    impl ElementHandle for FakeElement {
        async fn tag_kind(&self) -> DriverResult<String> {
            self.detached()?;
            Ok(self.tag.to_string())
        }

        async fn text(&self) -> DriverResult<String> {
            Ok(self.plain_text())
        }

        async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
            self.detached()?;
            Ok(match name {
                "class" => Some(self.class.to_string()),
                "href" => self.href.map(str::to_string),
                _ => None,
            })
        }

        async fn locate_all(&self, path: RelativePath<'_>) -> DriverResult<Vec<Self>> {
            Ok(match path {
                RelativePath::Children => self.children(),
                RelativePath::Child(tag) => self
                    .children()
                    .into_iter()
                    .filter(|el| el.tag == tag)
                    .collect(),
                RelativePath::Descendant(tag) => {
                    let mut found = Vec::new();
                    let mut stack = self.children();
                    stack.reverse();
                    while let Some(el) = stack.pop() {
                        let mut nested = el.children();
                        nested.reverse();
                        if el.tag == tag {
                            found.push(el);
                        }
                        stack.extend(nested);
                    }
                    found
                }
            })
        }

        async fn inline_segments(&self) -> DriverResult<Vec<InlineSegment<Self>>> {
            Ok(self
                .content
                .iter()
                .map(|node| match node {
                    FakeNode::Text(text) => InlineSegment::Text(text.to_string()),
                    FakeNode::Element(el) => InlineSegment::Element(el.clone()),
                })
                .collect())
        }
    }

    /// A loaded page whose content query returns a fixed element list
    struct FakePage {
        elements: Vec<FakeElement>,
    }

    #[async_trait::async_trait]
    impl PageDriver for FakePage {
        type Element = FakeElement;

        async fn navigate(&self, _url: &str) -> DriverResult<()> {
            Ok(())
        }

        async fn locate(&self, _selector: &str) -> DriverResult<Vec<FakeElement>> {
            Ok(self.elements.clone())
        }

        async fn run_script(&self, _code: &str) -> DriverResult<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    async fn extract_fake(elements: Vec<FakeElement>) -> Vec<ContentBlock> {
        let page = FakePage { elements };
        let extractor = ContentExtractor::new(SiteSignatures::latest(), RetryPolicy::once());
        extractor.extract(&page, &mut DedupState::new()).await
    }

    #[tokio::test]
    async fn test_half_read_paragraph_leaves_link_free() {
        let broken = FakeNode::Element(FakeElement {
            broken: true,
            ..FakeElement::new("span", vec![text(" later")])
        });
        let first = fake_paragraph(vec![anchor("https://ref.example.com/g", "the guide"), broken]);
        let second = fake_paragraph(vec![
            text("Read "),
            anchor("https://ref.example.com/g", "the guide"),
        ]);

        let blocks = extract_fake(vec![first, second]).await;
        assert_eq!(
            blocks,
            vec![
                ContentBlock::new(BlockKind::Paragraph, "the guide later"),
                ContentBlock::new(
                    BlockKind::HyperlinkParagraph,
                    r#"Read <a href="https://ref.example.com/g" target="_blank" rel="noopener">the guide</a>"#
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_unreadable_bullet_link_keeps_plain_text() {
        let broken_anchor = FakeNode::Element(FakeElement {
            broken: true,
            href: Some("https://ref.example.com/b"),
            ..FakeElement::new("a", vec![text("the list")])
        });
        let first = FakeElement {
            class: "NdNAj",
            ..FakeElement::new(
                "li",
                vec![FakeNode::Element(FakeElement::new(
                    "p",
                    vec![text("See "), broken_anchor],
                ))],
            )
        };
        let second = FakeElement {
            class: "NdNAj",
            ..FakeElement::new(
                "li",
                vec![FakeNode::Element(FakeElement::new(
                    "p",
                    vec![span(vec![text("Open "), anchor("https://ref.example.com/b", "it")])],
                ))],
            )
        };

        let blocks = extract_fake(vec![first, second]).await;
        assert_eq!(
            blocks,
            vec![
                ContentBlock::new(BlockKind::ListItem, "See the list"),
                ContentBlock::new(
                    BlockKind::ListItem,
                    r#"Open <a href="https://ref.example.com/b" target="_blank" rel="noopener">it</a>"#
                ),
            ]
        );
    }

    #[test]
    fn test_finalize_collapses_list_items_only() {
        let blocks = vec![
            ContentBlock::new(BlockKind::ListItem, "Point"),
            ContentBlock::new(BlockKind::Paragraph, "Same"),
            ContentBlock::new(BlockKind::ListItem, "Point"),
            ContentBlock::new(BlockKind::Paragraph, "Same"),
            ContentBlock::new(BlockKind::Image, " "),
        ];
        assert_eq!(
            finalize(blocks),
            vec![
                ContentBlock::new(BlockKind::ListItem, "Point"),
                ContentBlock::new(BlockKind::Paragraph, "Same"),
                ContentBlock::new(BlockKind::Paragraph, "Same"),
            ]
        );
    }
}
