//! WordPress import document
//!
//! Each post becomes a `<blog>` element. Its `<content>` child carries the
//! post body as WordPress block markup inside CDATA, opened by a header with
//! the publication date and the author.

use crate::extract::{BlockKind, ContentBlock};
use crate::output::{OutputError, OutputResult};
use crate::state::Post;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const GROUP_OPEN: &str = concat!(
    r#"<!-- wp:group {"style":{"spacing":{"blockGap":"var:preset|spacing|40"}},"layout":{"type":"constrained"}} -->"#,
    "\n",
    r#"<div class="wp-block-group"><!-- wp:group {"style":{"spacing":{"margin":{"top":"0","bottom":"0"}}},"layout":{"type":"constrained"}} -->"#,
    "\n",
);

const GROUP_CLOSE: &str = "<!-- /wp:group --></div>\n<!-- /wp:group -->\n";

/// Renders a post's body as WordPress block markup
///
/// Block values are inserted as they are; paragraph values may already hold
/// anchor markup.
pub fn render_content(post: &Post, image_caption: &str) -> String {
    let mut out = String::from(GROUP_OPEN);

    out.push_str(r#"<div class="wp-block-group" style="margin-top:0;margin-bottom:0"><!-- wp:group {"layout":{"type":"flex","flexWrap":"nowrap"}} -->"#);
    out.push('\n');
    out.push_str(r#"<div class="wp-block-group"><!-- wp:paragraph {"fontSize":"small"} -->"#);
    out.push('\n');
    out.push_str(&format!(
        "<p class=\"has-small-font-size\">Published: {}</p>\n<!-- /wp:paragraph -->\n",
        post.date
    ));
    out.push_str("<!-- wp:paragraph {\"fontSize\":\"small\"} -->\n");
    out.push_str(&format!(
        "<p class=\"has-small-font-size\">Edited: {}</p>\n<!-- /wp:paragraph --></div>\n<!-- /wp:group -->\n",
        post.date
    ));

    out.push_str("<!-- wp:group {\"layout\":{\"type\":\"flex\",\"flexWrap\":\"nowrap\"}} -->\n");
    out.push_str(&format!(
        "<div class=\"wp-block-group\"><!-- wp:paragraph -->\n<p>Writer: {}</p>\n<!-- /wp:paragraph -->\n",
        post.author
    ));
    out.push_str(&format!(
        "<!-- wp:paragraph -->\n<p>Editor: {}</p>\n<!-- /wp:paragraph --></div>\n<!-- /wp:group --></div>\n",
        post.author
    ));

    for block in &post.content {
        out.push('\n');
        push_block(&mut out, block, image_caption);
    }

    out.push_str(GROUP_CLOSE);
    out
}

fn push_block(out: &mut String, block: &ContentBlock, image_caption: &str) {
    match block.kind {
        BlockKind::Image => {
            out.push_str("<!-- wp:image {\"sizeSlug\":\"large\",\"linkDestination\":\"none\",\"align\":\"center\"} -->\n");
            out.push_str(&format!(
                "<figure class=\"wp-block-image aligncenter size-large\"><img src=\"{}\" alt=\"\" /><figcaption class=\"wp-element-caption\">{}</figcaption></figure>\n",
                block.value.replace('"', "&quot;"),
                image_caption
            ));
            out.push_str("<!-- /wp:image -->\n");
        }
        BlockKind::Paragraph | BlockKind::HyperlinkParagraph => {
            out.push_str(&format!(
                "<!-- wp:paragraph -->\n<p>{}</p>\n<!-- /wp:paragraph -->\n",
                block.value
            ));
        }
        BlockKind::Heading(level) => {
            out.push_str(&format!(
                "<!-- wp:heading {{\"level\":{level}}} -->\n<h{level} class=\"wp-block-heading\">{}</h{level}>\n<!-- /wp:heading -->\n",
                block.value,
                level = level
            ));
        }
        BlockKind::ListItem => {
            out.push_str(&format!("<li>{}</li>\n", block.value));
        }
    }
}

/// Splits `text` into CDATA bodies so that none contains `]]>`
///
/// The terminator is cut between `]]` and `>`, which end up in adjacent
/// sections.
pub fn cdata_segments(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut segment = String::with_capacity(part.len() + 3);
            if i > 0 {
                segment.push('>');
            }
            segment.push_str(part);
            if i < last {
                segment.push_str("]]");
            }
            segment
        })
        .collect()
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> OutputResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_blog<W: Write>(writer: &mut Writer<W>, post: &Post, image_caption: &str) -> OutputResult<()> {
    writer.write_event(Event::Start(BytesStart::new("blog")))?;

    write_text_element(writer, "thumbnail", &post.thumbnail)?;
    write_text_element(writer, "link", &post.link)?;
    write_text_element(writer, "tags", &post.tags)?;
    write_text_element(writer, "slug", post.slug())?;
    write_text_element(writer, "author", &post.author)?;
    write_text_element(writer, "title", &post.title)?;
    write_text_element(writer, "date", &post.date)?;

    writer.write_event(Event::Start(BytesStart::new("content")))?;
    for segment in cdata_segments(&render_content(post, image_caption)) {
        writer.write_event(Event::CData(BytesCData::new(segment.as_str())))?;
    }
    writer.write_event(Event::End(BytesEnd::new("content")))?;

    writer.write_event(Event::End(BytesEnd::new("blog")))?;
    Ok(())
}

/// Serializes `posts` into one import document
///
/// # Arguments
///
/// * `posts` - Posts in the order they were scraped
/// * `image_caption` - Caption placed under every image
///
/// # Returns
///
/// The document, starting with the XML declaration
pub fn render_document(posts: &[Post], image_caption: &str) -> OutputResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("blogs")))?;

    for post in posts {
        write_blog(&mut writer, post, image_caption)?;
    }

    writer.write_event(Event::End(BytesEnd::new("blogs")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| OutputError::Format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::HeadingLevel;
    use crate::state::PostMetadata;
    use quick_xml::Reader;
    use std::collections::HashMap;

    const CAPTION: &str = "Photo Credit: Jordan";

    fn sample_post(link: &str, content: Vec<ContentBlock>) -> Post {
        Post::new(
            link,
            "https://www.pathloom.com/post/",
            "https://static.site.com/thumb.jpg".to_string(),
            PostMetadata {
                author: "Jordan Reyes".to_string(),
                title: "Salt & Pepper <Basics>".to_string(),
                date: "Mar 3, 2024".to_string(),
                tags: "cooking, basics".to_string(),
            },
            content,
        )
    }

    /// Reads every `<blog>` back as a field map
    fn read_blogs(xml: &str) -> Vec<HashMap<String, String>> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut blogs = Vec::new();
        let mut current: Option<HashMap<String, String>> = None;
        let mut field: Option<String> = None;

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                    if name == "blog" {
                        current = Some(HashMap::new());
                    } else if current.is_some() {
                        current.as_mut().unwrap().entry(name.clone()).or_default();
                        field = Some(name);
                    }
                }
                Event::Text(e) => {
                    if let (Some(blog), Some(name)) = (current.as_mut(), field.as_ref()) {
                        blog.entry(name.clone())
                            .or_default()
                            .push_str(&e.unescape().unwrap());
                    }
                }
                Event::CData(e) => {
                    if let (Some(blog), Some(name)) = (current.as_mut(), field.as_ref()) {
                        blog.entry(name.clone())
                            .or_default()
                            .push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => {
                    if e.name().as_ref() == b"blog" {
                        blogs.extend(current.take());
                    }
                    field = None;
                }
                Event::Eof => break,
                _ => {}
            }
        }
        blogs
    }

    #[test]
    fn test_document_round_trip() {
        let posts = vec![
            sample_post(
                "https://www.pathloom.com/post/salt-and-pepper",
                vec![ContentBlock::new(BlockKind::Paragraph, "Season early.")],
            ),
            sample_post("https://elsewhere.com/p/2", Vec::new()),
        ];

        let xml = render_document(&posts, CAPTION).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));

        let blogs = read_blogs(&xml);
        assert_eq!(blogs.len(), 2);

        let first = &blogs[0];
        assert_eq!(first["link"], "https://www.pathloom.com/post/salt-and-pepper");
        assert_eq!(first["slug"], "salt-and-pepper");
        assert_eq!(first["title"], "Salt & Pepper <Basics>");
        assert_eq!(first["author"], "Jordan Reyes");
        assert_eq!(first["date"], "Mar 3, 2024");
        assert_eq!(first["tags"], "cooking, basics");
        assert_eq!(first["thumbnail"], "https://static.site.com/thumb.jpg");
        assert_eq!(first["content"], render_content(&posts[0], CAPTION));

        assert_eq!(blogs[1]["slug"], "https://elsewhere.com/p/2");
    }

    #[test]
    fn test_field_order() {
        let xml = render_document(
            &[sample_post("https://www.pathloom.com/post/a", Vec::new())],
            CAPTION,
        )
        .unwrap();

        let positions: Vec<usize> = [
            "<thumbnail>", "<link>", "<tags>", "<slug>", "<author>", "<title>", "<date>", "<content>",
        ]
        .iter()
        .map(|tag| xml.find(tag).unwrap())
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_text_fields_escaped() {
        let xml = render_document(
            &[sample_post("https://www.pathloom.com/post/a", Vec::new())],
            CAPTION,
        )
        .unwrap();
        assert!(xml.contains("Salt &amp; Pepper &lt;Basics&gt;"));
    }

    #[test]
    fn test_empty_document() {
        let xml = render_document(&[], CAPTION).unwrap();
        assert!(xml.contains("<blogs>"));
        assert!(read_blogs(&xml).is_empty());
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        assert_eq!(cdata_segments("plain"), vec!["plain"]);
        assert_eq!(cdata_segments("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_segments("]]>]]>"), vec!["]]", ">]]", ">"]);
    }

    #[test]
    fn test_cdata_terminator_round_trips() {
        let post = sample_post(
            "https://www.pathloom.com/post/code",
            vec![ContentBlock::new(BlockKind::Paragraph, "arr[idx[0]]>1")],
        );
        let xml = render_document(std::slice::from_ref(&post), CAPTION).unwrap();
        assert!(xml.contains("<![CDATA[>1"));

        let blogs = read_blogs(&xml);
        assert!(blogs[0]["content"].contains("<p>arr[idx[0]]>1</p>"));
    }

    #[test]
    fn test_block_templates() {
        let level = HeadingLevel::new(3).unwrap();
        let post = sample_post(
            "https://www.pathloom.com/post/a",
            vec![
                ContentBlock::new(BlockKind::Heading(level), "Getting started"),
                ContentBlock::new(BlockKind::Image, "https://static.site.com/a.jpg"),
                ContentBlock::new(
                    BlockKind::HyperlinkParagraph,
                    r#"See <a href="https://x.com" target="_blank" rel="noopener">x</a>"#,
                ),
                ContentBlock::new(BlockKind::ListItem, "One point"),
            ],
        );

        let content = render_content(&post, "Photo: Staff");
        assert!(content.starts_with("<!-- wp:group {\"style\""));
        assert!(content.contains("<p class=\"has-small-font-size\">Published: Mar 3, 2024</p>"));
        assert!(content.contains("<p class=\"has-small-font-size\">Edited: Mar 3, 2024</p>"));
        assert!(content.contains("<p>Writer: Jordan Reyes</p>"));
        assert!(content.contains("<p>Editor: Jordan Reyes</p>"));
        assert!(content.contains(
            "<!-- wp:heading {\"level\":3} -->\n<h3 class=\"wp-block-heading\">Getting started</h3>\n<!-- /wp:heading -->"
        ));
        assert!(content.contains(
            "<img src=\"https://static.site.com/a.jpg\" alt=\"\" /><figcaption class=\"wp-element-caption\">Photo: Staff</figcaption>"
        ));
        assert!(content.contains("<p>See <a href=\"https://x.com\" target=\"_blank\" rel=\"noopener\">x</a></p>"));
        assert!(content.contains("<li>One point</li>\n"));
        assert!(content.ends_with(GROUP_CLOSE));

        let heading = content.find("Getting started").unwrap();
        let image = content.find("a.jpg").unwrap();
        let item = content.find("One point").unwrap();
        assert!(heading < image && image < item);
    }
}
