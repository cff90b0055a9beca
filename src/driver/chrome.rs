//! Headless Chrome driver
//!
//! Drives one Chrome tab over the DevTools protocol. The protocol handler has
//! to be polled for the browser to make progress, so it runs on its own task
//! for the lifetime of the driver.

use crate::config::BrowserConfig;
use crate::driver::{
    DriverError, DriverResult, ElementHandle, InlineSegment, PageDriver, RelativePath,
};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::sync::Mutex;
use tokio::task::JoinHandle;

const TAG_NAME_FN: &str = "function() { return this.tagName.toLowerCase(); }";
const HREF_FN: &str = "function() { return this.hasAttribute('href') ? this.href : null; }";
const SRC_FN: &str = "function() { return this.hasAttribute('src') ? this.src : null; }";

/// Describes child nodes as JSON; elements by their position among element children
const SEGMENTS_FN: &str = "function() {
    var out = [];
    var position = 0;
    for (var node = this.firstChild; node; node = node.nextSibling) {
        if (node.nodeType === 3) {
            out.push({ text: node.textContent });
        } else if (node.nodeType === 1) {
            out.push({ element: position++ });
        }
    }
    return JSON.stringify(out);
}";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSegment {
    Text { text: String },
    Element { element: usize },
}

fn element_error(e: CdpError) -> DriverError {
    DriverError::Element(e.to_string())
}

/// One element in the live Chrome tab
pub struct ChromeElement {
    inner: Element,
}

impl ChromeElement {
    async fn call_for_string(&self, function: &str) -> DriverResult<Option<String>> {
        let returns = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(element_error)?;
        Ok(returns
            .result
            .value
            .and_then(|value| value.as_str().map(str::to_string)))
    }
}

#[async_trait]
impl ElementHandle for ChromeElement {
    async fn tag_kind(&self) -> DriverResult<String> {
        self.call_for_string(TAG_NAME_FN)
            .await?
            .ok_or_else(|| DriverError::Element("element has no tag name".to_string()))
    }

    async fn text(&self) -> DriverResult<String> {
        Ok(self
            .inner
            .inner_text()
            .await
            .map_err(element_error)?
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        // href and src are read as properties so they come back absolute
        match name {
            "href" => self.call_for_string(HREF_FN).await,
            "src" => self.call_for_string(SRC_FN).await,
            _ => self.inner.attribute(name).await.map_err(element_error),
        }
    }

    async fn locate_all(&self, path: RelativePath<'_>) -> DriverResult<Vec<Self>> {
        let selector = path.to_css();
        let found = self
            .inner
            .find_elements(selector.clone())
            .await
            .map_err(|e| DriverError::Query {
                selector,
                message: e.to_string(),
            })?;
        Ok(found.into_iter().map(|inner| ChromeElement { inner }).collect())
    }

    async fn inline_segments(&self) -> DriverResult<Vec<InlineSegment<Self>>> {
        let described = self.call_for_string(SEGMENTS_FN).await?.unwrap_or_default();
        let raw: Vec<RawSegment> = serde_json::from_str(&described)
            .map_err(|e| DriverError::Element(format!("bad child description: {}", e)))?;

        let mut children: Vec<Option<Self>> = self
            .locate_all(RelativePath::Children)
            .await?
            .into_iter()
            .map(Some)
            .collect();

        let mut segments = Vec::with_capacity(raw.len());
        for segment in raw {
            match segment {
                RawSegment::Text { text } => segments.push(InlineSegment::Text(text)),
                RawSegment::Element { element } => {
                    let child = children.get_mut(element).and_then(Option::take).ok_or_else(|| {
                        DriverError::Element("child list changed while reading".to_string())
                    })?;
                    segments.push(InlineSegment::Element(child));
                }
            }
        }
        Ok(segments)
    }
}

/// Page driver over a single Chrome tab
pub struct ChromeDriver {
    browser: tokio::sync::Mutex<Browser>,
    page: Page,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeDriver {
    /// Launches Chrome and opens a blank tab
    pub async fn launch(config: &BrowserConfig) -> DriverResult<Self> {
        let mut builder = LaunchConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage");
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        let launch_config = builder.build().map_err(DriverError::Browser)?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| DriverError::Browser(format!("failed to launch Chrome: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("DevTools handler error: {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Browser(format!("failed to open tab: {}", e)))?;

        tracing::info!("Chrome launched (headless: {})", config.headless);

        Ok(Self {
            browser: tokio::sync::Mutex::new(browser),
            page,
            handler: Mutex::new(Some(handler_task)),
        })
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    type Element = ChromeElement;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn locate(&self, selector: &str) -> DriverResult<Vec<ChromeElement>> {
        let found = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| DriverError::Query {
                selector: selector.to_string(),
                message: e.to_string(),
            })?;
        Ok(found.into_iter().map(|inner| ChromeElement { inner }).collect())
    }

    async fn run_script(&self, code: &str) -> DriverResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(code)
            .await
            .map_err(|e| DriverError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn close(&self) -> DriverResult<()> {
        {
            let mut browser = self.browser.lock().await;
            browser
                .close()
                .await
                .map_err(|e| DriverError::Browser(format!("failed to close Chrome: {}", e)))?;
        }

        let handler = self
            .handler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = handler {
            if let Err(e) = task.await {
                tracing::debug!("DevTools handler task ended abnormally: {}", e);
            }
        }

        tracing::info!("Chrome closed");
        Ok(())
    }
}
