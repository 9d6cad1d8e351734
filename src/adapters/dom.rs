//! In-memory HTML document used as the binding target.
//!
//! Wraps `scraper::Html`. The tree is `!Send`, so a `Document` must stay on
//! the task that created it; binding itself is synchronous.

use crate::utils::error::{ApiError, Result};
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

pub struct Document {
    html: Html,
}

impl Document {
    /// 解析完整文件；缺少的 `<html>`/`<body>` 會由解析器補上
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::parse(&source))
    }

    pub fn selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| ApiError::SelectorError {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })
    }

    /// `None` 代表 `<body>`
    pub fn root(&self, selector: Option<&Selector>) -> Option<ElementRef<'_>> {
        match selector {
            Some(selector) => self.html.select(selector).next(),
            None => self.body(),
        }
    }

    pub fn body(&self) -> Option<ElementRef<'_>> {
        Self::selector("body")
            .ok()
            .and_then(|selector| self.html.select(&selector).next())
    }

    /// Concatenated text of the first element matching `selector`.
    pub fn text_of(&self, selector: &str) -> Result<Option<String>> {
        let selector = Self::selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>()))
    }

    pub fn html(&self) -> String {
        self.html.html()
    }

    pub(crate) fn tree_mut(&mut self) -> &mut Html {
        &mut self.html
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}
