// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`DomNode`] over parsed HTML documents.
//!
//! ## Feature
//!
//! Enable with `html_adapter`.
//!
//! ## Notes
//!
//! An [`HtmlPage`] owns a main document plus any number of inline frame
//! documents. Frames are not loaded from `src`; wire them explicitly with
//! [`HtmlPage::attach_frame`] (same-origin, content accessible) or
//! [`HtmlPage::attach_cross_origin_frame`] (content access fails). Frames are
//! keyed by their position among the `<iframe>` elements of their document.
//!
//! ```
//! use understory_analytics::adapters::html::HtmlPage;
//! use understory_analytics::dom::DomNode;
//!
//! let mut page = HtmlPage::parse(r#"<div id="host"><iframe id="frame"></iframe></div>"#);
//! let main = page.main_document();
//! let frame_doc = page
//!     .attach_frame(main, "#frame", r#"<p id="inside">hello</p>"#)
//!     .unwrap();
//!
//! let frame = page.select("#frame").unwrap();
//! let frame_root = frame.content_document().unwrap().unwrap();
//! assert_eq!(frame_root.document(), frame_doc);
//! assert_eq!(frame_root.query_selector("#inside").unwrap().text_content(), "hello");
//! ```

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use scraper::{ElementRef, Html, Selector};

use crate::dom::{DomNode, FrameAccessError};

/// Identifier of a document owned by an [`HtmlPage`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DocumentId(u32);

impl DocumentId {
    const MAIN: Self = Self(0);

    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct FrameKey {
    doc: DocumentId,
    ordinal: usize,
}

#[derive(Copy, Clone, Debug)]
enum FrameSource {
    SameOrigin(DocumentId),
    CrossOrigin,
}

/// A set of parsed HTML documents linked through inline frames.
pub struct HtmlPage {
    documents: Vec<Html>,
    frames: HashMap<FrameKey, FrameSource>,
}

impl core::fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HtmlPage")
            .field("documents", &self.documents.len())
            .field("frames", &self.frames.len())
            .finish_non_exhaustive()
    }
}

impl HtmlPage {
    /// Parse `html` as the main document of a new page.
    pub fn parse(html: &str) -> Self {
        Self {
            documents: vec![Html::parse_document(html)],
            frames: HashMap::new(),
        }
    }

    /// Identifier of the main document.
    pub fn main_document(&self) -> DocumentId {
        DocumentId::MAIN
    }

    /// Number of documents owned by the page (main document included).
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Parse `html` as the content of the first `<iframe>` in `doc` matching `iframe_selector`.
    ///
    /// Returns the new document's identifier, or `None` if no such frame exists.
    /// Attaching twice to the same frame replaces its content.
    pub fn attach_frame(
        &mut self,
        doc: DocumentId,
        iframe_selector: &str,
        html: &str,
    ) -> Option<DocumentId> {
        let ordinal = self.frame_ordinal_matching(doc, iframe_selector)?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "A page never holds more than u32::MAX documents."
        )]
        let id = DocumentId(self.documents.len() as u32);
        self.documents.push(Html::parse_document(html));
        self.frames
            .insert(FrameKey { doc, ordinal }, FrameSource::SameOrigin(id));
        Some(id)
    }

    /// Mark the first `<iframe>` in `doc` matching `iframe_selector` as cross-origin.
    ///
    /// Returns `false` if no such frame exists.
    pub fn attach_cross_origin_frame(&mut self, doc: DocumentId, iframe_selector: &str) -> bool {
        let Some(ordinal) = self.frame_ordinal_matching(doc, iframe_selector) else {
            return false;
        };
        self.frames
            .insert(FrameKey { doc, ordinal }, FrameSource::CrossOrigin);
        true
    }

    /// Root element of `doc`.
    pub fn root(&self, doc: DocumentId) -> Option<HtmlNode<'_>> {
        let html = self.documents.get(doc.idx())?;
        Some(HtmlNode {
            page: self,
            doc,
            element: html.root_element(),
        })
    }

    /// First element of the main document matching `selector`, root element included.
    pub fn select(&self, selector: &str) -> Option<HtmlNode<'_>> {
        self.select_in(DocumentId::MAIN, selector)
    }

    /// First element of `doc` matching `selector`, root element included.
    pub fn select_in(&self, doc: DocumentId, selector: &str) -> Option<HtmlNode<'_>> {
        self.select_all_in(doc, selector).into_iter().next()
    }

    /// All elements of `doc` matching `selector` in document order, root element included.
    pub fn select_all_in(&self, doc: DocumentId, selector: &str) -> Vec<HtmlNode<'_>> {
        let (Some(html), Some(selector)) = (self.documents.get(doc.idx()), parse_selector(selector))
        else {
            return Vec::new();
        };
        html.select(&selector)
            .map(|element| HtmlNode {
                page: self,
                doc,
                element,
            })
            .collect()
    }

    fn frame_ordinal_matching(&self, doc: DocumentId, iframe_selector: &str) -> Option<usize> {
        let html = self.documents.get(doc.idx())?;
        let selector = parse_selector(iframe_selector)?;
        let iframes = parse_selector("iframe")?;
        html.select(&iframes)
            .position(|element| selector.matches(&element))
    }

    fn frame_ordinal_of(&self, doc: DocumentId, frame: ElementRef<'_>) -> Option<usize> {
        let html = self.documents.get(doc.idx())?;
        let iframes = parse_selector("iframe")?;
        html.select(&iframes).position(|element| element == frame)
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(selector, "ignoring unparseable selector");
            None
        }
    }
}

/// Handle to an element of a document owned by an [`HtmlPage`].
#[derive(Copy, Clone)]
pub struct HtmlNode<'a> {
    page: &'a HtmlPage,
    doc: DocumentId,
    element: ElementRef<'a>,
}

impl<'a> HtmlNode<'a> {
    /// Document this element belongs to.
    pub fn document(&self) -> DocumentId {
        self.doc
    }

    /// The underlying `scraper` element.
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }

    fn with_element(&self, element: ElementRef<'a>) -> Self {
        Self { element, ..*self }
    }
}

impl core::fmt::Debug for HtmlNode<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HtmlNode")
            .field("doc", &self.doc)
            .field("tag", &self.element.value().name())
            .field("id", &self.element.value().id())
            .finish_non_exhaustive()
    }
}

impl PartialEq for HtmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.page, other.page)
            && self.doc == other.doc
            && self.element.id() == other.element.id()
    }
}

impl Eq for HtmlNode<'_> {}

impl Hash for HtmlNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.doc.hash(state);
        self.element.id().hash(state);
    }
}

impl DomNode for HtmlNode<'_> {
    fn parent_element(&self) -> Option<Self> {
        self.element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|element| self.with_element(element))
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    fn tag_name(&self) -> &str {
        self.element.value().name()
    }

    fn text_content(&self) -> String {
        self.element.text().collect()
    }

    fn matches(&self, selector: &str) -> bool {
        parse_selector(selector).is_some_and(|selector| selector.matches(&self.element))
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        let selector = parse_selector(selector)?;
        self.element
            .select(&selector)
            .next()
            .map(|element| self.with_element(element))
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.element
            .select(&selector)
            .map(|element| self.with_element(element))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<Self> {
        let root = self.page.documents.get(self.doc.idx())?.root_element();
        root.descendants()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().id() == Some(id))
            .map(|element| self.with_element(element))
    }

    fn document_element(&self) -> Self {
        match self.page.documents.get(self.doc.idx()) {
            Some(html) => self.with_element(html.root_element()),
            None => *self,
        }
    }

    fn body(&self) -> Option<Self> {
        let root = self.document_element();
        if root.tag_name() == "body" {
            return Some(root);
        }
        root.query_selector("body")
    }

    fn content_document(&self) -> Result<Option<Self>, FrameAccessError> {
        if self.tag_name() != "iframe" {
            return Ok(None);
        }
        let Some(ordinal) = self.page.frame_ordinal_of(self.doc, self.element) else {
            return Err(FrameAccessError::Detached);
        };
        match self.page.frames.get(&FrameKey {
            doc: self.doc,
            ordinal,
        }) {
            Some(FrameSource::SameOrigin(doc)) => Ok(self.page.root(*doc)),
            Some(FrameSource::CrossOrigin) => Err(FrameAccessError::CrossOrigin),
            None => Ok(None),
        }
    }
}
