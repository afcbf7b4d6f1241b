//! Page tree produced by a crawl
//!
//! A [`Page`] is one address the crawler created a node for: either fully scraped
//! (empty [`StopReasons`]) or a leaf recording why traversal stopped there.
//! Duplicate addresses never get a node.
//!
//! Pages are built by a single scraper worker and handed to the coordinator, which is
//! the only place children are attached. Once a crawl returns, the tree is read-only.

mod status;

pub use status::StopReasons;

use crate::crawler::Extracted;
use url::Url;

/// One crawled or policy-skipped address
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    path: Url,
    children: Vec<Page>,
    anchors: Vec<String>,
    images: Vec<String>,
    links: Vec<String>,
    scripts: Vec<String>,
    status: StopReasons,
}

impl Page {
    /// Creates an empty, not yet classified page for `path`
    pub fn new(path: Url) -> Self {
        Self {
            path,
            children: Vec::new(),
            anchors: Vec::new(),
            images: Vec::new(),
            links: Vec::new(),
            scripts: Vec::new(),
            status: StopReasons::empty(),
        }
    }

    /// Normalized address of the page, after any redirect correction
    pub fn path(&self) -> &Url {
        &self.path
    }

    /// Child pages, in the order their fetches completed
    pub fn children(&self) -> &[Page] {
        &self.children
    }

    /// Raw `a[href]` values
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Raw `img[src]` values
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Raw `link[href]` values
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Raw `script[src]` values
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn status(&self) -> StopReasons {
        self.status
    }

    /// Returns true if traversal did not stop at this page
    pub fn is_scraped(&self) -> bool {
        self.status.is_empty()
    }

    pub fn depth_reached(&self) -> bool {
        self.status.contains(StopReasons::DEPTH_REACHED)
    }

    pub fn set_depth_reached(&mut self, value: bool) {
        self.status.set(StopReasons::DEPTH_REACHED, value);
    }

    pub fn external_domain(&self) -> bool {
        self.status.contains(StopReasons::EXTERNAL_DOMAIN)
    }

    pub fn set_external_domain(&mut self, value: bool) {
        self.status.set(StopReasons::EXTERNAL_DOMAIN, value);
    }

    pub fn robots_forbidden(&self) -> bool {
        self.status.contains(StopReasons::ROBOTS_FORBIDDEN)
    }

    pub fn set_robots_forbidden(&mut self, value: bool) {
        self.status.set(StopReasons::ROBOTS_FORBIDDEN, value);
    }

    pub fn not_html(&self) -> bool {
        self.status.contains(StopReasons::NOT_HTML)
    }

    pub fn set_not_html(&mut self, value: bool) {
        self.status.set(StopReasons::NOT_HTML, value);
    }

    pub fn not_accessible(&self) -> bool {
        self.status.contains(StopReasons::NOT_ACCESSIBLE)
    }

    pub fn set_not_accessible(&mut self, value: bool) {
        self.status.set(StopReasons::NOT_ACCESSIBLE, value);
    }

    /// Depth-first, pre-order traversal of this page and all its descendants
    ///
    /// Each call starts a fresh traversal.
    ///
    /// # Example
    ///
    /// ```
    /// use lame_sitemapper::Page;
    /// use url::Url;
    ///
    /// let root = Page::new(Url::parse("http://www.example.com/").unwrap());
    /// let paths: Vec<&str> = root.iter().map(|page| page.path().as_str()).collect();
    /// assert_eq!(paths, vec!["http://www.example.com/"]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of pages in the tree rooted here, this page included
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub(crate) fn push_child(&mut self, child: Page) {
        self.children.push(child);
    }

    /// Replaces the path with the address a redirect led to
    pub(crate) fn redirect_to(&mut self, path: Url) {
        self.path = path;
    }

    /// Stores extracted attribute values on the page
    pub(crate) fn set_extracted(&mut self, extracted: Extracted) {
        self.anchors = extracted.anchors;
        self.images = extracted.images;
        self.links = extracted.links;
        self.scripts = extracted.scripts;
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a Page;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over a page tree
pub struct Iter<'a> {
    stack: Vec<&'a Page>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Page;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.stack.pop()?;
        self.stack.extend(page.children.iter().rev());
        Some(page)
    }
}
