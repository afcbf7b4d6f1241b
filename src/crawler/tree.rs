//! Page arena used while a crawl is running
//!
//! Workers own their pages until they hand them over; the coordinator then files each
//! page here under its parent's id. Ids are handed out to frontier tasks so that later
//! results can find their parent without any shared references into the tree. The
//! owned [`Page`] tree is only assembled once the crawl is over.

use crate::page::Page;

/// Index of a page in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PageId(usize);

#[derive(Debug, Default)]
pub(crate) struct PageArena {
    pages: Vec<Option<Page>>,
    children: Vec<Vec<usize>>,
    root: Option<usize>,
}

impl PageArena {
    /// Files `page` under `parent`, or as the root when `parent` is `None`
    pub fn insert(&mut self, page: Page, parent: Option<PageId>) -> PageId {
        let id = self.pages.len();
        self.pages.push(Some(page));
        self.children.push(Vec::new());

        match parent {
            Some(PageId(parent)) => self.children[parent].push(id),
            None => self.root = Some(id),
        }

        PageId(id)
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id.0).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Assembles the owned tree; children keep their insertion order
    pub fn into_tree(mut self) -> Option<Page> {
        let root = self.root?;
        self.assemble(root)
    }

    fn assemble(&mut self, id: usize) -> Option<Page> {
        let mut page = self.pages.get_mut(id)?.take()?;
        let children = std::mem::take(&mut self.children[id]);

        for child in children {
            if let Some(child) = self.assemble(child) {
                page.push_child(child);
            }
        }

        Some(page)
    }
}
