//! Stop reasons recorded on pages that were not fully scraped
use std::fmt;

/// Set of independent reasons why traversal stopped at a page
///
/// An empty set means the page was fetched and its attributes extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopReasons(u8);

impl StopReasons {
    /// The page sits at the maximum traversal depth
    pub const DEPTH_REACHED: Self = Self(1);

    /// The page is on a different host than the crawl
    pub const EXTERNAL_DOMAIN: Self = Self(2);

    /// robots.txt disallows the page
    pub const ROBOTS_FORBIDDEN: Self = Self(4);

    /// The page was fetched but is not an HTML document
    pub const NOT_HTML: Self = Self(8);

    /// The page could not be fetched (timeout, error status, empty body)
    pub const NOT_ACCESSIBLE: Self = Self(16);

    /// Returns the empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns the raw bit value
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Returns true if no reason is set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if every reason in `other` is also set here
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Inserts or removes `other` depending on `value`
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Returns every single reason, in display order
    pub fn all_reasons() -> [Self; 5] {
        [
            Self::DEPTH_REACHED,
            Self::ROBOTS_FORBIDDEN,
            Self::EXTERNAL_DOMAIN,
            Self::NOT_HTML,
            Self::NOT_ACCESSIBLE,
        ]
    }

    fn code(&self) -> &'static str {
        match *self {
            Self::DEPTH_REACHED => "depth",
            Self::ROBOTS_FORBIDDEN => "robots",
            Self::EXTERNAL_DOMAIN => "ext",
            Self::NOT_HTML => "nohtml",
            Self::NOT_ACCESSIBLE => "noacc",
            _ => "",
        }
    }
}

impl fmt::Display for StopReasons {
    /// Formats as `|`-joined short codes, e.g. `depth|ext`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = Self::all_reasons()
            .into_iter()
            .filter(|reason| self.contains(*reason))
            .map(|reason| reason.code())
            .collect();

        write!(f, "{}", codes.join("|"))
    }
}
