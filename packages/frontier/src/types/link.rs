//! Typed crawl-target links.
//!
//! A [`Link`] identifies one crawl target by kind and an opaque id. The id
//! may be a relative path, an absolute URL, a search phrase, or a filter
//! token; interpreting it is the job of the site strategy's `resolve`.
//! Equality and hashing are on the `(kind, id)` pair, which is the
//! deduplication key throughout the frontier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a crawl target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Site root / main page.
    Main,
    /// Category listing page.
    Category,
    /// Paginated continuation of a category.
    ///
    /// Traversal treats these like categories; the distinct kind exists so
    /// callers seeding the frontier can tell the two apart.
    CategoryPage,
    /// Product detail page.
    Product,
    /// Search phrase.
    SearchQuery,
    /// Filter token set.
    Filter,
}

impl LinkKind {
    /// All kinds in declaration order.
    ///
    /// This order is the deterministic drain order for untyped pops.
    pub const ALL: [LinkKind; 6] = [
        LinkKind::Main,
        LinkKind::Category,
        LinkKind::CategoryPage,
        LinkKind::Product,
        LinkKind::SearchQuery,
        LinkKind::Filter,
    ];
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkKind::Main => "main",
            LinkKind::Category => "category",
            LinkKind::CategoryPage => "category-page",
            LinkKind::Product => "product",
            LinkKind::SearchQuery => "search-query",
            LinkKind::Filter => "filter",
        };
        f.write_str(s)
    }
}

/// A typed, opaque crawl target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// What kind of page this points at.
    pub kind: LinkKind,
    /// Opaque identifier; resolved to a fetchable address by the strategy.
    pub id: String,
}

impl Link {
    /// Create a link of any kind.
    pub fn new(kind: LinkKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Create a main-page link.
    pub fn main(id: impl Into<String>) -> Self {
        Self::new(LinkKind::Main, id)
    }

    /// Create a category link.
    pub fn category(id: impl Into<String>) -> Self {
        Self::new(LinkKind::Category, id)
    }

    /// Create a category pagination link.
    pub fn category_page(id: impl Into<String>) -> Self {
        Self::new(LinkKind::CategoryPage, id)
    }

    /// Create a product link.
    pub fn product(id: impl Into<String>) -> Self {
        Self::new(LinkKind::Product, id)
    }

    /// Create a search-query link.
    pub fn search_query(id: impl Into<String>) -> Self {
        Self::new(LinkKind::SearchQuery, id)
    }

    /// Create a filter link.
    pub fn filter(id: impl Into<String>) -> Self {
        Self::new(LinkKind::Filter, id)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_dedup_key_is_kind_and_id() {
        let mut set = HashSet::new();
        set.insert(Link::category("/a"));
        set.insert(Link::category("/a"));
        set.insert(Link::product("/a"));
        // Same id under two different kinds is two distinct links.
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Link::product("/p1").to_string(), "product:/p1");
        assert_eq!(Link::category_page("/a?page=2").to_string(), "category-page:/a?page=2");
    }

    #[test]
    fn test_serde_round_trip() {
        let link = Link::search_query("winter boots");
        let json = serde_json::to_string(&link).unwrap();
        let back: Link = serde_json::from_str(&json).unwrap();
        assert_eq!(link, back);
    }
}
