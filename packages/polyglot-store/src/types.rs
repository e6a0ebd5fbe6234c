//! Value types shared between the content store and the GraphQL layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata key under which a content item's locale is recorded.
pub const META_LOCALE: &str = "_locale";

/// Metadata key pointing at the content item this one was translated from.
pub const META_ORIGINAL_ID: &str = "_original_post";

/// A language/region code, e.g. `en_US`. Codes are opaque to this layer but
/// must be valid GraphQL enum value names to appear in the `Locale` enum.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Reserved filter keyword meaning "ignore locale scoping". Never a real
    /// locale code.
    pub const ALL_KEYWORD: &'static str = "all";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Identifier of a content item. String-formed because the original-content
/// pointer is stored as opaque string metadata.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ContentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Publication status of a content item. Counting and list queries only
/// consider published items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    #[default]
    Publish,
    Draft,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentStatus::Publish => write!(f, "publish"),
            ContentStatus::Draft => write!(f, "draft"),
        }
    }
}

/// A content type as the host schema exposes it.
///
/// `graphql_name` is the capitalized singular type name (`Post`);
/// `graphql_plural_name` is the root query field name (`posts`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTypeDescriptor {
    /// Internal content-type name as the store knows it.
    pub name: String,
    pub graphql_name: String,
    pub graphql_plural_name: String,
    /// Hierarchical types expose a `children` connection.
    pub hierarchical: bool,
}

impl ContentTypeDescriptor {
    pub fn new(
        name: impl Into<String>,
        graphql_name: impl Into<String>,
        graphql_plural_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            graphql_name: graphql_name.into(),
            graphql_plural_name: graphql_plural_name.into(),
            hierarchical: false,
        }
    }

    pub fn hierarchical(mut self) -> Self {
        self.hierarchical = true;
        self
    }
}

/// A taxonomy as the host schema exposes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomyDescriptor {
    /// Internal taxonomy name as the store knows it.
    pub name: String,
    pub graphql_name: String,
    pub graphql_plural_name: String,
}

impl TaxonomyDescriptor {
    pub fn new(
        name: impl Into<String>,
        graphql_name: impl Into<String>,
        graphql_plural_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            graphql_name: graphql_name.into(),
            graphql_plural_name: graphql_plural_name.into(),
        }
    }
}

/// Identifier of a taxonomy term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Membership of a content item in a taxonomy term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermRef {
    pub taxonomy: String,
    pub term_id: TermId,
}

/// A classification term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomyTerm {
    pub id: TermId,
    pub taxonomy: String,
    pub name: String,
}

impl TaxonomyTerm {
    pub fn new(id: u64, taxonomy: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TermId(id),
            taxonomy: taxonomy.into(),
            name: name.into(),
        }
    }
}

/// A single content record. Locale and original-content pointers live in the
/// metadata map under [`META_LOCALE`] and [`META_ORIGINAL_ID`], matching the
/// per-item metadata interface of the host store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentItem {
    pub id: ContentId,
    pub content_type: String,
    pub status: ContentStatus,
    pub title: String,
    pub parent: Option<ContentId>,
    pub terms: Vec<TermRef>,
    pub meta: BTreeMap<String, String>,
}

impl ContentItem {
    pub fn new(
        id: impl Into<ContentId>,
        content_type: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            status: ContentStatus::Publish,
            title: title.into(),
            parent: None,
            terms: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_locale(self, locale: impl Into<String>) -> Self {
        self.with_meta(META_LOCALE, locale)
    }

    pub fn with_original(self, original_id: impl Into<String>) -> Self {
        self.with_meta(META_ORIGINAL_ID, original_id)
    }

    pub fn with_parent(mut self, parent: impl Into<ContentId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn in_term(mut self, taxonomy: impl Into<String>, term_id: u64) -> Self {
        self.terms.push(TermRef {
            taxonomy: taxonomy.into(),
            term_id: TermId(term_id),
        });
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Recorded locale code, if any. Empty metadata counts as absent.
    pub fn locale(&self) -> Option<&str> {
        self.meta(META_LOCALE).filter(|v| !v.is_empty())
    }

    /// Recorded original-content identifier, if any.
    pub fn original_id(&self) -> Option<&str> {
        self.meta(META_ORIGINAL_ID).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_and_original_read_from_meta() {
        let item = ContentItem::new("1", "post", "Hello")
            .with_locale("en_US")
            .with_original("9");
        assert_eq!(item.locale(), Some("en_US"));
        assert_eq!(item.original_id(), Some("9"));
    }

    #[test]
    fn empty_meta_counts_as_absent() {
        let item = ContentItem::new("1", "post", "Hello").with_locale("");
        assert_eq!(item.locale(), None);
        assert_eq!(item.original_id(), None);
    }
}
