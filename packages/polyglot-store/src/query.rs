//! Typed query arguments and paginated results for the content store.

use crate::types::{ContentId, ContentItem, ContentStatus, Locale, TermId};

/// How a query relates to the host's ambient default-locale restriction.
///
/// This is the typed form of the `locale` filter argument: `all` suppresses
/// the ambient restriction without constraining by language, an explicit code
/// suppresses it and constrains to that language, and an absent or empty
/// value leaves the query untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LocaleScope {
    /// No override; the host's default-locale scoping applies.
    #[default]
    Ambient,
    /// Suppress default-locale scoping entirely.
    All,
    /// Suppress default-locale scoping and constrain to one language.
    Language(Locale),
}

impl LocaleScope {
    /// Translate a `locale` filter value. The mapping is identical wherever
    /// the filter appears, on direct queries and nested connections alike.
    pub fn from_filter(value: Option<&str>) -> Self {
        match value {
            None | Some("") => LocaleScope::Ambient,
            Some(Locale::ALL_KEYWORD) => LocaleScope::All,
            Some(code) => LocaleScope::Language(Locale::new(code)),
        }
    }

    /// Apply this scope to a query. `Ambient` leaves the query unchanged.
    pub fn apply(&self, query: &mut ContentQuery) {
        match self {
            LocaleScope::Ambient => {}
            LocaleScope::All => {
                query.suppress_locale_scope = true;
                query.language = None;
            }
            LocaleScope::Language(locale) => {
                query.suppress_locale_scope = true;
                query.language = Some(locale.clone());
            }
        }
    }
}

/// Relay-style pagination arguments, passed through to the store unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paging {
    pub first: Option<u64>,
    pub after: Option<String>,
    pub last: Option<u64>,
    pub before: Option<String>,
}

/// Filter arguments for a content query. All constraints are conjunctive;
/// `None` means unconstrained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentQuery {
    pub content_type: Option<String>,
    pub status: Option<ContentStatus>,
    /// Free-text match against item titles.
    pub search: Option<String>,
    pub parent: Option<ContentId>,
    pub term: Option<(String, TermId)>,
    /// Metadata equality constraint, e.g. the sibling lookup over the
    /// original-content pointer.
    pub meta_equals: Option<(String, String)>,
    /// Language constraint. Takes precedence over ambient scoping; never
    /// combined with it.
    pub language: Option<Locale>,
    /// Locale-scope override flag: when set, the store must not apply its
    /// ambient default-locale restriction.
    pub suppress_locale_scope: bool,
    pub paging: Paging,
}

impl ContentQuery {
    pub fn for_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Default::default()
        }
    }

    pub fn published(mut self) -> Self {
        self.status = Some(ContentStatus::Publish);
        self
    }

    pub fn scoped(mut self, scope: &LocaleScope) -> Self {
        scope.apply(&mut self);
        self
    }
}

/// One edge of a paginated result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentEdge {
    pub cursor: String,
    pub node: ContentItem,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// A page of content items. `total_count` counts all matches, not just the
/// returned window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentPage {
    pub total_count: u64,
    pub edges: Vec<ContentEdge>,
    pub page_info: PageInfo,
}

impl ContentPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ContentItem> {
        self.edges.iter().map(|edge| &edge.node)
    }
}
