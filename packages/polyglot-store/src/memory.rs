//! In-memory reference implementation of both collaborator traits. Used by
//! the test suites and usable by embedders that hold their content in
//! process memory.

use async_trait::async_trait;

use crate::query::{ContentEdge, ContentPage, ContentQuery, LocaleScope, PageInfo, Paging};
use crate::store::{ContentStore, LocaleRegistry};
use crate::types::{ContentId, ContentItem, Locale, TaxonomyTerm, TermId};
use crate::{StoreError, StoreResult};

/// Content and locale configuration held in insertion order. Queries filter
/// the item list in full, then paginate; cursors are item identifiers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    default_locale: Option<Locale>,
    locales: Vec<Locale>,
    localizable: Vec<String>,
    items: Vec<ContentItem>,
    terms: Vec<TaxonomyTerm>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default_locale(&mut self, locale: impl Into<Locale>) {
        self.default_locale = Some(locale.into());
    }

    /// Register an available locale. Duplicates are ignored.
    pub fn add_locale(&mut self, locale: impl Into<Locale>) {
        let locale = locale.into();
        if !self.locales.contains(&locale) {
            self.locales.push(locale);
        }
    }

    /// Mark a content type as localizable.
    pub fn mark_localizable(&mut self, content_type: impl Into<String>) {
        let content_type = content_type.into();
        if !self.localizable.contains(&content_type) {
            self.localizable.push(content_type);
        }
    }

    pub fn insert(&mut self, item: ContentItem) {
        self.items.push(item);
    }

    pub fn insert_term(&mut self, term: TaxonomyTerm) {
        self.terms.push(term);
    }

    /// Locale an item is effectively in: its recorded locale, falling back
    /// to the default locale for unmarked items.
    fn effective_locale(&self, item: &ContentItem) -> Option<Locale> {
        item.locale()
            .map(Locale::new)
            .or_else(|| self.default_locale.clone())
    }

    fn matches_locale_scope(&self, item: &ContentItem, query: &ContentQuery) -> bool {
        if let Some(language) = &query.language {
            return self.effective_locale(item).as_ref() == Some(language);
        }
        if query.suppress_locale_scope {
            return true;
        }
        match &self.default_locale {
            Some(default) => self.effective_locale(item).as_ref() == Some(default),
            None => true,
        }
    }

    fn matches(&self, item: &ContentItem, query: &ContentQuery) -> bool {
        if let Some(content_type) = &query.content_type {
            if &item.content_type != content_type {
                return false;
            }
        }
        if let Some(status) = query.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(search) = &query.search {
            if !item.title.contains(search.as_str()) {
                return false;
            }
        }
        if let Some(parent) = &query.parent {
            if item.parent.as_ref() != Some(parent) {
                return false;
            }
        }
        if let Some((taxonomy, term_id)) = &query.term {
            let in_term = item
                .terms
                .iter()
                .any(|t| &t.taxonomy == taxonomy && t.term_id == *term_id);
            if !in_term {
                return false;
            }
        }
        if let Some((key, value)) = &query.meta_equals {
            if item.meta(key) != Some(value.as_str()) {
                return false;
            }
        }
        self.matches_locale_scope(item, query)
    }

    fn paginate(matched: Vec<&ContentItem>, paging: &Paging) -> StoreResult<ContentPage> {
        let total_count = matched.len() as u64;
        let cursors: Vec<String> = matched.iter().map(|item| item.id.to_string()).collect();

        let mut start = 0usize;
        let mut end = matched.len();
        if let Some(after) = &paging.after {
            let at = cursors
                .iter()
                .position(|c| c == after)
                .ok_or_else(|| StoreError::InvalidCursor(after.clone()))?;
            start = at + 1;
        }
        if let Some(before) = &paging.before {
            let at = cursors
                .iter()
                .position(|c| c == before)
                .ok_or_else(|| StoreError::InvalidCursor(before.clone()))?;
            end = at;
        }
        if end < start {
            end = start;
        }
        if let Some(first) = paging.first {
            end = end.min(start + first as usize);
        }
        if let Some(last) = paging.last {
            start = start.max(end - (last as usize).min(end - start));
        }

        let edges: Vec<ContentEdge> = (start..end)
            .map(|at| ContentEdge {
                cursor: cursors[at].clone(),
                node: matched[at].clone(),
            })
            .collect();
        let page_info = PageInfo {
            has_next_page: end < matched.len(),
            has_previous_page: start > 0,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };
        Ok(ContentPage {
            total_count,
            edges,
            page_info,
        })
    }
}

impl LocaleRegistry for MemoryStore {
    fn default_locale(&self) -> Option<Locale> {
        self.default_locale.clone()
    }

    fn available_locales(&self) -> Vec<Locale> {
        self.locales.clone()
    }

    fn localizable_content_types(&self) -> Vec<String> {
        self.localizable.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn content_meta(&self, id: &ContentId, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .items
            .iter()
            .find(|item| &item.id == id)
            .and_then(|item| item.meta(key))
            .map(str::to_string))
    }

    async fn query_content(&self, query: &ContentQuery) -> StoreResult<ContentPage> {
        let matched: Vec<&ContentItem> = self
            .items
            .iter()
            .filter(|item| self.matches(item, query))
            .collect();
        Self::paginate(matched, &query.paging)
    }

    async fn count_published_by_term(
        &self,
        taxonomy: &str,
        term_id: TermId,
        scope: &LocaleScope,
    ) -> StoreResult<u64> {
        let query = ContentQuery {
            term: Some((taxonomy.to_string(), term_id)),
            ..ContentQuery::default()
        }
        .published()
        .scoped(scope);
        Ok(self.query_content(&query).await?.total_count)
    }

    async fn list_terms(&self, taxonomy: &str) -> StoreResult<Vec<TaxonomyTerm>> {
        Ok(self
            .terms
            .iter()
            .filter(|term| term.taxonomy == taxonomy)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::META_ORIGINAL_ID;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set_default_locale("en_US");
        store.add_locale("en_US");
        store.add_locale("fr_FR");
        store.mark_localizable("post");
        store.insert(ContentItem::new("1", "post", "Hello").with_locale("en_US"));
        store.insert(
            ContentItem::new("2", "post", "Bonjour")
                .with_locale("fr_FR")
                .with_original("1"),
        );
        store.insert(ContentItem::new("3", "post", "Unmarked"));
        store
    }

    fn ids(page: &ContentPage) -> Vec<&str> {
        page.nodes().map(|node| node.id.as_str()).collect()
    }

    #[tokio::test]
    async fn ambient_scope_restricts_to_default_locale() {
        let store = store();
        let page = store
            .query_content(&ContentQuery::for_type("post"))
            .await
            .unwrap();
        // Unmarked items count as default-locale items.
        assert_eq!(ids(&page), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn suppressed_scope_returns_every_locale() {
        let store = store();
        let query = ContentQuery::for_type("post").scoped(&LocaleScope::All);
        let page = store.query_content(&query).await.unwrap();
        assert_eq!(ids(&page), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn language_constraint_overrides_ambient_scope() {
        let store = store();
        let query =
            ContentQuery::for_type("post").scoped(&LocaleScope::Language(Locale::new("fr_FR")));
        let page = store.query_content(&query).await.unwrap();
        assert_eq!(ids(&page), vec!["2"]);
    }

    #[tokio::test]
    async fn meta_equality_finds_siblings() {
        let store = store();
        let query = ContentQuery {
            content_type: Some("post".to_string()),
            meta_equals: Some((META_ORIGINAL_ID.to_string(), "1".to_string())),
            suppress_locale_scope: true,
            ..ContentQuery::default()
        };
        let page = store.query_content(&query).await.unwrap();
        assert_eq!(ids(&page), vec!["2"]);
    }

    #[tokio::test]
    async fn paging_walks_forward_with_cursors() {
        let store = store();
        let mut query = ContentQuery::for_type("post").scoped(&LocaleScope::All);
        query.paging.first = Some(2);
        let page = store.query_content(&query).await.unwrap();
        assert_eq!(ids(&page), vec!["1", "2"]);
        assert_eq!(page.total_count, 3);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);

        query.paging.after = page.page_info.end_cursor.clone();
        let page = store.query_content(&query).await.unwrap();
        assert_eq!(ids(&page), vec!["3"]);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[tokio::test]
    async fn unknown_cursor_is_rejected() {
        let store = store();
        let mut query = ContentQuery::for_type("post");
        query.paging.after = Some("999".to_string());
        let result = store.query_content(&query).await;
        assert_matches!(result, Err(StoreError::InvalidCursor(_)));
    }

    #[tokio::test]
    async fn term_counts_follow_locale_scope() {
        let mut store = MemoryStore::new();
        store.set_default_locale("en_US");
        store.insert_term(TaxonomyTerm::new(7, "category", "News"));
        for id in ["1", "2", "3"] {
            store.insert(
                ContentItem::new(id, "post", "En")
                    .with_locale("en_US")
                    .in_term("category", 7),
            );
        }
        for id in ["4", "5"] {
            store.insert(
                ContentItem::new(id, "post", "Fr")
                    .with_locale("fr_FR")
                    .in_term("category", 7),
            );
        }
        store.insert(
            ContentItem::new("6", "post", "Draft")
                .with_locale("en_US")
                .with_status(crate::types::ContentStatus::Draft)
                .in_term("category", 7),
        );

        let en = LocaleScope::Language(Locale::new("en_US"));
        let fr = LocaleScope::Language(Locale::new("fr_FR"));
        assert_eq!(
            store
                .count_published_by_term("category", TermId(7), &en)
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            store
                .count_published_by_term("category", TermId(7), &fr)
                .await
                .unwrap(),
            2
        );
        assert_eq!(
            store
                .count_published_by_term("category", TermId(7), &LocaleScope::All)
                .await
                .unwrap(),
            5
        );
        // Ambient scope falls back to the default locale.
        assert_eq!(
            store
                .count_published_by_term("category", TermId(7), &LocaleScope::Ambient)
                .await
                .unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn terms_are_listed_per_taxonomy() {
        let mut store = MemoryStore::new();
        store.insert_term(TaxonomyTerm::new(1, "category", "News"));
        store.insert_term(TaxonomyTerm::new(2, "tag", "rust"));
        let terms = store.list_terms("category").await.unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].name, "News");
    }

    #[tokio::test]
    async fn absent_items_and_keys_read_as_none() {
        let store = store();
        assert_eq!(
            store
                .content_meta(&ContentId::new("999"), META_ORIGINAL_ID)
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            store
                .content_meta(&ContentId::new("1"), META_ORIGINAL_ID)
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            store
                .content_meta(&ContentId::new("2"), META_ORIGINAL_ID)
                .await
                .unwrap(),
            Some("1".to_string())
        );
    }
}
