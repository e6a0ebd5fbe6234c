//! Collaborator interfaces the GraphQL layer consumes. Both are owned by the
//! host system; this crate only defines the contract and ships an in-memory
//! reference implementation for tests and embedders.

use async_trait::async_trait;

use crate::query::{ContentPage, ContentQuery, LocaleScope};
use crate::types::{ContentId, Locale, TaxonomyTerm, TermId};
use crate::StoreResult;

/// Locale registry supplied by the multilingual add-on. Read at schema-build
/// time and for the cheap root-level locale fields.
pub trait LocaleRegistry: Send + Sync {
    /// The configured default locale, when one exists.
    fn default_locale(&self) -> Option<Locale>;

    /// Configured locales, in configuration order.
    fn available_locales(&self) -> Vec<Locale>;

    /// Internal names of the content types the add-on manages locale
    /// variants for.
    fn localizable_content_types(&self) -> Vec<String>;
}

/// Read-only content store queried fresh on each resolver invocation.
/// Implementations must apply their ambient default-locale restriction to
/// queries unless [`ContentQuery::suppress_locale_scope`] is set.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Per-item metadata lookup. Absent items and absent keys both read as
    /// `None`.
    async fn content_meta(&self, id: &ContentId, key: &str) -> StoreResult<Option<String>>;

    /// Paginated content query honoring every constraint in the filter.
    async fn query_content(&self, query: &ContentQuery) -> StoreResult<ContentPage>;

    /// Count of published items classified under the given term, scoped by
    /// locale per the [`LocaleScope`] contract.
    async fn count_published_by_term(
        &self,
        taxonomy: &str,
        term_id: TermId,
        scope: &LocaleScope,
    ) -> StoreResult<u64>;

    /// Terms of one taxonomy.
    async fn list_terms(&self, taxonomy: &str) -> StoreResult<Vec<TaxonomyTerm>>;
}
