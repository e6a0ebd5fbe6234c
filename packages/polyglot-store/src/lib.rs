//! # polyglot-store
//!
//! Domain types and collaborator interfaces consumed by the Polyglot GraphQL
//! layer: the content store holding localized items and the locale registry
//! supplied by the multilingual add-on. The GraphQL layer owns neither; it
//! queries them through the traits defined here.

pub mod config;
pub mod memory;
pub mod query;
pub mod store;
pub mod types;

pub use config::LocaleConfig;
pub use memory::MemoryStore;
pub use query::{ContentEdge, ContentPage, ContentQuery, LocaleScope, PageInfo, Paging};
pub use store::{ContentStore, LocaleRegistry};
pub use types::{
    ContentId, ContentItem, ContentStatus, ContentTypeDescriptor, Locale,
    TaxonomyDescriptor, TaxonomyTerm, TermId, TermRef, META_LOCALE, META_ORIGINAL_ID,
};

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid pagination cursor: {0:?}")]
    InvalidCursor(String),
    #[error("Invalid locale configuration: {0}")]
    InvalidConfig(#[from] serde_yaml::Error),
    #[error("Could not read locale configuration: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}
