//! # polyglot-graphql
//!
//! Locale-aware extensions for a content system's GraphQL schema, expressed
//! over `async_graphql::dynamic`. Five registration modules run once per
//! schema build, in dependency order:
//!
//! - [`fields`]: `locale` and `originalId` on localizable content types,
//!   `defaultLocale` and `allLocales` at the query root.
//! - [`locales`]: the `Locale` enum backing the filter argument.
//! - [`filtering`]: injection of the `locale` argument into eligible
//!   where-args inputs, and its translation into store query parameters.
//! - [`connection`]: relay-style connection machinery and the
//!   `translations` connection linking locale siblings.
//! - [`terms`]: `countByLocale` on taxonomy term objects.
//!
//! [`schema::build_schema`] composes all of them over a host type catalog.
//! Resolvers receive their context (content type, taxonomy, store handle) as
//! explicit parameters captured at registration time and share no mutable
//! state; the content store is queried fresh on every invocation.

pub mod connection;
pub mod fields;
pub mod filtering;
pub mod locales;
pub mod schema;
pub mod terms;

pub use schema::{build_schema, SchemaCatalog, ROOT_QUERY};

use thiserror::Error;

pub type GraphqlResult<T> = Result<T, GraphqlError>;

#[derive(Debug, Error)]
pub enum GraphqlError {
    #[error("Error building dynamic schema: {0:?}")]
    DynamicSchemaBuildError(#[from] async_graphql::dynamic::SchemaError),
    #[error("Localizable content type missing from the schema catalog: {0:?}")]
    UnknownContentType(String),
    #[error("Content type or taxonomy has no usable GraphQL name: {0:?}")]
    UnresolvedTypeName(String),
    #[error("Duplicate GraphQL type name: {0:?}")]
    DuplicateTypeName(String),
}
