//! The `locale` filter argument: which where-args inputs receive it, and how
//! it translates into store query parameters.
//!
//! Eligibility is decided from the catalog at schema-build time, by the
//! target output type of the connection whose where-args input is being
//! generated. No pattern matching over generated type names is involved.

use std::collections::HashSet;

use async_graphql::dynamic::{InputObject, InputValue, ResolverContext, TypeRef};
use extension_trait::extension_trait;
use polyglot_store::{ContentQuery, LocaleScope};

use crate::connection::TypeRefConnectionExt;
use crate::locales::TypeRefLocaleExt;

/// Where-args type of the root connection over the generic content-node
/// interface.
pub const CONTENT_NODE_WHERE_ARGS: &str = "RootQueryToContentNodeConnectionWhereArgs";

/// Where-args type of the children connections on hierarchical types.
pub const CONTENT_NODE_CHILDREN_WHERE_ARGS: &str =
    "HierarchicalContentNodeToContentNodeChildrenConnectionWhereArgs";

/// Naming convention for generated where-args input types.
pub fn where_args_name(from_type: &str, target_type: &str) -> String {
    format!("{from_type}To{target_type}ConnectionWhereArgs")
}

/// Eligibility map for the locale filter. A where-args input receives the
/// filter when its connection targets a localizable type, or targets the
/// generic content-node interface, which may resolve to any content type and
/// is therefore offered the filter regardless.
#[derive(Clone, Debug, Default)]
pub struct FilterEligibility {
    localizable: HashSet<String>,
}

impl FilterEligibility {
    /// `localizable_graphql_names` are the exposed type names of the
    /// localizable content types.
    pub fn new(localizable_graphql_names: impl IntoIterator<Item = String>) -> Self {
        Self {
            localizable: localizable_graphql_names.into_iter().collect(),
        }
    }

    /// `target_type` is the output type of the connection whose where-args
    /// input is being generated.
    pub fn applies_to(&self, target_type: &str) -> bool {
        target_type == TypeRef::CONTENT_NODE || self.localizable.contains(target_type)
    }
}

#[extension_trait]
pub impl InputObjectLocaleFilterExt for InputObject {
    /// The optional `locale` argument; no default value.
    fn locale_filter(self) -> Self {
        self.field(
            InputValue::new("locale", TypeRef::named(TypeRef::LOCALE))
                .description("Locale of the content item."),
        )
    }

    fn locale_filter_if(self, eligibility: &FilterEligibility, target_type: &str) -> Self {
        if eligibility.applies_to(target_type) {
            self.locale_filter()
        } else {
            self
        }
    }
}

/// Fold a connection's `where` argument into the store query. The `locale`
/// member follows the [`LocaleScope`] contract; the remaining members are
/// plain host filters.
pub fn apply_where_args(
    query: &mut ContentQuery,
    ctx: &ResolverContext<'_>,
) -> async_graphql::Result<()> {
    let where_value = ctx.args.get("where");
    let Some(where_value) = where_value.as_ref() else {
        return Ok(());
    };
    let args = where_value.object()?;
    if let Some(search) = args.get("search") {
        query.search = Some(search.string()?.to_string());
    }
    let locale = match args.get("locale").as_ref() {
        Some(value) => Some(value.enum_name()?.to_string()),
        None => None,
    };
    LocaleScope::from_filter(locale.as_deref()).apply(query);
    Ok(())
}
