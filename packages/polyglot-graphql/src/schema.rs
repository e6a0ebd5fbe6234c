//! Composed schema build: runs the registration modules in dependency order
//! (enum before filter inputs, fields before connections) over the host's
//! type catalog. The build is a pure function of its inputs: rebuilding
//! yields an equivalent schema, and a rebuild after a configuration change
//! picks up the new locales.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputObject, InputValue, Interface, InterfaceField,
    Object, Schema, TypeRef,
};
use extension_trait::extension_trait;
use polyglot_store::{
    ContentItem, ContentQuery, ContentStore, ContentTypeDescriptor, LocaleRegistry,
    TaxonomyDescriptor,
};
use tracing::{debug, info};

use crate::connection::{
    paging_from_args, FieldPagingExt, ObjectTranslationsExt, SchemaBuilderConnectionExt,
    TypeNameMap, TypeRefConnectionExt,
};
use crate::fields::ObjectLocaleFieldsExt;
use crate::filtering::{
    apply_where_args, where_args_name, FilterEligibility, InputObjectLocaleFilterExt,
    CONTENT_NODE_CHILDREN_WHERE_ARGS, CONTENT_NODE_WHERE_ARGS,
};
use crate::locales::SchemaBuilderLocaleExt;
use crate::terms::ObjectTermExt;
use crate::{GraphqlError, GraphqlResult};

/// Name of the root query type.
pub const ROOT_QUERY: &str = "RootQuery";

/// The host schema's type graph, passed in explicitly at build time. The
/// localizable subset comes from the registry; the catalog must list every
/// content type and taxonomy the host exposes.
#[derive(Clone, Debug, Default)]
pub struct SchemaCatalog {
    pub content_types: Vec<ContentTypeDescriptor>,
    pub taxonomies: Vec<TaxonomyDescriptor>,
}

impl SchemaCatalog {
    pub fn new(
        content_types: Vec<ContentTypeDescriptor>,
        taxonomies: Vec<TaxonomyDescriptor>,
    ) -> Self {
        Self {
            content_types,
            taxonomies,
        }
    }
}

/// Registration-time validation. A localizable content type that cannot be
/// resolved to a schema type is a fatal misconfiguration: failing the build
/// beats silently skipping a field that is hard to diagnose later.
fn validate(
    catalog: &SchemaCatalog,
    registry: &dyn LocaleRegistry,
) -> GraphqlResult<HashSet<String>> {
    let mut graphql_names = HashSet::new();
    for content_type in &catalog.content_types {
        if content_type.graphql_name.is_empty() || content_type.graphql_plural_name.is_empty() {
            return Err(GraphqlError::UnresolvedTypeName(content_type.name.clone()));
        }
        if !graphql_names.insert(content_type.graphql_name.clone()) {
            return Err(GraphqlError::DuplicateTypeName(
                content_type.graphql_name.clone(),
            ));
        }
    }
    for taxonomy in &catalog.taxonomies {
        if taxonomy.graphql_name.is_empty() || taxonomy.graphql_plural_name.is_empty() {
            return Err(GraphqlError::UnresolvedTypeName(taxonomy.name.clone()));
        }
        if !graphql_names.insert(taxonomy.graphql_name.clone()) {
            return Err(GraphqlError::DuplicateTypeName(taxonomy.graphql_name.clone()));
        }
    }

    let catalog_names: HashSet<&str> = catalog
        .content_types
        .iter()
        .map(|content_type| content_type.name.as_str())
        .collect();
    let mut localizable = HashSet::new();
    for name in registry.localizable_content_types() {
        if !catalog_names.contains(name.as_str()) {
            return Err(GraphqlError::UnknownContentType(name));
        }
        localizable.insert(name);
    }
    Ok(localizable)
}

#[extension_trait]
impl ObjectContentItemExt for Object {
    /// Host base fields shared by every content type, resolving from a
    /// [`ContentItem`] parent value.
    fn content_item_fields(self) -> Self {
        self.field(Field::new("id", TypeRef::named_nn(TypeRef::ID), |ctx| {
            FieldFuture::new(async move {
                let item = ctx.parent_value.try_downcast_ref::<ContentItem>()?;
                Ok(Some(FieldValue::value(item.id.to_string())))
            })
        }))
        .field(Field::new(
            "title",
            TypeRef::named_nn(TypeRef::STRING),
            |ctx| {
                FieldFuture::new(async move {
                    let item = ctx.parent_value.try_downcast_ref::<ContentItem>()?;
                    Ok(Some(FieldValue::value(item.title.clone())))
                })
            },
        ))
        .field(Field::new(
            "status",
            TypeRef::named_nn(TypeRef::STRING),
            |ctx| {
                FieldFuture::new(async move {
                    let item = ctx.parent_value.try_downcast_ref::<ContentItem>()?;
                    Ok(Some(FieldValue::value(item.status.to_string())))
                })
            },
        ))
    }
}

fn base_where_args(name: impl Into<String>) -> InputObject {
    InputObject::new(name).field(
        InputValue::new("search", TypeRef::named(TypeRef::STRING))
            .description("Filter by matching title."),
    )
}

fn list_field(
    content_type: &ContentTypeDescriptor,
    store: Arc<dyn ContentStore>,
    where_args: String,
) -> Field {
    let internal_name = content_type.name.clone();
    Field::new(
        content_type.graphql_plural_name.clone(),
        // Connections are nullable so a store failure stays a field-level
        // error instead of nulling the whole response.
        TypeRef::named(TypeRef::connection(&content_type.graphql_name)),
        move |ctx| {
            let store = store.clone();
            let content_type = internal_name.clone();
            FieldFuture::new(async move {
                let mut query = ContentQuery::for_type(content_type).published();
                query.paging = paging_from_args(&ctx)?;
                apply_where_args(&mut query, &ctx)?;
                let page = store.query_content(&query).await?;
                Ok(Some(FieldValue::owned_any(page)))
            })
        },
    )
    .description(format!("Published {} items.", content_type.graphql_name))
    .paging_arguments()
    .argument(InputValue::new("where", TypeRef::named(where_args)))
}

fn content_nodes_field(store: Arc<dyn ContentStore>) -> Field {
    Field::new(
        "contentNodes",
        TypeRef::named(TypeRef::connection(TypeRef::CONTENT_NODE)),
        move |ctx| {
            let store = store.clone();
            FieldFuture::new(async move {
                let mut query = ContentQuery::default().published();
                query.paging = paging_from_args(&ctx)?;
                apply_where_args(&mut query, &ctx)?;
                let page = store.query_content(&query).await?;
                Ok(Some(FieldValue::owned_any(page)))
            })
        },
    )
    .description("Published content items of every type.")
    .paging_arguments()
    .argument(InputValue::new("where", TypeRef::named(CONTENT_NODE_WHERE_ARGS)))
}

fn children_field(store: Arc<dyn ContentStore>) -> Field {
    Field::new(
        "children",
        TypeRef::named(TypeRef::connection(TypeRef::CONTENT_NODE)),
        move |ctx| {
            let store = store.clone();
            FieldFuture::new(async move {
                let item = ctx.parent_value.try_downcast_ref::<ContentItem>()?;
                let mut query = ContentQuery::default().published();
                query.parent = Some(item.id.clone());
                query.paging = paging_from_args(&ctx)?;
                apply_where_args(&mut query, &ctx)?;
                let page = store.query_content(&query).await?;
                Ok(Some(FieldValue::owned_any(page)))
            })
        },
    )
    .description("Direct children of this content item.")
    .paging_arguments()
    .argument(InputValue::new(
        "where",
        TypeRef::named(CONTENT_NODE_CHILDREN_WHERE_ARGS),
    ))
}

fn terms_field(taxonomy: &TaxonomyDescriptor, store: Arc<dyn ContentStore>) -> Field {
    let internal_name = taxonomy.name.clone();
    Field::new(
        taxonomy.graphql_plural_name.clone(),
        TypeRef::named_nn_list_nn(taxonomy.graphql_name.as_str()),
        move |_| {
            let store = store.clone();
            let taxonomy = internal_name.clone();
            FieldFuture::new(async move {
                let terms = store.list_terms(&taxonomy).await?;
                Ok(Some(FieldValue::list(
                    terms.into_iter().map(FieldValue::owned_any),
                )))
            })
        },
    )
    .description(format!("Every {} term.", taxonomy.graphql_name))
}

/// Build the locale-aware schema over the given catalog, registry, and
/// store. Runs every registration module once, in dependency order.
pub fn build_schema(
    catalog: &SchemaCatalog,
    registry: Arc<dyn LocaleRegistry>,
    store: Arc<dyn ContentStore>,
) -> GraphqlResult<Schema> {
    let localizable = validate(catalog, registry.as_ref())?;
    let eligibility = FilterEligibility::new(
        catalog
            .content_types
            .iter()
            .filter(|content_type| localizable.contains(&content_type.name))
            .map(|content_type| content_type.graphql_name.clone()),
    );
    let type_names: TypeNameMap = Arc::new(
        catalog
            .content_types
            .iter()
            .map(|content_type| (content_type.name.clone(), content_type.graphql_name.clone()))
            .collect::<HashMap<_, _>>(),
    );

    info!(
        content_types = catalog.content_types.len(),
        localizable = localizable.len(),
        taxonomies = catalog.taxonomies.len(),
        locales = registry.available_locales().len(),
        "building locale-aware schema"
    );

    // Locale enum first: filter inputs reference it.
    let mut builder = Schema::build(ROOT_QUERY, None, None)
        .register_locale_types(registry.as_ref())
        .register_page_info_type();

    // Generic content-node interface plus its connection types; the root
    // entry point over it may resolve to any content type.
    let content_node = Interface::new(TypeRef::CONTENT_NODE)
        .description("Any content item, localizable or not.")
        .field(InterfaceField::new("id", TypeRef::named_nn(TypeRef::ID)))
        .field(InterfaceField::new("title", TypeRef::named_nn(TypeRef::STRING)))
        .field(InterfaceField::new("status", TypeRef::named_nn(TypeRef::STRING)));
    builder = builder
        .register(content_node)
        .register_content_connection_types(TypeRef::CONTENT_NODE, type_names.clone())
        .register(
            base_where_args(CONTENT_NODE_WHERE_ARGS)
                .locale_filter_if(&eligibility, TypeRef::CONTENT_NODE),
        );

    if catalog.content_types.iter().any(|ct| ct.hierarchical) {
        builder = builder.register(
            base_where_args(CONTENT_NODE_CHILDREN_WHERE_ARGS)
                .locale_filter_if(&eligibility, TypeRef::CONTENT_NODE),
        );
    }

    let mut root = Object::new(ROOT_QUERY).root_locale_fields(registry.clone());
    root = root.field(content_nodes_field(store.clone()));

    for content_type in &catalog.content_types {
        let is_localizable = localizable.contains(&content_type.name);
        debug!(
            content_type = %content_type.name,
            graphql_name = %content_type.graphql_name,
            localizable = is_localizable,
            "registering content type"
        );

        let mut object = Object::new(&content_type.graphql_name)
            .implement(TypeRef::CONTENT_NODE)
            .content_item_fields();
        if is_localizable {
            object = object
                .locale_fields()
                .translations_connection(content_type, store.clone());
            // Where-args of the type-to-type translations connection.
            builder = builder.register(
                base_where_args(where_args_name(
                    &content_type.graphql_name,
                    &content_type.graphql_name,
                ))
                .locale_filter_if(&eligibility, &content_type.graphql_name),
            );
        }
        if content_type.hierarchical {
            object = object.field(children_field(store.clone()));
        }

        let root_where_args = where_args_name(ROOT_QUERY, &content_type.graphql_name);
        builder = builder
            .register(object)
            .register_content_connection_types(
                content_type.graphql_name.as_str(),
                type_names.clone(),
            )
            .register(
                base_where_args(root_where_args.clone())
                    .locale_filter_if(&eligibility, &content_type.graphql_name),
            );
        root = root.field(list_field(content_type, store.clone(), root_where_args));
    }

    for taxonomy in &catalog.taxonomies {
        let term_object = Object::new(&taxonomy.graphql_name)
            .term_fields()
            .count_by_locale_field(taxonomy, store.clone());
        builder = builder.register(term_object);
        root = root.field(terms_field(taxonomy, store.clone()));
    }

    Ok(builder.register(root).finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{catalog, sdl_block, store};
    use assert_matches::assert_matches;
    use polyglot_store::{ContentTypeDescriptor, MemoryStore};

    fn build_sdl() -> String {
        let store = store();
        build_schema(&catalog(), store.clone(), store)
            .unwrap()
            .sdl()
    }

    #[test]
    fn localizable_types_expose_locale_metadata_fields() {
        let sdl = build_sdl();
        let post = sdl_block(&sdl, "type Post ");
        assert!(post.contains("locale: String!"));
        assert!(post.contains("originalId: String!"));
        assert!(post.contains("translations("));
    }

    #[test]
    fn plain_types_are_left_untouched() {
        let sdl = build_sdl();
        let page = sdl_block(&sdl, "type Page ");
        assert!(!page.contains("locale"));
        assert!(!page.contains("originalId"));
        assert!(!page.contains("translations"));
        // Hierarchical types still get their children connection.
        assert!(page.contains("children("));
    }

    #[test]
    fn filter_lands_on_eligible_where_args_only() {
        let sdl = build_sdl();
        assert!(
            sdl_block(&sdl, "input RootQueryToPostConnectionWhereArgs")
                .contains("locale: Locale")
        );
        assert!(
            !sdl_block(&sdl, "input RootQueryToPageConnectionWhereArgs")
                .contains("locale: Locale")
        );
        // Generic content-node entry points are offered the filter
        // regardless.
        assert!(sdl_block(&sdl, "input RootQueryToContentNodeConnectionWhereArgs")
            .contains("locale: Locale"));
        assert!(sdl_block(
            &sdl,
            "input HierarchicalContentNodeToContentNodeChildrenConnectionWhereArgs"
        )
        .contains("locale: Locale"));
    }

    #[test]
    fn root_exposes_locale_fields_and_term_lists() {
        let sdl = build_sdl();
        let root = sdl_block(&sdl, "type RootQuery ");
        assert!(root.contains("defaultLocale: String!"));
        assert!(root.contains("allLocales: [String!]!"));
        assert!(root.contains("contentNodes("));
        assert!(root.contains("posts("));
        assert!(root.contains("categories: [Category!]!"));
    }

    #[test]
    fn term_types_expose_count_by_locale() {
        let sdl = build_sdl();
        let category = sdl_block(&sdl, "type Category ");
        assert!(category.contains("countByLocale(locale: Locale): Int!"));
    }

    #[test]
    fn rebuild_produces_an_equivalent_schema() {
        assert_eq!(build_sdl(), build_sdl());
    }

    #[test]
    fn rebuild_picks_up_locale_changes() {
        let store = store();
        let before = build_schema(&catalog(), store.clone(), store).unwrap().sdl();
        assert!(!sdl_block(&before, "enum Locale").contains("de_DE"));

        let mut changed = MemoryStore::new();
        changed.set_default_locale("en_US");
        changed.add_locale("en_US");
        changed.add_locale("de_DE");
        changed.mark_localizable("post");
        let changed = Arc::new(changed);
        let after = build_schema(&catalog(), changed.clone(), changed)
            .unwrap()
            .sdl();
        assert!(sdl_block(&after, "enum Locale").contains("de_DE"));
    }

    #[test]
    fn unknown_localizable_type_fails_the_build() {
        let mut registry = MemoryStore::new();
        registry.mark_localizable("movie");
        let registry = Arc::new(registry);
        let result = build_schema(&catalog(), registry.clone(), registry);
        assert_matches!(result, Err(GraphqlError::UnknownContentType(name)) if name == "movie");
    }

    #[test]
    fn blank_graphql_name_fails_the_build() {
        let broken = SchemaCatalog::new(
            vec![ContentTypeDescriptor::new("post", "", "posts")],
            vec![],
        );
        let store = store();
        let result = build_schema(&broken, store.clone(), store);
        assert_matches!(result, Err(GraphqlError::UnresolvedTypeName(name)) if name == "post");
    }

    #[test]
    fn duplicate_graphql_name_fails_the_build() {
        let broken = SchemaCatalog::new(
            vec![
                ContentTypeDescriptor::new("post", "Post", "posts"),
                ContentTypeDescriptor::new("article", "Post", "articles"),
            ],
            vec![],
        );
        let store = store();
        let result = build_schema(&broken, store.clone(), store);
        assert_matches!(result, Err(GraphqlError::DuplicateTypeName(name)) if name == "Post");
    }
}
