//! `async_graphql::dynamic` extensions for relay-style content connections,
//! including the `translations` connection linking a localizable content
//! item to its locale siblings.
//! See: https://relay.dev/graphql/connections.htm

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext, SchemaBuilder,
    TypeRef,
};
use extension_trait::extension_trait;
use polyglot_store::{
    ContentEdge, ContentItem, ContentPage, ContentQuery, ContentStore,
    ContentTypeDescriptor, PageInfo, Paging, META_ORIGINAL_ID,
};

use crate::filtering::{apply_where_args, where_args_name};

/// Internal content-type name → exposed GraphQL type name. Node values are
/// tagged with their concrete type so they also resolve through abstract
/// types such as `ContentNode`.
pub type TypeNameMap = Arc<HashMap<String, String>>;

#[extension_trait]
pub impl TypeRefConnectionExt for TypeRef {
    const PAGE_INFO: &'static str = "PageInfo";
    const CONTENT_NODE: &'static str = "ContentNode";

    fn connection(node_name: impl Into<String>) -> String {
        format!("{}Connection", node_name.into())
    }

    fn edge(node_name: impl Into<String>) -> String {
        format!("{}Edge", node_name.into())
    }
}

fn node_value<'a>(node: ContentItem, type_names: &TypeNameMap) -> FieldValue<'a> {
    let type_name = type_names.get(&node.content_type).cloned();
    let value = FieldValue::owned_any(node);
    match type_name {
        Some(name) => value.with_type(name),
        None => value,
    }
}

#[extension_trait]
pub impl ObjectConnectionExt for Object {
    /// Connection object resolving from a [`ContentPage`] parent value.
    fn new_content_connection(node_name: impl Into<String>, type_names: TypeNameMap) -> Self {
        let node_name = node_name.into();
        Self::new(TypeRef::connection(node_name.clone()))
            .field(
                Field::new("totalCount", TypeRef::named_nn(TypeRef::INT), |ctx| {
                    FieldFuture::new(async move {
                        let page = ctx.parent_value.try_downcast_ref::<ContentPage>()?;
                        Ok(Some(FieldValue::value(page.total_count)))
                    })
                })
                .description("Count of every match, not just the returned window."),
            )
            .field(Field::new(
                "nodes",
                TypeRef::named_nn_list_nn(node_name.clone()),
                move |ctx| {
                    let type_names = type_names.clone();
                    FieldFuture::new(async move {
                        let page = ctx.parent_value.try_downcast_ref::<ContentPage>()?;
                        Ok(Some(FieldValue::list(
                            page.nodes().cloned().map(|node| node_value(node, &type_names)),
                        )))
                    })
                },
            ))
            .field(Field::new(
                "edges",
                TypeRef::named_nn_list_nn(TypeRef::edge(node_name)),
                |ctx| {
                    FieldFuture::new(async move {
                        let page = ctx.parent_value.try_downcast_ref::<ContentPage>()?;
                        Ok(Some(FieldValue::list(
                            page.edges.iter().cloned().map(FieldValue::owned_any),
                        )))
                    })
                },
            ))
            .field(Field::new(
                "pageInfo",
                TypeRef::named_nn(TypeRef::PAGE_INFO),
                |ctx| {
                    FieldFuture::new(async move {
                        let page = ctx.parent_value.try_downcast_ref::<ContentPage>()?;
                        Ok(Some(FieldValue::owned_any(page.page_info.clone())))
                    })
                },
            ))
    }

    /// Edge object resolving from a [`ContentEdge`] parent value.
    fn new_content_edge(node_name: impl Into<String>, type_names: TypeNameMap) -> Self {
        let node_name = node_name.into();
        Self::new(TypeRef::edge(node_name.clone()))
            .field(Field::new(
                "node",
                TypeRef::named_nn(node_name),
                move |ctx| {
                    let type_names = type_names.clone();
                    FieldFuture::new(async move {
                        let edge = ctx.parent_value.try_downcast_ref::<ContentEdge>()?;
                        Ok(Some(node_value(edge.node.clone(), &type_names)))
                    })
                },
            ))
            .field(Field::new(
                "cursor",
                TypeRef::named_nn(TypeRef::STRING),
                |ctx| {
                    FieldFuture::new(async move {
                        let edge = ctx.parent_value.try_downcast_ref::<ContentEdge>()?;
                        Ok(Some(FieldValue::value(edge.cursor.clone())))
                    })
                },
            ))
    }
}

#[extension_trait]
pub impl SchemaBuilderConnectionExt for SchemaBuilder {
    /// The shared `PageInfo` type; registered once per schema build.
    /// See: https://relay.dev/graphql/connections.htm#sec-PageInfo
    fn register_page_info_type(self) -> Self {
        let page_info = Object::new(TypeRef::PAGE_INFO)
            .field(Field::new(
                "hasNextPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                |ctx| {
                    FieldFuture::new(async move {
                        let info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
                        Ok(Some(FieldValue::value(info.has_next_page)))
                    })
                },
            ))
            .field(Field::new(
                "hasPreviousPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                |ctx| {
                    FieldFuture::new(async move {
                        let info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
                        Ok(Some(FieldValue::value(info.has_previous_page)))
                    })
                },
            ))
            .field(Field::new(
                "startCursor",
                TypeRef::named(TypeRef::STRING),
                |ctx| {
                    FieldFuture::new(async move {
                        let info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
                        Ok(info.start_cursor.clone().map(FieldValue::value))
                    })
                },
            ))
            .field(Field::new(
                "endCursor",
                TypeRef::named(TypeRef::STRING),
                |ctx| {
                    FieldFuture::new(async move {
                        let info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
                        Ok(info.end_cursor.clone().map(FieldValue::value))
                    })
                },
            ));
        self.register(page_info)
    }

    /// Connection and edge types for one node type.
    fn register_content_connection_types(
        self,
        node_name: impl Into<String>,
        type_names: TypeNameMap,
    ) -> Self {
        let node_name = node_name.into();
        self.register(Object::new_content_edge(node_name.clone(), type_names.clone()))
            .register(Object::new_content_connection(node_name, type_names))
    }
}

#[extension_trait]
pub impl FieldPagingExt for Field {
    /// Relay pagination arguments, passed through to the store unchanged.
    /// See: https://relay.dev/graphql/connections.htm#sec-Arguments
    fn paging_arguments(self) -> Self {
        self.argument(
            InputValue::new("first", TypeRef::named(TypeRef::INT)).description(
                "Paginate forward, returning the given amount of edges at most.",
            ),
        )
        .argument(
            InputValue::new("after", TypeRef::named(TypeRef::STRING))
                .description("Return edges after the given cursor."),
        )
        .argument(
            InputValue::new("last", TypeRef::named(TypeRef::INT)).description(
                "Paginate backward, returning the given amount of edges at most.",
            ),
        )
        .argument(
            InputValue::new("before", TypeRef::named(TypeRef::STRING))
                .description("Return edges before the given cursor."),
        )
    }
}

/// Read pagination arguments off a resolver context.
pub fn paging_from_args(ctx: &ResolverContext<'_>) -> async_graphql::Result<Paging> {
    let mut paging = Paging::default();
    if let Some(value) = ctx.args.get("first") {
        paging.first = Some(value.u64()?);
    }
    if let Some(value) = ctx.args.get("after") {
        paging.after = Some(value.string()?.to_string());
    }
    if let Some(value) = ctx.args.get("last") {
        paging.last = Some(value.u64()?);
    }
    if let Some(value) = ctx.args.get("before") {
        paging.before = Some(value.string()?.to_string());
    }
    Ok(paging)
}

#[extension_trait]
pub impl ObjectTranslationsExt for Object {
    /// `translations` connection from a localizable type to itself.
    ///
    /// Resolution is the literal sibling query: read the source item's
    /// original-content pointer and match items of the same type whose own
    /// pointer equals it. The source item satisfies that filter too, so a
    /// translated item appears in its own list; an item with no recorded
    /// original resolves to an empty connection even when other items point
    /// at it. Ambient locale scoping would hide siblings by definition, so
    /// the sibling query suppresses it unless the `locale` filter overrides.
    fn translations_connection(
        self,
        content_type: &ContentTypeDescriptor,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let internal_name = content_type.name.clone();
        let where_args = where_args_name(&content_type.graphql_name, &content_type.graphql_name);
        self.field(
            Field::new(
                "translations",
                // Nullable: a store failure nulls this field alone instead of
                // the enclosing item.
                TypeRef::named(TypeRef::connection(&content_type.graphql_name)),
                move |ctx| {
                    let store = store.clone();
                    let content_type = internal_name.clone();
                    FieldFuture::new(async move {
                        let item = ctx.parent_value.try_downcast_ref::<ContentItem>()?;
                        let Some(original) = item.original_id() else {
                            return Ok(Some(FieldValue::owned_any(ContentPage::empty())));
                        };
                        let mut query = ContentQuery::for_type(content_type).published();
                        query.meta_equals =
                            Some((META_ORIGINAL_ID.to_string(), original.to_string()));
                        query.suppress_locale_scope = true;
                        query.paging = paging_from_args(&ctx)?;
                        apply_where_args(&mut query, &ctx)?;
                        let page = store.query_content(&query).await?;
                        Ok(Some(FieldValue::owned_any(page)))
                    })
                },
            )
            .description("Locale siblings sharing this item's original content.")
            .paging_arguments()
            .argument(InputValue::new("where", TypeRef::named(where_args))),
        )
    }
}
