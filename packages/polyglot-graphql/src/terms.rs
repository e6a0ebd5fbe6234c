//! Taxonomy term objects and the per-term `countByLocale` field.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, TypeRef};
use extension_trait::extension_trait;
use polyglot_store::{ContentStore, LocaleScope, TaxonomyDescriptor, TaxonomyTerm};

use crate::locales::TypeRefLocaleExt;

#[extension_trait]
pub impl ObjectTermExt for Object {
    /// Base fields of a term object, resolving from a [`TaxonomyTerm`]
    /// parent value.
    fn term_fields(self) -> Self {
        self.field(Field::new("id", TypeRef::named_nn(TypeRef::ID), |ctx| {
            FieldFuture::new(async move {
                let term = ctx.parent_value.try_downcast_ref::<TaxonomyTerm>()?;
                Ok(Some(FieldValue::value(term.id.to_string())))
            })
        }))
        .field(Field::new(
            "name",
            TypeRef::named_nn(TypeRef::STRING),
            |ctx| {
                FieldFuture::new(async move {
                    let term = ctx.parent_value.try_downcast_ref::<TaxonomyTerm>()?;
                    Ok(Some(FieldValue::value(term.name.clone())))
                })
            },
        ))
    }

    /// `countByLocale(locale: Locale): Int!`: published items classified
    /// under the term, scoped per the locale filter contract. Always an
    /// integer; zero when nothing matches.
    fn count_by_locale_field(
        self,
        taxonomy: &TaxonomyDescriptor,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let taxonomy_name = taxonomy.name.clone();
        self.field(
            Field::new("countByLocale", TypeRef::named_nn(TypeRef::INT), move |ctx| {
                let store = store.clone();
                let taxonomy = taxonomy_name.clone();
                FieldFuture::new(async move {
                    let term = ctx.parent_value.try_downcast_ref::<TaxonomyTerm>()?;
                    let locale_value = ctx.args.get("locale");
                    let locale = match locale_value.as_ref() {
                        Some(value) => Some(value.enum_name()?.to_string()),
                        None => None,
                    };
                    let scope = LocaleScope::from_filter(locale.as_deref());
                    let count = store
                        .count_published_by_term(&taxonomy, term.id, &scope)
                        .await?;
                    Ok(Some(FieldValue::value(count)))
                })
            })
            .argument(
                InputValue::new("locale", TypeRef::named(TypeRef::LOCALE))
                    .description("Count only items in this locale; `all` counts every locale."),
            )
            .description("Published item count for this term, by locale."),
        )
    }
}
