//! Locale metadata fields: `locale` and `originalId` on localizable content
//! types, `defaultLocale` and `allLocales` at the query root. Absent
//! metadata and unconfigured registries normalize to empty values, never
//! null and never an error.

use std::sync::Arc;

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, TypeRef};
use extension_trait::extension_trait;
use polyglot_store::{ContentItem, LocaleRegistry, META_LOCALE, META_ORIGINAL_ID};

fn meta_string_field(name: &str, key: &'static str, description: &str) -> Field {
    Field::new(name, TypeRef::named_nn(TypeRef::STRING), move |ctx| {
        FieldFuture::new(async move {
            let item = ctx.parent_value.try_downcast_ref::<ContentItem>()?;
            let value = item.meta(key).unwrap_or_default().to_string();
            Ok(Some(FieldValue::value(value)))
        })
    })
    .description(description)
}

#[extension_trait]
pub impl ObjectLocaleFieldsExt for Object {
    /// `locale` and `originalId` on a localizable content type.
    fn locale_fields(self) -> Self {
        self.field(meta_string_field(
            "locale",
            META_LOCALE,
            "Locale of the content item; empty when none is recorded.",
        ))
        .field(meta_string_field(
            "originalId",
            META_ORIGINAL_ID,
            "Identifier of the content item this one was translated from; empty for originals.",
        ))
    }

    /// `defaultLocale` and `allLocales` on the root query object.
    fn root_locale_fields(self, registry: Arc<dyn LocaleRegistry>) -> Self {
        let default_registry = registry.clone();
        self.field(
            Field::new(
                "defaultLocale",
                TypeRef::named_nn(TypeRef::STRING),
                move |_| {
                    let registry = default_registry.clone();
                    FieldFuture::new(async move {
                        let code = registry
                            .default_locale()
                            .map(|locale| locale.code().to_string())
                            .unwrap_or_default();
                        Ok(Some(FieldValue::value(code)))
                    })
                },
            )
            .description("Default locale of the system; empty when unconfigured."),
        )
        .field(
            Field::new(
                "allLocales",
                TypeRef::named_nn_list_nn(TypeRef::STRING),
                move |_| {
                    let registry = registry.clone();
                    FieldFuture::new(async move {
                        let codes = registry
                            .available_locales()
                            .into_iter()
                            .map(|locale| FieldValue::value(locale.code().to_string()));
                        Ok(Some(FieldValue::list(codes)))
                    })
                },
            )
            .description("Every available locale code."),
        )
    }
}
