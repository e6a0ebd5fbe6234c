//! The `Locale` enum type consumed by filter arguments: the `all` keyword
//! plus every configured language code. Rebuilt from the registry on every
//! schema build so configuration changes are picked up.

use std::collections::HashSet;

use async_graphql::dynamic::{Enum, EnumItem, SchemaBuilder, TypeRef};
use extension_trait::extension_trait;
use polyglot_store::{Locale, LocaleRegistry};

#[extension_trait]
pub impl TypeRefLocaleExt for TypeRef {
    const LOCALE: &'static str = "Locale";
}

/// Build the enum backing the `locale` filter argument. Contains exactly one
/// `all` entry plus one entry per configured code; duplicate codes and a
/// misconfigured literal `all` code are skipped.
pub fn locale_enum(registry: &dyn LocaleRegistry) -> Enum {
    let mut seen: HashSet<String> = HashSet::from([Locale::ALL_KEYWORD.to_string()]);
    let mut locales = Enum::new(TypeRef::LOCALE)
        .description("Available content locales; `all` ignores locale scoping.")
        .item(
            EnumItem::new(Locale::ALL_KEYWORD)
                .description("Match content in every locale, ignoring the default-locale restriction."),
        );
    for locale in registry.available_locales() {
        if seen.insert(locale.code().to_string()) {
            locales = locales.item(EnumItem::new(locale.code()));
        }
    }
    locales
}

#[extension_trait]
pub impl SchemaBuilderLocaleExt for SchemaBuilder {
    fn register_locale_types(self, registry: &dyn LocaleRegistry) -> Self {
        self.register(locale_enum(registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sdl_block;
    use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, Schema};
    use polyglot_store::LocaleConfig;

    fn sdl_with(registry: &dyn LocaleRegistry) -> String {
        // A dummy query keeps the schema buildable.
        let query = Object::new("Query").field(Field::new(
            "dummy",
            TypeRef::named(TypeRef::INT),
            |_| FieldFuture::new(async move { Ok(Some(FieldValue::value(1))) }),
        ));
        Schema::build("Query", None, None)
            .register_locale_types(registry)
            .register(query)
            .finish()
            .unwrap()
            .sdl()
    }

    #[test]
    fn contains_all_plus_configured_codes() {
        let config = LocaleConfig::from_yaml(
            "locales:\n  - code: en_US\n  - code: fr_FR\n",
        )
        .unwrap();
        let sdl = sdl_with(&config);
        let block = sdl_block(&sdl, "enum Locale");
        assert!(block.contains("all"));
        assert!(block.contains("en_US"));
        assert!(block.contains("fr_FR"));
    }

    #[test]
    fn duplicates_and_reserved_keyword_are_skipped() {
        let config = LocaleConfig::from_yaml(
            "locales:\n  - code: en_US\n  - code: en_US\n  - code: all\n",
        )
        .unwrap();
        let sdl = sdl_with(&config);
        let block = sdl_block(&sdl, "enum Locale");
        assert_eq!(block.matches("en_US").count(), 1);
        assert_eq!(block.matches("all").count(), 1);
    }

    #[test]
    fn unconfigured_registry_still_offers_all() {
        let sdl = sdl_with(&LocaleConfig::default());
        let block = sdl_block(&sdl, "enum Locale");
        assert!(block.contains("all"));
    }
}
