//! Page and collection serializers: entities to JSON objects through a schema.

use crate::content::{Entity, EntityRef};
use crate::error::TransformError;
use crate::schema::{Schema, SchemaSpec, TransformerRegistry};
use serde_json::{Map, Value};

/// Key holding the entity identifier. Always the first key of a serialized page.
pub const SLUG_KEY: &str = "slug";

pub struct PageSerializer;

impl PageSerializer {
    /// `{ "slug": .., <schema fields in declaration order> }`. Transformer errors propagate.
    ///
    /// The identifier always wins: a schema field named `slug` is skipped, so the result holds
    /// one key per distinct schema field besides `slug`, plus the identifier.
    pub fn serialize(
        entity: &dyn Entity,
        spec: &SchemaSpec,
        registry: &TransformerRegistry,
    ) -> Result<Map<String, Value>, TransformError> {
        let schema = Schema::new(spec, registry);
        let mut data = Map::new();
        data.insert(SLUG_KEY.to_string(), Value::String(entity.slug().to_string()));
        for field in schema.fields() {
            if field == SLUG_KEY {
                tracing::debug!(slug = %entity.slug(), "schema field `slug` skipped, the identifier is kept");
                continue;
            }
            let value = entity.field(field);
            let transformed = schema.transformer(field)?.apply(value.as_ref())?;
            data.insert(field.to_string(), transformed);
        }
        Ok(data)
    }
}

pub struct CollectionSerializer;

impl CollectionSerializer {
    /// One object per entity in iteration order. The first failure aborts the whole call.
    pub fn serialize(
        entities: &[EntityRef],
        spec: &SchemaSpec,
        registry: &TransformerRegistry,
    ) -> Result<Vec<Value>, TransformError> {
        entities
            .iter()
            .map(|entity| PageSerializer::serialize(entity.as_ref(), spec, registry).map(Value::Object))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::site;
    use crate::schema::{Transformer, TransformerSpec};
    use serde_json::json;

    #[test]
    fn empty_schema_yields_only_slug() {
        let registry = TransformerRegistry::new();
        let page = site().page("products/product-a").unwrap();
        let data = PageSerializer::serialize(page.as_ref(), &SchemaSpec::new(), &registry).unwrap();
        assert_eq!(Value::Object(data), json!({ "slug": "product-a" }));
    }

    #[test]
    fn fields_follow_slug_in_schema_order() {
        let registry = TransformerRegistry::new();
        let page = site().page("products/product-a").unwrap();
        let spec = SchemaSpec::new()
            .field("title")
            .with("price", "float")
            .with("rating", "integer");
        let data = PageSerializer::serialize(page.as_ref(), &spec, &registry).unwrap();
        let keys: Vec<_> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["slug", "title", "price", "rating"]);
        assert_eq!(data.len(), 1 + spec.len());
        assert_eq!(
            Value::Object(data),
            json!({ "slug": "product-a", "title": "Product A", "price": 99.99, "rating": 5 })
        );
    }

    #[test]
    fn includes_referenced_pages() {
        let registry = TransformerRegistry::new();
        let page = site().page("products/product-a").unwrap();
        let spec = SchemaSpec::new().field("title").with(
            "manufacturer",
            TransformerSpec::named("page").arg(SchemaSpec::new().field("title")),
        );
        let data = PageSerializer::serialize(page.as_ref(), &spec, &registry).unwrap();
        assert_eq!(
            Value::Object(data),
            json!({
                "slug": "product-a",
                "title": "Product A",
                "manufacturer": { "slug": "brand-a", "title": "Brand A" }
            })
        );
    }

    #[test]
    fn transformer_errors_propagate() {
        let registry = TransformerRegistry::new();
        let page = site().page("products/product-a").unwrap();
        let spec = SchemaSpec::new().field("title").with("price", "money");
        assert!(matches!(
            PageSerializer::serialize(page.as_ref(), &spec, &registry),
            Err(TransformError::UnknownTransformer { .. })
        ));
    }

    #[test]
    fn collection_preserves_order_and_length() {
        let registry = TransformerRegistry::new();
        let products = site().children("products");
        let data = CollectionSerializer::serialize(&products, &SchemaSpec::new(), &registry).unwrap();
        assert_eq!(data.len(), products.len());
        assert_eq!(
            Value::Array(data),
            json!([{ "slug": "product-a" }, { "slug": "product-b" }, { "slug": "product-c" }])
        );
    }

    #[test]
    fn collection_does_not_deduplicate() {
        let registry = TransformerRegistry::new();
        let a = site().page("products/product-a").unwrap();
        let data = CollectionSerializer::serialize(&[a.clone(), a], &SchemaSpec::new(), &registry).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn collection_fails_fast() {
        let registry = TransformerRegistry::new();
        let products = site().children("products");
        let spec = SchemaSpec::new().with("title", "nope");
        assert!(CollectionSerializer::serialize(&products, &spec, &registry).is_err());
        assert!(CollectionSerializer::serialize(&[], &spec, &registry).unwrap().is_empty());
    }

    #[test]
    fn schema_field_named_slug_keeps_the_identifier() {
        let registry = TransformerRegistry::new();
        let page = site().page("products/product-a").unwrap();
        let spec = SchemaSpec::new()
            .with("slug", Transformer::from_value_fn(|_| json!("overridden")))
            .field("title");
        let data = PageSerializer::serialize(page.as_ref(), &spec, &registry).unwrap();
        assert_eq!(Value::Object(data), json!({ "slug": "product-a", "title": "Product A" }));
    }
}
