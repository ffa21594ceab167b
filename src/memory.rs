//! In-memory content host. Pages are addressed by path ids (`products/product-a`);
//! the slug is the last path segment and field values are raw text.

use crate::content::{Entity, EntityRef, FieldRef, FieldValue, ListFormat};
use std::collections::HashMap;
use std::sync::Arc;

struct PageData {
    id: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct SiteData {
    pages: Vec<PageData>,
    by_id: HashMap<String, usize>,
}

fn normalize_id(id: &str) -> &str {
    id.trim().trim_matches('/')
}

fn lookup(site: &Arc<SiteData>, id: &str) -> Option<EntityRef> {
    site.by_id.get(normalize_id(id)).map(|&index| {
        Arc::new(MemoryPage {
            site: Arc::clone(site),
            index,
        }) as EntityRef
    })
}

/// Read-only page tree.
#[derive(Clone, Default)]
pub struct MemorySite {
    data: Arc<SiteData>,
}

impl MemorySite {
    pub fn builder() -> MemorySiteBuilder {
        MemorySiteBuilder::default()
    }

    pub fn page(&self, id: &str) -> Option<EntityRef> {
        lookup(&self.data, id)
    }

    /// Direct children of `id` in insertion order.
    pub fn children(&self, id: &str) -> Vec<EntityRef> {
        let parent = normalize_id(id);
        self.data
            .pages
            .iter()
            .enumerate()
            .filter(|(_, p)| match p.id.rsplit_once('/') {
                Some((dir, _)) => dir == parent,
                None => parent.is_empty(),
            })
            .map(|(index, _)| {
                Arc::new(MemoryPage {
                    site: Arc::clone(&self.data),
                    index,
                }) as EntityRef
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.pages.is_empty()
    }
}

#[derive(Default)]
pub struct MemorySiteBuilder {
    data: SiteData,
}

impl MemorySiteBuilder {
    /// Adds a page; a repeated id replaces the earlier page's fields.
    pub fn page<I, K, V>(mut self, id: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = normalize_id(id).to_string();
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        match self.data.by_id.get(&id) {
            Some(&index) => self.data.pages[index].fields = fields,
            None => {
                self.data.by_id.insert(id.clone(), self.data.pages.len());
                self.data.pages.push(PageData { id, fields });
            }
        }
        self
    }

    pub fn build(self) -> MemorySite {
        MemorySite {
            data: Arc::new(self.data),
        }
    }
}

pub struct MemoryPage {
    site: Arc<SiteData>,
    index: usize,
}

impl MemoryPage {
    fn data(&self) -> &PageData {
        &self.site.pages[self.index]
    }

    /// Full path id.
    pub fn id(&self) -> &str {
        &self.data().id
    }
}

impl Entity for MemoryPage {
    fn slug(&self) -> &str {
        let id = &self.data().id;
        id.rsplit('/').next().unwrap_or(id)
    }

    fn field(&self, name: &str) -> FieldRef {
        Arc::new(MemoryField {
            site: Arc::clone(&self.site),
            raw: self.data().fields.get(name).cloned().unwrap_or_default(),
        })
    }
}

pub struct MemoryField {
    site: Arc<SiteData>,
    raw: String,
}

impl MemoryField {
    fn ids(&self, format: ListFormat) -> Vec<String> {
        if self.raw.trim().is_empty() {
            return Vec::new();
        }
        let parsed = match format {
            ListFormat::Yaml => serde_yaml::from_str::<Vec<String>>(&self.raw).map_err(|e| e.to_string()),
            ListFormat::Json => serde_json::from_str::<Vec<String>>(&self.raw).map_err(|e| e.to_string()),
            ListFormat::Lines => Ok(self
                .raw
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect()),
        };
        parsed.unwrap_or_else(|e| {
            tracing::debug!(error = %e, ?format, "unparseable reference list, treating as empty");
            Vec::new()
        })
    }
}

impl FieldValue for MemoryField {
    fn to_text(&self) -> String {
        self.raw.clone()
    }

    fn to_entity(&self) -> Option<EntityRef> {
        if self.raw.trim().is_empty() {
            return None;
        }
        lookup(&self.site, &self.raw)
    }

    fn to_entities(&self, format: ListFormat) -> Vec<Option<EntityRef>> {
        self.ids(format).iter().map(|id| lookup(&self.site, id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::site;

    #[test]
    fn page_lookup_and_slug() {
        let site = site();
        let page = site.page("/products/product-a/").unwrap();
        assert_eq!(page.slug(), "product-a");
        assert_eq!(page.field("title").to_text(), "Product A");
        assert_eq!(page.field("missing").to_text(), "");
        assert!(site.page("products/nope").is_none());
    }

    #[test]
    fn children_in_insertion_order() {
        let slugs: Vec<String> = site()
            .children("products")
            .iter()
            .map(|p| p.slug().to_string())
            .collect();
        assert_eq!(slugs, vec!["product-a", "product-b", "product-c"]);
        let top: Vec<String> = site().children("").iter().map(|p| p.slug().to_string()).collect();
        assert_eq!(top, vec!["products", "manufacturers"]);
    }

    #[test]
    fn reference_lists_keep_unresolved_slots() {
        let brand = site().page("manufacturers/brand-b").unwrap();
        let refs = brand.field("products").to_entities(ListFormat::Yaml);
        assert_eq!(refs.len(), 2);
        assert!(refs[0].is_none());
        assert_eq!(refs[1].as_ref().unwrap().slug(), "product-c");
    }

    #[test]
    fn json_and_garbage_lists() {
        let site = MemorySite::builder()
            .page("a", [("refs", r#"["b", "zzz"]"#), ("bad", "{{{")])
            .page("b", Vec::<(String, String)>::new())
            .build();
        let a = site.page("a").unwrap();
        let refs = a.field("refs").to_entities(ListFormat::Json);
        assert_eq!(refs.len(), 2);
        assert!(refs[0].is_some() && refs[1].is_none());
        assert!(a.field("bad").to_entities(ListFormat::Json).is_empty());
        assert!(a.field("missing").to_entities(ListFormat::Yaml).is_empty());
    }

    #[test]
    fn repeated_page_id_replaces_fields() {
        let site = MemorySite::builder()
            .page("a", [("title", "one")])
            .page("a", [("title", "two")])
            .build();
        assert_eq!(site.len(), 1);
        assert_eq!(site.page("a").unwrap().field("title").to_text(), "two");
    }
}
