use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::{Collection, DocumentId};
use crate::error::{AppError, AppResult};
use crate::infrastructure::document::{matches_all, Document, Fields, Filter};
use crate::infrastructure::traits::DocumentStore;

/// In-memory DocumentStore for tests and `DATABASE_URL=memory`.
/// Each collection keeps its documents in insertion order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, |docs| docs.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, fields: Fields) -> AppResult<DocumentId> {
        let id = DocumentId::generate();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(Document::new(id.clone(), fields));
        Ok(id)
    }

    async fn put(&self, collection: Collection, id: &DocumentId, fields: Fields) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        match docs.iter_mut().find(|doc| &doc.id == id) {
            Some(existing) => existing.fields = fields,
            None => docs.push(Document::new(id.clone(), fields)),
        }
        Ok(())
    }

    async fn get(&self, collection: Collection, id: &DocumentId) -> AppResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| &doc.id == id).cloned()))
    }

    async fn query(&self, collection: Collection, filters: &[Filter]) -> AppResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches_all(filters, &doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update(&self, collection: Collection, id: &DocumentId, fields: Fields) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| &doc.id == id))
            .ok_or_else(|| AppError::NotFound(format!("Document {}/{} not found", collection, id)))?;
        doc.fields.extend(fields);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn bag(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_and_query() {
        let store = MemoryDocumentStore::new();
        store
            .insert(Collection::Networking, bag(json!({"owner_id": "a", "name": "Bob"})))
            .await
            .unwrap();
        store
            .insert(Collection::Networking, bag(json!({"owner_id": "b", "name": "Eve"})))
            .await
            .unwrap();

        let docs = store
            .query(Collection::Networking, &[Filter::eq("owner_id", "a")])
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get("name"), Some(&json!("Bob")));

        // Other collections stay empty
        assert!(store.query(Collection::Info, &[]).await.unwrap().is_empty());
        assert_eq!(store.len(Collection::Networking).await, 2);
    }

    #[tokio::test]
    async fn test_put_get_and_update() {
        let store = MemoryDocumentStore::new();
        let id = DocumentId::new("user1");
        store
            .put(Collection::Users, &id, bag(json!({"name": "Jane", "phone": "1"})))
            .await
            .unwrap();
        store
            .update(Collection::Users, &id, bag(json!({"phone": "2"})))
            .await
            .unwrap();

        let doc = store.get(Collection::Users, &id).await.unwrap().unwrap();
        assert_eq!(doc.get("name"), Some(&json!("Jane")));
        assert_eq!(doc.get("phone"), Some(&json!("2")));
        assert!(store
            .get(Collection::Users, &DocumentId::new("missing"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryDocumentStore::new();
        let result = store
            .update(Collection::Users, &DocumentId::new("nope"), Fields::new())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
