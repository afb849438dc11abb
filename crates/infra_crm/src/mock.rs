//! In-memory CRM adapter for tests
//!
//! Stores records, associations, and uploaded files in memory so domain and
//! API tests can run without a CRM. Mirrors the observable behavior of
//! `HttpCrmClient`: blank-safe property reads, single-page search with a
//! limit, and CRM-assigned sequential ids.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{CrmApi, CrmRecord, PortError, PropertyMap, SearchFilter};

type ObjectStore = HashMap<String, HashMap<String, PropertyMap>>;

/// In-memory implementation of `CrmApi`.
#[derive(Debug, Default)]
pub struct InMemoryCrm {
    records: Arc<RwLock<ObjectStore>>,
    associations: Arc<RwLock<HashSet<(String, String, String, String)>>>,
    uploaded_files: Arc<RwLock<Vec<String>>>,
    /// Record ids whose updates fail with an upstream error, for
    /// partial-failure tests
    failing_updates: Arc<RwLock<HashSet<String>>>,
    next_id: AtomicU64,
    search_calls: AtomicUsize,
}

impl InMemoryCrm {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1001),
            ..Self::default()
        }
    }

    /// Pre-populates a record under a fixed id
    pub async fn insert_record(&self, object_type: &str, id: &str, properties: PropertyMap) {
        self.records
            .write()
            .await
            .entry(object_type.to_string())
            .or_default()
            .insert(id.to_string(), properties);
    }

    /// Reads a record back for assertions, `None` if absent
    pub async fn record(&self, object_type: &str, id: &str) -> Option<CrmRecord> {
        self.records
            .read()
            .await
            .get(object_type)
            .and_then(|store| store.get(id))
            .map(|props| CrmRecord::new(id, props.clone()))
    }

    /// Number of records stored under an object type
    pub async fn record_count(&self, object_type: &str) -> usize {
        self.records
            .read()
            .await
            .get(object_type)
            .map_or(0, HashMap::len)
    }

    /// Ids of all records stored under an object type
    pub async fn record_ids(&self, object_type: &str) -> Vec<String> {
        self.records
            .read()
            .await
            .get(object_type)
            .map(|store| store.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// True if a directed association exists
    pub async fn association_exists(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
        to_id: &str,
    ) -> bool {
        self.associations.read().await.contains(&(
            from_object.to_string(),
            from_id.to_string(),
            to_object.to_string(),
            to_id.to_string(),
        ))
    }

    /// Names of files uploaded so far
    pub async fn uploaded_file_names(&self) -> Vec<String> {
        self.uploaded_files.read().await.clone()
    }

    /// Makes subsequent updates of the given record fail upstream
    pub async fn fail_updates_for(&self, id: &str) {
        self.failing_updates.write().await.insert(id.to_string());
    }

    /// Number of search calls issued against this adapter
    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrmApi for InMemoryCrm {
    async fn get_record(
        &self,
        object_type: &str,
        id: &str,
        _properties: &[&str],
    ) -> Result<CrmRecord, PortError> {
        self.record(object_type, id)
            .await
            .ok_or_else(|| PortError::not_found(object_type, id))
    }

    async fn create_record(
        &self,
        object_type: &str,
        properties: PropertyMap,
    ) -> Result<CrmRecord, PortError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.insert_record(object_type, &id, properties.clone()).await;
        Ok(CrmRecord::new(id, properties))
    }

    async fn update_record(
        &self,
        object_type: &str,
        id: &str,
        properties: PropertyMap,
    ) -> Result<(), PortError> {
        if self.failing_updates.read().await.contains(id) {
            return Err(PortError::upstream(500, "injected update failure"));
        }

        let mut records = self.records.write().await;
        let store = records
            .get_mut(object_type)
            .ok_or_else(|| PortError::not_found(object_type, id))?;
        let existing = store
            .get_mut(id)
            .ok_or_else(|| PortError::not_found(object_type, id))?;
        existing.extend(properties);
        Ok(())
    }

    async fn search_records(
        &self,
        object_type: &str,
        filter: &SearchFilter,
        _properties: &[&str],
        limit: u32,
    ) -> Result<Vec<CrmRecord>, PortError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);

        if filter.operator != "NOT_IN" {
            return Err(PortError::validation(format!(
                "unsupported filter operator: {}",
                filter.operator
            )));
        }

        let records = self.records.read().await;
        let mut results: Vec<CrmRecord> = records
            .get(object_type)
            .map(|store| {
                store
                    .iter()
                    .filter(|(_, props)| {
                        let value = props.get(&filter.property).cloned().unwrap_or_default();
                        !filter.values.contains(&value)
                    })
                    .map(|(id, props)| CrmRecord::new(id, props.clone()))
                    .collect()
            })
            .unwrap_or_default();

        // Deterministic order for tests
        results.sort_by(|a, b| a.id.cmp(&b.id));
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn upload_file(&self, file_name: &str, _bytes: Vec<u8>) -> Result<String, PortError> {
        self.uploaded_files.write().await.push(file_name.to_string());
        Ok(format!("https://files.crm.example/shipping-labels/{file_name}"))
    }

    async fn associate(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
        to_id: &str,
    ) -> Result<(), PortError> {
        self.associations.write().await.insert((
            from_object.to_string(),
            from_id.to_string(),
            to_object.to_string(),
            to_id.to_string(),
        ));
        Ok(())
    }

    async fn associated_ids(
        &self,
        from_object: &str,
        from_id: &str,
        to_object: &str,
    ) -> Result<Vec<String>, PortError> {
        let associations = self.associations.read().await;
        let mut ids: Vec<String> = associations
            .iter()
            .filter(|(fo, fi, to, _)| fo == from_object && fi == from_id && to == to_object)
            .map(|(_, _, _, ti)| ti.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
