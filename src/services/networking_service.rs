// NetworkingService - contact records for the Networking tab

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::core::{Collection, IdentityKey};
use crate::domains::networking::{SKIP_PLACEHOLDER_DETAILS, SKIP_PLACEHOLDER_NAME};
use crate::domains::{sort_by_date_desc, NetworkingContact, NewNetworkingContact, DATE_FORMAT};
use crate::error::{AppError, AppResult};
use crate::infrastructure::document::{to_fields, Filter};
use crate::infrastructure::traits::DocumentStore;

#[derive(Clone)]
pub struct NetworkingService {
    store: Arc<dyn DocumentStore>,
}

impl NetworkingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append a contact. Duplicate submissions produce duplicate records.
    #[instrument(skip(self, contact))]
    pub async fn create(
        &self,
        owner: &IdentityKey,
        contact: NewNetworkingContact,
    ) -> AppResult<NetworkingContact> {
        let record = NetworkingContact {
            id: String::new(),
            owner_id: owner.to_string(),
            name: contact.name,
            details: contact.details,
            remarks: contact.remarks,
            date: contact.date,
            skip: None,
            skip_reason: None,
            created_at: Utc::now(),
        };
        self.append(record).await
    }

    /// Append a skip record carrying `reason` in place of contact details
    #[instrument(skip(self))]
    pub async fn create_skip(&self, owner: &IdentityKey, reason: &str) -> AppResult<NetworkingContact> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A skip reason is required".to_string()));
        }

        let now = Utc::now();
        let record = NetworkingContact {
            id: String::new(),
            owner_id: owner.to_string(),
            name: SKIP_PLACEHOLDER_NAME.to_string(),
            details: SKIP_PLACEHOLDER_DETAILS.to_string(),
            remarks: String::new(),
            date: now.date_naive().format(DATE_FORMAT).to_string(),
            skip: Some(true),
            skip_reason: Some(reason.to_string()),
            created_at: now,
        };
        self.append(record).await
    }

    async fn append(&self, mut record: NetworkingContact) -> AppResult<NetworkingContact> {
        let id = self.store.insert(Collection::Networking, to_fields(&record)?).await?;
        record.id = id.into_string();
        info!("Created networking record {}", record.id);
        Ok(record)
    }

    /// All of the owner's records, newest date first
    pub async fn list(
        &self,
        owner: &IdentityKey,
        include_skipped: bool,
    ) -> AppResult<Vec<NetworkingContact>> {
        let mut filters = vec![Filter::eq("owner_id", owner.as_str())];
        if !include_skipped {
            filters.push(Filter::not_eq("skip", true));
        }

        let mut records = self
            .store
            .query(Collection::Networking, &filters)
            .await?
            .iter()
            .map(|doc| doc.decode::<NetworkingContact>())
            .collect::<AppResult<Vec<_>>>()?;
        sort_by_date_desc(&mut records);
        debug!("Listed {} networking records for {}", records.len(), owner);
        Ok(records)
    }
}
