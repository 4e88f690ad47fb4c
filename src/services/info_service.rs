// InfoService - follow-up records for the Info tab

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::{Collection, IdentityKey};
use crate::domains::{sort_by_date_desc, InfoContact, NetworkingContact, NewInfoContact};
use crate::error::AppResult;
use crate::infrastructure::document::{to_fields, Filter};
use crate::infrastructure::traits::DocumentStore;

#[derive(Clone)]
pub struct InfoService {
    store: Arc<dyn DocumentStore>,
}

impl InfoService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append a follow-up. The contact name is copied from `loaded_contacts`,
    /// the Networking list the caller already holds; a contact missing from it
    /// yields an empty name and the write still happens.
    #[instrument(skip(self, loaded_contacts, follow_up))]
    pub async fn create(
        &self,
        owner: &IdentityKey,
        loaded_contacts: &[NetworkingContact],
        follow_up: NewInfoContact,
    ) -> AppResult<InfoContact> {
        let contact_name = match loaded_contacts
            .iter()
            .find(|contact| contact.id == follow_up.networking_id)
        {
            Some(contact) => contact.name.clone(),
            None => {
                warn!(
                    "Networking record {} not in the loaded list; storing an empty name",
                    follow_up.networking_id
                );
                String::new()
            }
        };

        let mut record = InfoContact {
            id: String::new(),
            owner_id: owner.to_string(),
            networking_id: follow_up.networking_id,
            contact_name,
            response: follow_up.response,
            remarks: follow_up.remarks,
            date: follow_up.date,
            created_at: Utc::now(),
        };
        let id = self.store.insert(Collection::Info, to_fields(&record)?).await?;
        record.id = id.into_string();
        info!("Created info record {}", record.id);
        Ok(record)
    }

    /// All of the owner's follow-ups, newest date first
    pub async fn list(&self, owner: &IdentityKey) -> AppResult<Vec<InfoContact>> {
        let mut records = self
            .store
            .query(Collection::Info, &[Filter::eq("owner_id", owner.as_str())])
            .await?
            .iter()
            .map(|doc| doc.decode::<InfoContact>())
            .collect::<AppResult<Vec<_>>>()?;
        sort_by_date_desc(&mut records);
        Ok(records)
    }
}
