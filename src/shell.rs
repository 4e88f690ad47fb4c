// Presentation shell state - tab navigation and the lists each tab holds in
// memory between requests

use serde::Serialize;
use tokio::sync::RwLock;

use crate::core::IdentityKey;
use crate::domains::{InfoContact, NetworkingContact};
use crate::session::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Networking,
    Info,
    Referral,
    Interview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TabStatus {
    Active,
    ComingSoon,
}

#[derive(Debug, Clone, Serialize)]
pub struct TabInfo {
    pub tab: Tab,
    pub label: &'static str,
    pub status: TabStatus,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Networking, Tab::Info, Tab::Referral, Tab::Interview];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Networking => "Networking",
            Tab::Info => "Info",
            Tab::Referral => "Referral",
            Tab::Interview => "Interview",
        }
    }

    pub fn status(&self) -> TabStatus {
        match self {
            Tab::Networking | Tab::Info => TabStatus::Active,
            Tab::Referral | Tab::Interview => TabStatus::ComingSoon,
        }
    }

    pub fn info(&self) -> TabInfo {
        TabInfo {
            tab: *self,
            label: self.label(),
            status: self.status(),
        }
    }
}

/// Which top-level view the shell renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Loading,
    Auth,
    Dashboard,
}

impl View {
    pub fn for_session(snapshot: &SessionSnapshot) -> Self {
        if snapshot.loading {
            View::Loading
        } else if snapshot.is_authenticated() {
            View::Dashboard
        } else {
            View::Auth
        }
    }
}

/// Lists the dashboard tabs last loaded, scoped to the identity they were
/// loaded for. The Info form's contact selector reads `networking`, so only
/// non-skipped contacts are kept.
#[derive(Debug, Default)]
pub struct Dashboard {
    lists: RwLock<TabLists>,
}

#[derive(Debug, Default)]
struct TabLists {
    owner: Option<IdentityKey>,
    networking: Vec<NetworkingContact>,
    info: Vec<InfoContact>,
}

impl TabLists {
    // Lists loaded for another identity are dropped before anything is stored
    fn claim(&mut self, owner: &IdentityKey) {
        if self.owner.as_ref() != Some(owner) {
            self.owner = Some(owner.clone());
            self.networking.clear();
            self.info.clear();
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn networking(&self, owner: &IdentityKey) -> Vec<NetworkingContact> {
        let lists = self.lists.read().await;
        if lists.owner.as_ref() == Some(owner) {
            lists.networking.clone()
        } else {
            Vec::new()
        }
    }

    pub async fn set_networking(&self, owner: &IdentityKey, contacts: &[NetworkingContact]) {
        let mut lists = self.lists.write().await;
        lists.claim(owner);
        lists.networking = contacts
            .iter()
            .filter(|contact| !contact.is_skipped())
            .cloned()
            .collect();
    }

    pub async fn info(&self, owner: &IdentityKey) -> Vec<InfoContact> {
        let lists = self.lists.read().await;
        if lists.owner.as_ref() == Some(owner) {
            lists.info.clone()
        } else {
            Vec::new()
        }
    }

    pub async fn set_info(&self, owner: &IdentityKey, records: &[InfoContact]) {
        let mut lists = self.lists.write().await;
        lists.claim(owner);
        lists.info = records.to_vec();
    }

    /// Forget everything loaded for the previous session
    pub async fn clear(&self) {
        *self.lists.write().await = TabLists::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_networking_and_info_are_active() {
        let active: Vec<Tab> = Tab::ALL
            .iter()
            .filter(|tab| tab.status() == TabStatus::Active)
            .copied()
            .collect();
        assert_eq!(active, vec![Tab::Networking, Tab::Info]);
    }

    #[test]
    fn test_view_gating() {
        let mut snapshot = SessionSnapshot {
            loading: true,
            identity: None,
            profile: None,
        };
        assert_eq!(View::for_session(&snapshot), View::Loading);
        snapshot.loading = false;
        assert_eq!(View::for_session(&snapshot), View::Auth);
    }

    fn contact(name: &str, skip: Option<bool>) -> NetworkingContact {
        NetworkingContact {
            id: name.to_lowercase(),
            owner_id: "jane".to_string(),
            name: name.to_string(),
            details: "-".to_string(),
            remarks: String::new(),
            date: "2024-01-05".to_string(),
            skip,
            skip_reason: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_dashboard_keeps_only_active_contacts() {
        let dashboard = Dashboard::new();
        let jane = IdentityKey::new("jane");
        dashboard
            .set_networking(&jane, &[contact("Bob", None), contact("Skipped", Some(true))])
            .await;

        let names: Vec<String> = dashboard
            .networking(&jane)
            .await
            .into_iter()
            .map(|contact| contact.name)
            .collect();
        assert_eq!(names, vec!["Bob".to_string()]);
    }

    #[tokio::test]
    async fn test_dashboard_lists_belong_to_one_identity() {
        let dashboard = Dashboard::new();
        let jane = IdentityKey::new("jane");
        let eve = IdentityKey::new("eve");
        dashboard.set_networking(&jane, &[contact("Bob", None)]).await;

        assert!(dashboard.networking(&eve).await.is_empty());
        dashboard.set_info(&eve, &[]).await;
        assert!(dashboard.networking(&jane).await.is_empty());

        dashboard.set_networking(&jane, &[contact("Bob", Some(false))]).await;
        dashboard.clear().await;
        assert!(dashboard.networking(&jane).await.is_empty());
        assert!(dashboard.info(&jane).await.is_empty());
    }
}
