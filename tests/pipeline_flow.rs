use std::sync::Arc;

use pipeline_crm::{
    config::Config,
    domains::{NewInfoContact, NewNetworkingContact, ResponseGrade},
    infrastructure::{AuthProvider, DocumentStore, LocalAuthProvider, SqliteDatabase},
    services::{InfoService, NetworkingService, ProfileService},
    session::{SessionStore, SignUp},
    app_state::AppState,
};

fn jane() -> SignUp {
    SignUp {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: "555-0100".to_string(),
        password: None,
    }
}

async fn open(url: &str) -> (Arc<SessionStore>, NetworkingService, InfoService, Arc<SqliteDatabase>) {
    let db = Arc::new(SqliteDatabase::connect(url).await.unwrap());
    let store: Arc<dyn DocumentStore> = db.clone();
    let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(store.clone()).unwrap());
    let session = SessionStore::new(auth.clone(), ProfileService::new(store.clone(), auth), "changeme");
    session.initialize();
    session.wait_until_loaded().await;
    (
        session,
        NetworkingService::new(store.clone()),
        InfoService::new(store),
        db,
    )
}

#[tokio::test]
async fn test_records_and_credentials_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("crm.db").display());

    let key = {
        let (session, networking, info, db) = open(&url).await;
        session.sign_up(jane()).await.unwrap();
        let owner = session.require_identity().unwrap().key;

        let bob = networking
            .create(
                &owner,
                NewNetworkingContact {
                    name: "Bob".to_string(),
                    details: "VP Sales".to_string(),
                    remarks: String::new(),
                    date: "2024-01-05".to_string(),
                },
            )
            .await
            .unwrap();
        let loaded = networking.list(&owner, false).await.unwrap();
        info.create(
            &owner,
            &loaded,
            NewInfoContact {
                networking_id: bob.id.clone(),
                response: ResponseGrade::Positive,
                remarks: String::new(),
                date: "2024-01-08".to_string(),
            },
        )
        .await
        .unwrap();
        db.close().await;
        owner
    };

    let (session, networking, info, _db) = open(&url).await;
    // Sessions are per process
    assert!(session.current_identity().is_none());

    // Without a password at sign-up the placeholder is the credential
    let snapshot = session.log_in("jane@x.com", "changeme").await.unwrap();
    assert_eq!(snapshot.identity.unwrap().key, key);
    assert_eq!(snapshot.profile.unwrap().name, "Jane Doe");

    let contacts = networking.list(&key, false).await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Bob");

    let records = info.list(&key).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].contact_name, "Bob");
    assert_eq!(records[0].networking_id, contacts[0].id);
}

#[tokio::test]
async fn test_app_state_over_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::in_memory();
    config.database.url = format!("sqlite:{}", dir.path().join("app.db").display());

    let state = AppState::new(config).await.unwrap();
    assert!(!state.session.snapshot().loading);
    state.session.sign_up(jane()).await.unwrap();
    let owner = state.session.require_identity().unwrap().key;

    state.networking.create_skip(&owner, "Moved abroad").await.unwrap();
    assert!(state.networking.list(&owner, false).await.unwrap().is_empty());
    assert_eq!(state.networking.list(&owner, true).await.unwrap().len(), 1);
}
