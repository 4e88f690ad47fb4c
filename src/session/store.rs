// SessionStore - single source of truth for the signed-in identity and its
// profile for the lifetime of the process. Passed explicitly to whoever needs
// it; there is no ambient session.

use serde::Serialize;
use std::sync::{Arc, Weak};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::domains::UserProfile;
use crate::error::{AppError, AppResult};
use crate::infrastructure::traits::{AuthProvider, Identity};
use crate::services::ProfileService;

/// Published session state. `identity` and `profile` always belong together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// True until the first identity notification has been processed
    pub loading: bool,
    pub identity: Option<Identity>,
    pub profile: Option<UserProfile>,
}

impl SessionSnapshot {
    fn loading() -> Self {
        Self {
            loading: true,
            identity: None,
            profile: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Sign-up form contents. Without a password the identity is created with
/// the configured placeholder.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
}

pub struct SessionStore {
    auth: Arc<dyn AuthProvider>,
    profiles: ProfileService,
    state: watch::Sender<SessionSnapshot>,
    // Serializes re-synchronization so a fetch never publishes over a newer one
    sync_lock: Mutex<()>,
    placeholder_password: String,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        profiles: ProfileService,
        placeholder_password: impl Into<String>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionSnapshot::loading());
        Arc::new(Self {
            auth,
            profiles,
            state,
            sync_lock: Mutex::new(()),
            placeholder_password: placeholder_password.into(),
        })
    }

    /// Subscribe to identity changes. Every notification re-synchronizes the
    /// snapshot; the first one completes loading. The task ends when the
    /// provider goes away or the store is dropped.
    pub fn initialize(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.auth.subscribe();
        let store: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                changes.borrow_and_update();
                match store.upgrade() {
                    Some(store) => store.sync().await,
                    None => break,
                }
                if changes.changed().await.is_err() {
                    debug!("Identity notifications closed");
                    break;
                }
            }
        })
    }

    /// Resolves once the first identity notification has been processed
    pub async fn wait_until_loaded(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|snapshot| !snapshot.loading).await;
    }

    /// Re-read the provider's current identity, fetch its profile and
    /// publish both together.
    async fn sync(&self) {
        let _guard = self.sync_lock.lock().await;

        let identity = self.auth.current_identity();
        let profile = match &identity {
            Some(identity) => match self.profiles.get(&identity.key).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Failed to load profile for {}: {}", identity.key, e);
                    None
                }
            },
            None => None,
        };

        self.state.send_modify(|snapshot| {
            if snapshot.loading {
                info!("Session loaded");
            }
            snapshot.loading = false;
            snapshot.identity = identity;
            snapshot.profile = profile;
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn current_profile(&self) -> Option<UserProfile> {
        self.state.borrow().profile.clone()
    }

    /// Identity of the signed-in user, or `AuthError` when nobody is
    pub fn require_identity(&self) -> AppResult<Identity> {
        self.current_identity()
            .ok_or_else(|| AppError::AuthError("Not signed in".to_string()))
    }

    /// Create the identity and its profile; the new identity becomes the
    /// current session. A sign-up whose profile write failed earlier is
    /// completed when repeated with the same credentials.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn sign_up(&self, form: SignUp) -> AppResult<UserProfile> {
        let password = form
            .password
            .as_deref()
            .unwrap_or(self.placeholder_password.as_str());
        let identity = match self.auth.create_identity(&form.email, password).await {
            Ok(identity) => identity,
            Err(AppError::AuthCreationError(reason)) => {
                self.resume_sign_up(&form.email, password, reason).await?
            }
            Err(e) => return Err(e),
        };

        let profile = match self
            .profiles
            .create(&identity, &form.name, &identity.email, &form.phone)
            .await
        {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Profile write failed for {}, signing out: {}", identity.key, e);
                self.auth.sign_out().await?;
                self.sync().await;
                return Err(e);
            }
        };
        self.sync().await;
        Ok(profile)
    }

    // Signs in an already registered identity that still has no profile.
    // Anything else keeps the original creation error.
    async fn resume_sign_up(
        &self,
        email: &str,
        password: &str,
        reason: String,
    ) -> AppResult<Identity> {
        let refused = || AppError::AuthCreationError(reason.clone());
        if self.current_identity().is_some() {
            return Err(refused());
        }
        let identity = match self.auth.sign_in(email, password).await {
            Ok(identity) => identity,
            Err(_) => return Err(refused()),
        };
        match self.profiles.get(&identity.key).await {
            Ok(None) => {
                info!("Resuming sign-up for {}", identity.key);
                Ok(identity)
            }
            _ => {
                self.auth.sign_out().await?;
                self.sync().await;
                Err(refused())
            }
        }
    }

    #[instrument(skip(self, password))]
    pub async fn log_in(&self, email: &str, password: &str) -> AppResult<SessionSnapshot> {
        self.auth.sign_in(email, password).await?;
        self.sync().await;
        Ok(self.snapshot())
    }

    /// Ends the session; identity and profile are cleared before returning
    pub async fn log_out(&self) -> AppResult<()> {
        self.auth.sign_out().await?;
        self.sync().await;
        Ok(())
    }

    pub async fn change_password(&self, new_password: &str) -> AppResult<()> {
        self.require_identity()?;
        self.profiles.change_password(new_password).await
    }
}
