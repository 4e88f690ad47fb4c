// HTTP surface of the presentation shell: session gating, auth forms,
// profile view and the Networking / Info tabs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    core::IdentityKey,
    domains::{InfoContact, NetworkingContact},
    error::{AppError, AppResult},
    forms::{InfoForm, LoginForm, NetworkingForm, PasswordChangeForm, SignUpForm, SkipForm},
    infrastructure::middleware::CurrentUser,
    session::SessionSnapshot,
    shell::{Tab, View},
};

#[derive(Debug, Deserialize)]
pub struct NetworkingListQuery {
    #[serde(default)]
    pub include_skipped: bool,
}

fn session_body(snapshot: &SessionSnapshot) -> Value {
    json!({
        "loading": snapshot.loading,
        "authenticated": snapshot.is_authenticated(),
        "view": View::for_session(snapshot),
        "identity": snapshot.identity,
        "profile": snapshot.profile,
    })
}

/// Reload the Networking tab. A failed load is logged and the previously
/// loaded list is shown instead; that list never carries skip records.
async fn load_networking(
    state: &AppState,
    owner: &IdentityKey,
    include_skipped: bool,
) -> Vec<NetworkingContact> {
    match state.networking.list(owner, include_skipped).await {
        Ok(contacts) => {
            state.dashboard.set_networking(owner, &contacts).await;
            contacts
        }
        Err(e) => {
            warn!("Failed to load networking records: {}", e);
            state.dashboard.networking(owner).await
        }
    }
}

async fn load_info(state: &AppState, owner: &IdentityKey) -> Vec<InfoContact> {
    match state.info.list(owner).await {
        Ok(records) => {
            state.dashboard.set_info(owner, &records).await;
            records
        }
        Err(e) => {
            warn!("Failed to load info records: {}", e);
            state.dashboard.info(owner).await
        }
    }
}

// Session and authentication

pub async fn session_handler(State(state): State<AppState>) -> Json<Value> {
    Json(session_body(&state.session.snapshot()))
}

pub async fn sign_up_handler(
    State(state): State<AppState>,
    Json(form): Json<SignUpForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let sign_up = form.validate()?;
    let profile = state.session.sign_up(sign_up).await?;
    state.dashboard.clear().await;
    info!("Signed up {}", profile.id);
    Ok((StatusCode::CREATED, Json(session_body(&state.session.snapshot()))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> AppResult<Json<Value>> {
    let (email, password) = form.validate()?;
    let snapshot = state.session.log_in(&email, password).await?;
    state.dashboard.clear().await;
    Ok(Json(session_body(&snapshot)))
}

pub async fn logout_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    state.session.log_out().await?;
    state.dashboard.clear().await;
    Ok(Json(session_body(&state.session.snapshot())))
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Json(form): Json<PasswordChangeForm>,
) -> AppResult<Json<Value>> {
    let new_password = form.validate()?;
    state.session.change_password(new_password).await?;
    Ok(Json(json!({ "updated": true })))
}

pub async fn profile_handler(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Value>> {
    let profile = state
        .session
        .current_profile()
        .ok_or_else(|| AppError::NotFound(format!("No profile for {}", user.key)))?;
    Ok(Json(json!({ "profile": profile })))
}

pub async fn tabs_handler() -> Json<Value> {
    let tabs: Vec<_> = Tab::ALL.iter().map(Tab::info).collect();
    Json(json!({ "tabs": tabs }))
}

// Networking tab

pub async fn list_networking_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<NetworkingListQuery>,
) -> Json<Value> {
    let contacts = load_networking(&state, &user.key, query.include_skipped).await;
    Json(json!({ "contacts": contacts }))
}

pub async fn create_networking_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<NetworkingForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let contact = form.validate()?;
    let created = state.networking.create(&user.key, contact).await?;
    let contacts = load_networking(&state, &user.key, false).await;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "created": created, "contacts": contacts })),
    ))
}

pub async fn create_skip_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<SkipForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let created = state.networking.create_skip(&user.key, &form.reason).await?;
    let contacts = load_networking(&state, &user.key, false).await;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "created": created, "contacts": contacts })),
    ))
}

// Info tab

pub async fn list_info_handler(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<Value> {
    // The contact selector lists the non-skipped Networking records
    let contacts = load_networking(&state, &user.key, false).await;
    let records = load_info(&state, &user.key).await;
    Json(json!({ "records": records, "contacts": contacts }))
}

pub async fn create_info_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<InfoForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let follow_up = form.validate()?;
    let loaded = state.dashboard.networking(&user.key).await;
    let created = state.info.create(&user.key, &loaded, follow_up).await?;
    let records = load_info(&state, &user.key).await;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "created": created, "records": records })),
    ))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Session gating and authentication forms
        .route("/session", get(session_handler))
        .route("/auth/signup", post(sign_up_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/password", post(change_password_handler))

        // Dashboard
        .route("/profile", get(profile_handler))
        .route("/tabs", get(tabs_handler))
        .route("/networking", get(list_networking_handler).post(create_networking_handler))
        .route("/networking/skip", post(create_skip_handler))
        .route("/info", get(list_info_handler).post(create_info_handler))

        .with_state(state)
}
