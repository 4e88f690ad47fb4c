// CurrentUser extractor - handlers that need a signed-in user take it as an
// argument; the request is refused with 401 when nobody is signed in

use axum::{extract::FromRequestParts, http::request::Parts};
use std::ops::Deref;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::infrastructure::traits::Identity;

/// Identity of the signed-in user, read from the session at extraction time
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

// Field access reads like the identity itself: user.key, user.email
impl Deref for CurrentUser {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = state.session.require_identity().map(CurrentUser);
        async move { user }
    }
}
