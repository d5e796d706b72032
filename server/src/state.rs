//! Shared application state and per-request identity sessions.

use crate::auth::SupabaseAuth;
use crate::error::ApiError;
use axum::http::HeaderMap;
use tracing::warn;
use ttobak_billing::PolarClient;
use ttobak_entitlement::{
    AnonymousMode, AuthenticatedMode, EntitlementError, EntitlementEvaluator, IdentityMode,
    RecordStore,
};
use ttobak_store::{DeviceState, RecordDb};
use ttobak_transform::Transformer;
use ttobak_types::{Identity, IdentityKind};

/// Shared state behind every handler.
pub struct AppState {
    pub db: RecordDb,
    pub evaluator: EntitlementEvaluator,
    pub transformer: Transformer,
    pub billing: PolarClient,
    pub auth: SupabaseAuth,
}

impl AppState {
    pub fn new(
        db: RecordDb,
        evaluator: EntitlementEvaluator,
        transformer: Transformer,
        billing: PolarClient,
        auth: SupabaseAuth,
    ) -> Self {
        Self {
            db,
            evaluator,
            transformer,
            billing,
            auth,
        }
    }

    /// Resolves the caller, making sure an authenticated caller has a profile.
    pub async fn identify(&self, headers: &HeaderMap) -> Result<Identity, ApiError> {
        let identity = self.auth.resolve(headers).await?;
        if let Identity::Authenticated { user_id, email } = &identity {
            // The pro flag is left alone; a failure here only delays the row.
            if let Err(e) = self.db.ensure_profile(user_id, email.as_deref()) {
                warn!(user = %user_id, error = %e, "Failed to upsert profile");
            }
        }
        Ok(identity)
    }

    /// Binds the identity to its entitlement state.
    pub fn session(&self, identity: &Identity) -> Session<'_> {
        match identity {
            Identity::Anonymous { device_id } => {
                Session::Anonymous(AnonymousMode::new(self.db.device(*device_id)))
            }
            Identity::Authenticated { user_id, .. } => {
                Session::Authenticated(AuthenticatedMode::new(&self.db, *user_id))
            }
        }
    }
}

/// One request's entitlement state, in whichever mode the identity uses.
pub enum Session<'a> {
    Anonymous(AnonymousMode<DeviceState<'a>>),
    Authenticated(AuthenticatedMode<&'a RecordDb>),
}

impl<'a> Session<'a> {
    pub fn kind(&self) -> IdentityKind {
        self.mode().kind()
    }

    pub fn mode(&self) -> &dyn IdentityMode {
        match self {
            Self::Anonymous(mode) => mode,
            Self::Authenticated(mode) => mode,
        }
    }

    /// The anonymous mode, or an error for authenticated callers.
    pub fn anonymous(&self) -> Result<&AnonymousMode<DeviceState<'a>>, EntitlementError> {
        match self {
            Self::Anonymous(mode) => Ok(mode),
            Self::Authenticated(_) => Err(EntitlementError::WrongIdentity(IdentityKind::Authenticated)),
        }
    }

    /// The authenticated mode, or an error for anonymous callers.
    pub fn authenticated(&self) -> Result<&AuthenticatedMode<&'a RecordDb>, EntitlementError> {
        match self {
            Self::Authenticated(mode) => Ok(mode),
            Self::Anonymous(_) => Err(EntitlementError::WrongIdentity(IdentityKind::Anonymous)),
        }
    }
}
