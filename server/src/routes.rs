//! HTTP routes and their request/response bodies.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use ttobak_billing::{CheckoutSession, CheckoutVerification};
use ttobak_entitlement::{EntitlementStatus, ProChange};
use ttobak_transform::TransformRequest;
use ttobak_types::{Identity, IdentityKind};

type ApiResult<T> = Result<Json<T>, ApiError>;
type Body<T> = Result<Json<T>, JsonRejection>;

/// Build the HTTP API router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/entitlement", get(entitlement))
        .route("/api/transform", post(transform))
        .route("/api/trial", post(start_trial))
        .route("/api/trial/reset", post(reset_trial))
        .route("/api/pro", post(set_pro))
        .route("/api/checkout", post(create_checkout))
        .route("/api/polar/verify", post(verify_checkout))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct EntitlementResponse {
    identity: IdentityKind,
    status: EntitlementStatus,
}

#[derive(Debug, Deserialize)]
struct TransformBody {
    #[serde(default)]
    text: String,
    #[serde(default)]
    mode: String,
}

#[derive(Debug, Serialize)]
struct TransformResponse {
    output: String,
    status: EntitlementStatus,
}

#[derive(Debug, Deserialize)]
struct TrialBody {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct ProBody {
    is_pro: bool,
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    #[serde(rename = "checkoutId", default)]
    checkout_id: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
    status: EntitlementStatus,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn entitlement(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<EntitlementResponse> {
    let identity = state.identify(&headers).await?;
    let session = state.session(&identity);
    Ok(Json(EntitlementResponse {
        identity: session.kind(),
        status: state.evaluator.status(session.mode()),
    }))
}

/// Validate, gate, generate, then count the request.
async fn transform(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body<TransformBody>,
) -> ApiResult<TransformResponse> {
    let Json(body) = body?;
    let request = TransformRequest::parse(&body.text, &body.mode)?;

    let identity = state.identify(&headers).await?;
    let session = state.session(&identity);
    let mode = session.mode();

    state.evaluator.evaluate(mode).ensure_allowed()?;

    let output = state.transformer.run(&request).await?;

    if let Err(e) = state.evaluator.commit(mode) {
        warn!(identity = %identity.kind(), error = %e, "Failed to record usage");
    }

    Ok(Json(TransformResponse {
        output,
        status: state.evaluator.status(mode),
    }))
}

async fn start_trial(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body<TrialBody>,
) -> ApiResult<MessageResponse> {
    let Json(body) = body?;
    let identity = state.identify(&headers).await?;
    let session = state.session(&identity);

    session.anonymous()?.start_trial(&body.email)?;

    let days = state.evaluator.policy().trial_days;
    Ok(Json(MessageResponse {
        message: format!("✅ Pro {days}일 체험이 활성화됐어요! 이제 무제한으로 사용할 수 있어요."),
        status: state.evaluator.status(session.mode()),
    }))
}

async fn reset_trial(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<MessageResponse> {
    let identity = state.identify(&headers).await?;
    let session = state.session(&identity);

    session.anonymous()?.reset_trial()?;

    Ok(Json(MessageResponse {
        message: "체험이 초기화됐어요.".to_string(),
        status: state.evaluator.status(session.mode()),
    }))
}

async fn set_pro(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body<ProBody>,
) -> ApiResult<MessageResponse> {
    let Json(body) = body?;
    let identity = state.identify(&headers).await?;
    let session = state.session(&identity);

    let is_pro = session
        .authenticated()?
        .apply_pro_change(&ProChange::Demo { is_pro: body.is_pro })?;

    let message = if is_pro {
        "✅ Pro가 활성화됐어요."
    } else {
        "Pro가 해제됐어요."
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
        status: state.evaluator.status(session.mode()),
    }))
}

async fn create_checkout(State(state): State<Arc<AppState>>) -> ApiResult<CheckoutSession> {
    Ok(Json(state.billing.create_checkout().await?))
}

/// Looks the checkout up; a succeeded checkout upgrades a signed-in caller.
async fn verify_checkout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body<VerifyBody>,
) -> ApiResult<CheckoutVerification> {
    let Json(body) = body?;
    let verification = state.billing.verify_checkout(&body.checkout_id).await?;

    if verification.succeeded {
        match state.identify(&headers).await {
            Ok(identity @ Identity::Authenticated { .. }) => {
                let session = state.session(&identity);
                session.authenticated()?.apply_pro_change(&ProChange::Checkout {
                    checkout_id: body.checkout_id.trim().to_string(),
                })?;
            }
            _ => info!("Checkout succeeded without a signed-in caller"),
        }
    }

    Ok(Json(verification))
}
