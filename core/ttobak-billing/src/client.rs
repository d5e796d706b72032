//! Checkout creation and verification against the Polar API.

use crate::error::{BillingError, BillingResult};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Placeholder the provider substitutes with the checkout id on redirect.
pub const CHECKOUT_ID_PLACEHOLDER: &str = "{CHECKOUT_ID}";

/// Payments provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolarConfig {
    /// API base (e.g. `https://api.polar.sh`).
    pub api_base_url: String,
    /// Organization access token.
    pub access_token: Option<String>,
    /// Product sold by the checkout.
    pub product_id: Option<String>,
    /// Discount code applied to every checkout.
    pub discount_code: Option<String>,
    /// Public base URL of this service, used for the redirect URLs.
    pub app_base_url: String,
}

impl Default for PolarConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.polar.sh".to_string(),
            access_token: None,
            product_id: None,
            discount_code: None,
            app_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl PolarConfig {
    fn app_base(&self) -> &str {
        self.app_base_url.trim_end_matches('/')
    }

    /// Where the provider sends the buyer after paying.
    #[must_use]
    pub fn success_url(&self) -> String {
        format!("{}/?checkout_id={CHECKOUT_ID_PLACEHOLDER}", self.app_base())
    }

    /// Where the provider sends the buyer on cancel.
    #[must_use]
    pub fn return_url(&self) -> String {
        format!("{}/", self.app_base())
    }
}

/// A hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// Outcome of looking a checkout session up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutVerification {
    /// True iff `status` is `succeeded`.
    pub succeeded: bool,
    /// Lower-cased provider status; empty if the provider sent none.
    pub status: String,
}

#[derive(Debug, Serialize)]
struct CheckoutPayload<'a> {
    products: [&'a str; 1],
    success_url: String,
    return_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    discounts: Option<[Discount<'a>; 1]>,
}

#[derive(Debug, Serialize)]
struct Discount<'a> {
    code: &'a str,
}

/// Client for the checkout endpoints.
pub struct PolarClient {
    config: PolarConfig,
    client: Client,
}

impl PolarClient {
    pub fn new(config: PolarConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &PolarConfig {
        &self.config
    }

    fn token(&self) -> BillingResult<&str> {
        self.config
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(BillingError::NotConfigured("access token"))
    }

    fn checkouts_url(&self) -> String {
        format!("{}/v1/checkouts/", self.config.api_base_url.trim_end_matches('/'))
    }

    /// Lookup URL for one checkout, with the id pushed as a single path segment.
    fn checkout_url(&self, checkout_id: &str) -> BillingResult<Url> {
        let mut url = Url::parse(&self.checkouts_url())
            .map_err(|e| BillingError::Api(format!("invalid API base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| BillingError::Api("invalid API base URL".to_string()))?
            .pop_if_empty()
            .push(checkout_id);
        Ok(url)
    }

    /// Opens a checkout session for the configured product.
    pub async fn create_checkout(&self) -> BillingResult<CheckoutSession> {
        let token = self.token()?;
        let product_id = self
            .config
            .product_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(BillingError::NotConfigured("product id"))?;

        let payload = CheckoutPayload {
            products: [product_id],
            success_url: self.config.success_url(),
            return_url: self.config.return_url(),
            discounts: self
                .config
                .discount_code
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|code| [Discount { code }]),
        };

        debug!(product = product_id, "Creating checkout session");

        let response = self
            .client
            .post(self.checkouts_url())
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BillingError::Network(format!("checkout request failed: {e}")))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            warn!(error = %error, "Checkout creation rejected");
            return Err(BillingError::Api(error));
        }

        let session: CheckoutSession = response
            .json()
            .await
            .map_err(|e| BillingError::Api(format!("failed to parse checkout session: {e}")))?;

        info!("Checkout session created");
        Ok(session)
    }

    /// Looks a checkout session up by id.
    pub async fn verify_checkout(&self, checkout_id: &str) -> BillingResult<CheckoutVerification> {
        let checkout_id = checkout_id.trim();
        if checkout_id.is_empty() {
            return Err(BillingError::Validation("missing checkoutId".to_string()));
        }
        if !is_checkout_id(checkout_id) {
            warn!("Rejected malformed checkout id");
            return Err(BillingError::Validation("invalid checkoutId".to_string()));
        }
        let token = self.token()?;
        let url = self.checkout_url(checkout_id)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| BillingError::Network(format!("checkout lookup failed: {e}")))?;

        let ok = response.status().is_success();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !ok {
            let message = ["detail", "error"]
                .iter()
                .filter_map(|field| body.get(field))
                .find_map(describe)
                .unwrap_or_else(|| "Failed to fetch checkout session".to_string());
            return Err(BillingError::Api(message));
        }

        let status = body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        let succeeded = status == "succeeded";
        info!(checkout = checkout_id, %status, succeeded, "Checkout verified");

        Ok(CheckoutVerification { succeeded, status })
    }
}

/// Checkout ids are opaque tokens of letters, digits, `-` and `_`.
fn is_checkout_id(id: &str) -> bool {
    id.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Renders a provider error field; falsy values count as absent.
fn describe(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
