//! # Payment Redirects
//!
//! Builds what the storefront hands to an external payment processor once
//! the grand total is known. Nothing here talks to the network: the output
//! is a URL or a request body for the caller to send.
//!
//! ## Providers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Payment Redirect Flow                            │
//! │                                                                         │
//! │  OrderTotals.grand_total ──► PaymentRequest { order_id, amount, ... }   │
//! │                                      │                                  │
//! │                 ┌────────────────────┴────────────────────┐             │
//! │                 ▼                                         ▼             │
//! │   PayPal "Buy Now"                          Stripe Checkout Session     │
//! │   GET {endpoint}?cmd=_xclick&amount=43.50   POST /v1/checkout/sessions  │
//! │   browser follows the URL directly          form body, amount in cents  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

use crate::error::{ConfigError, CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentProvider;

// =============================================================================
// Settings
// =============================================================================

/// Provider endpoints and merchant identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    /// ISO 4217 code, e.g. "CAD".
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Where the shopper lands after paying.
    #[serde(default = "default_return_url")]
    pub return_url: String,

    /// Where the shopper lands after backing out.
    #[serde(default = "default_cancel_url")]
    pub cancel_url: String,

    #[serde(default)]
    pub paypal: PayPalSettings,

    #[serde(default)]
    pub stripe: StripeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalSettings {
    #[serde(default = "default_paypal_endpoint")]
    pub endpoint: String,

    /// Merchant account email or id.
    #[serde(default)]
    pub business: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeSettings {
    #[serde(default = "default_stripe_api_base")]
    pub api_base: String,
}

fn default_currency() -> String {
    "CAD".to_string()
}

fn default_return_url() -> String {
    "http://localhost:8080/checkout/complete".to_string()
}

fn default_cancel_url() -> String {
    "http://localhost:8080/cart".to_string()
}

fn default_paypal_endpoint() -> String {
    "https://www.paypal.com/cgi-bin/webscr".to_string()
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_string()
}

impl Default for PaymentSettings {
    fn default() -> Self {
        PaymentSettings {
            currency: default_currency(),
            return_url: default_return_url(),
            cancel_url: default_cancel_url(),
            paypal: PayPalSettings::default(),
            stripe: StripeSettings::default(),
        }
    }
}

impl Default for PayPalSettings {
    fn default() -> Self {
        PayPalSettings {
            endpoint: default_paypal_endpoint(),
            business: String::new(),
        }
    }
}

impl Default for StripeSettings {
    fn default() -> Self {
        StripeSettings {
            api_base: default_stripe_api_base(),
        }
    }
}

impl PaymentSettings {
    /// Checks currency format and that every URL parses.
    ///
    /// An empty PayPal business is allowed here; it only matters once a
    /// PayPal redirect is actually built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue {
                field: "payments.currency".to_string(),
                reason: format!("'{}' is not a three-letter currency code", self.currency),
            });
        }

        for (field, value) in [
            ("payments.return_url", &self.return_url),
            ("payments.cancel_url", &self.cancel_url),
            ("payments.paypal.endpoint", &self.paypal.endpoint),
            ("payments.stripe.api_base", &self.stripe.api_base),
        ] {
            parse_url(field, value)?;
        }

        Ok(())
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("invalid URL '{}': {}", value, e),
    })
}

// =============================================================================
// Requests
// =============================================================================

/// The order being paid for.
#[derive(Debug, Clone, Copy)]
pub struct PaymentRequest<'a> {
    pub order_id: &'a str,
    /// Shown on the provider's page ("Hearth order 1a2b...").
    pub description: &'a str,
    pub amount: Money,
}

/// A Stripe Checkout Session creation call, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeSessionRequest {
    /// `{api_base}/v1/checkout/sessions`
    pub endpoint: Url,
    /// `application/x-www-form-urlencoded` body.
    pub body: String,
}

/// What the storefront does next to collect payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRedirect {
    /// Send the browser straight to this URL.
    Redirect(Url),
    /// POST this body with the secret key, then redirect to the session URL
    /// in the response.
    CreateSession(StripeSessionRequest),
}

impl PaymentRedirect {
    /// The provider-facing URL, whichever kind of step this is.
    pub fn url(&self) -> &Url {
        match self {
            PaymentRedirect::Redirect(url) => url,
            PaymentRedirect::CreateSession(request) => &request.endpoint,
        }
    }
}

fn ensure_payable(amount: Money) -> CoreResult<()> {
    if !amount.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("grand total must be greater than zero, got {}", amount),
        });
    }
    Ok(())
}

fn with_order(base: &str, field: &str, order_id: &str) -> CoreResult<Url> {
    let mut url = parse_url(field, base)?;
    url.query_pairs_mut().append_pair("order", order_id);
    Ok(url)
}

/// Builds the next payment step for the chosen provider.
pub fn build_redirect(
    provider: PaymentProvider,
    request: &PaymentRequest<'_>,
    settings: &PaymentSettings,
) -> CoreResult<PaymentRedirect> {
    match provider {
        PaymentProvider::PayPal => paypal_redirect_url(request, settings).map(PaymentRedirect::Redirect),
        PaymentProvider::Stripe => {
            stripe_session_request(request, settings).map(PaymentRedirect::CreateSession)
        }
    }
}

/// PayPal "Buy Now" URL.
///
/// ## Example
/// ```rust
/// use hearth_core::payment::{paypal_redirect_url, PaymentRequest, PaymentSettings};
/// use hearth_core::Money;
///
/// let mut settings = PaymentSettings::default();
/// settings.paypal.business = "shop@example.com".into();
///
/// let request = PaymentRequest {
///     order_id: "order-1",
///     description: "Hearth order",
///     amount: Money::from_cents(4350),
/// };
/// let url = paypal_redirect_url(&request, &settings).unwrap();
/// assert!(url.as_str().contains("amount=43.50"));
/// ```
pub fn paypal_redirect_url(
    request: &PaymentRequest<'_>,
    settings: &PaymentSettings,
) -> CoreResult<Url> {
    ensure_payable(request.amount)?;

    if settings.paypal.business.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "payments.paypal.business".to_string(),
            reason: "a merchant account is required for PayPal".to_string(),
        }
        .into());
    }

    let return_url = with_order(&settings.return_url, "payments.return_url", request.order_id)?;
    let cancel_url = with_order(&settings.cancel_url, "payments.cancel_url", request.order_id)?;

    let mut url = parse_url("payments.paypal.endpoint", &settings.paypal.endpoint)?;
    url.query_pairs_mut()
        .append_pair("cmd", "_xclick")
        .append_pair("business", settings.paypal.business.trim())
        .append_pair("item_name", request.description)
        .append_pair("invoice", request.order_id)
        .append_pair("amount", &request.amount.to_decimal_string())
        .append_pair("currency_code", &settings.currency.to_ascii_uppercase())
        .append_pair("return", return_url.as_str())
        .append_pair("cancel_return", cancel_url.as_str());

    Ok(url)
}

/// Stripe Checkout Session request. The amount travels in cents.
pub fn stripe_session_request(
    request: &PaymentRequest<'_>,
    settings: &PaymentSettings,
) -> CoreResult<StripeSessionRequest> {
    ensure_payable(request.amount)?;

    let base = parse_url("payments.stripe.api_base", &settings.stripe.api_base)?;
    let endpoint = base
        .join("/v1/checkout/sessions")
        .map_err(|e| ConfigError::InvalidValue {
            field: "payments.stripe.api_base".to_string(),
            reason: e.to_string(),
        })?;

    let success_url = with_order(&settings.return_url, "payments.return_url", request.order_id)?;
    let cancel_url = with_order(&settings.cancel_url, "payments.cancel_url", request.order_id)?;

    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("mode", "payment")
        .append_pair("client_reference_id", request.order_id)
        .append_pair("success_url", success_url.as_str())
        .append_pair("cancel_url", cancel_url.as_str())
        .append_pair(
            "line_items[0][price_data][currency]",
            &settings.currency.to_ascii_lowercase(),
        )
        .append_pair(
            "line_items[0][price_data][product_data][name]",
            request.description,
        )
        .append_pair(
            "line_items[0][price_data][unit_amount]",
            &request.amount.cents().to_string(),
        )
        .append_pair("line_items[0][quantity]", "1")
        .finish();

    Ok(StripeSessionRequest { endpoint, body })
}

// =============================================================================
// Unit Tests
// =============================================================================
