//! UPI payment link generation.

use super::apps::UpiApp;
use super::encoding::{QrEncoder, UpiParamSet, UriComponentEncoder};
use super::reference::generate_transaction_ref;
use super::vpa::validate_vpa;
use super::UpiError;
use crate::domain::{rupees_to_paise, Rupees, PAISE_PER_RUPEE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-transaction UPI ceiling, in rupees.
pub const MAX_UPI_AMOUNT_RUPEES: i64 = 100_000;

pub const DEFAULT_CURRENCY: &str = "INR";

/// Input for a payment request, named after the UPI query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiPaymentParams {
    /// Payee VPA.
    pub pa: String,
    /// Payee name.
    pub pn: String,
    /// Amount in rupees.
    pub am: Rupees,
    /// Currency code; the generator's default when absent.
    #[serde(default)]
    pub cu: Option<String>,
    /// Transaction note.
    #[serde(default)]
    pub tn: Option<String>,
    /// Transaction reference; synthesized when absent.
    #[serde(default)]
    pub tr: Option<String>,
    /// Merchant category code.
    #[serde(default)]
    pub mc: Option<String>,
    /// Bill the request belongs to, used for reference synthesis only.
    #[serde(default)]
    pub bill_id: Option<String>,
}

impl UpiPaymentParams {
    pub fn new(pa: impl Into<String>, pn: impl Into<String>, am: Rupees) -> Self {
        Self {
            pa: pa.into(),
            pn: pn.into(),
            am,
            ..Default::default()
        }
    }

    /// Request for a participant's share, given in paise.
    pub fn for_share(pa: impl Into<String>, pn: impl Into<String>, amount_paise: i64) -> Self {
        Self::new(pa, pn, Rupees::from_paise(amount_paise))
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.tn = Some(note.into());
        self
    }

    pub fn with_transaction_ref(mut self, tr: impl Into<String>) -> Self {
        self.tr = Some(tr.into());
        self
    }

    pub fn with_merchant_code(mut self, mc: impl Into<String>) -> Self {
        self.mc = Some(mc.into());
        self
    }

    pub fn with_currency(mut self, cu: impl Into<String>) -> Self {
        self.cu = Some(cu.into());
        self
    }

    pub fn with_bill_id(mut self, bill_id: impl Into<String>) -> Self {
        self.bill_id = Some(bill_id.into());
        self
    }
}

/// A generated payment request. Every URI shares one query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiLinkResult {
    pub standard_uri: String,
    pub fallback_uris: BTreeMap<UpiApp, String>,
    pub qr_code_data: String,
    pub transaction_ref: String,
}

impl UpiLinkResult {
    pub fn fallback_uri(&self, app: UpiApp) -> Option<&str> {
        self.fallback_uris.get(&app).map(String::as_str)
    }
}

/// Builds payment links with a configured currency and set of wallet apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiLinkGenerator {
    currency: String,
    apps: Vec<UpiApp>,
}

impl Default for UpiLinkGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY, UpiApp::ALL.to_vec())
    }
}

impl UpiLinkGenerator {
    pub fn new(currency: impl Into<String>, apps: Vec<UpiApp>) -> Self {
        Self {
            currency: currency.into(),
            apps,
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn apps(&self) -> &[UpiApp] {
        &self.apps
    }

    /// Validate `params` and render the deep links and QR payload.
    ///
    /// # Errors
    /// Returns [`UpiError`] when the VPA is invalid, the amount is not in
    /// `(0, 100000]` rupees, or the payee name is blank. Checked in that order.
    pub fn generate(&self, params: &UpiPaymentParams) -> Result<UpiLinkResult, UpiError> {
        validate_params(params)?;

        let transaction_ref = match params.tr.as_deref().map(str::trim) {
            Some(tr) if !tr.is_empty() => tr.to_string(),
            _ => generate_transaction_ref(params.bill_id.as_deref()),
        };
        let query = self.param_set(params, &transaction_ref);

        let standard_uri = query.render(UpiApp::Generic.uri_prefix(), &UriComponentEncoder);
        let fallback_uris = self
            .apps
            .iter()
            .map(|app| (*app, query.render(app.uri_prefix(), &UriComponentEncoder)))
            .collect();
        let qr_code_data = query.render(UpiApp::Generic.uri_prefix(), &QrEncoder);

        debug!(
            transaction_ref = %transaction_ref,
            amount = %params.am,
            apps = self.apps.len(),
            "Generated UPI payment link"
        );

        Ok(UpiLinkResult {
            standard_uri,
            fallback_uris,
            qr_code_data,
            transaction_ref,
        })
    }

    /// Canonical parameter order: `pa, pn, am, cu, tn?, tr, mc?`.
    fn param_set(&self, params: &UpiPaymentParams, transaction_ref: &str) -> UpiParamSet {
        let currency = params
            .cu
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.currency);

        let mut set = UpiParamSet::new();
        set.push("pa", params.pa.trim());
        set.push("pn", params.pn.trim());
        set.push("am", params.am.to_fixed_2());
        set.push("cu", currency);
        set.push_opt("tn", params.tn.as_deref().map(str::trim));
        set.push("tr", transaction_ref);
        set.push_opt("mc", params.mc.as_deref().map(str::trim));
        set
    }
}

fn validate_params(params: &UpiPaymentParams) -> Result<(), UpiError> {
    let vpa = validate_vpa(Some(&params.pa));
    if !vpa.is_valid {
        return Err(UpiError::InvalidVpa(vpa.joined_errors()));
    }
    // Bounds apply to the amount as rendered, i.e. rounded to whole paise.
    let amount_paise = link_amount_paise(params);
    if amount_paise <= 0 {
        return Err(UpiError::NonPositiveAmount);
    }
    if amount_paise > MAX_UPI_AMOUNT_RUPEES * PAISE_PER_RUPEE {
        return Err(UpiError::AmountTooLarge);
    }
    if params.pn.trim().is_empty() {
        return Err(UpiError::PayeeNameRequired);
    }
    Ok(())
}

/// Generate a link with the default generator (INR, every known app).
///
/// # Errors
/// See [`UpiLinkGenerator::generate`].
pub fn generate_upi_link(params: &UpiPaymentParams) -> Result<UpiLinkResult, UpiError> {
    UpiLinkGenerator::default().generate(params)
}

/// Amount rendered in a link, converted back to paise.
pub fn link_amount_paise(params: &UpiPaymentParams) -> i64 {
    rupees_to_paise(params.am.inner())
}
