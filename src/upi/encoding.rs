//! Query-string renderers for UPI payment parameters.
//!
//! A payment request is built once as a [`UpiParamSet`] and rendered through a
//! [`ParamEncoder`]. Deep links need standard URI-component escaping, while
//! the NPCI QR convention keeps spaces literal and only protects the query
//! delimiters.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped by URI-component encoding: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escapes a single query-parameter value.
pub trait ParamEncoder {
    fn encode_value(&self, value: &str) -> String;
}

/// Standard URI-component percent-encoding (space becomes `%20`).
#[derive(Debug, Clone, Copy, Default)]
pub struct UriComponentEncoder;

impl ParamEncoder for UriComponentEncoder {
    fn encode_value(&self, value: &str) -> String {
        utf8_percent_encode(value, URI_COMPONENT).to_string()
    }
}

/// QR/NFC encoding: literal text, with only `&` and `#` escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

impl ParamEncoder for QrEncoder {
    fn encode_value(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '&' => out.push_str("%26"),
                '#' => out.push_str("%23"),
                other => out.push(other),
            }
        }
        out
    }
}

/// Ordered UPI query parameters. Order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpiParamSet {
    params: Vec<(&'static str, String)>,
}

impl UpiParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.params.push((key, value.into()));
    }

    /// Push only when a non-empty value is present.
    pub fn push_opt(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            self.push(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|(k, _)| *k)
    }

    /// Render as `k=v&k=v` with values escaped by `encoder`.
    pub fn to_query<E: ParamEncoder + ?Sized>(&self, encoder: &E) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, encoder.encode_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Render as `<prefix>?<query>`.
    pub fn render<E: ParamEncoder + ?Sized>(&self, prefix: &str, encoder: &E) -> String {
        format!("{}?{}", prefix, self.to_query(encoder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_component_encoding() {
        let enc = UriComponentEncoder;
        assert_eq!(enc.encode_value("John Doe"), "John%20Doe");
        assert_eq!(enc.encode_value("merchant@paytm"), "merchant%40paytm");
        assert_eq!(enc.encode_value("a&b#c=d"), "a%26b%23c%3Dd");
        assert_eq!(enc.encode_value("ok-_.!~*'()"), "ok-_.!~*'()");
        assert_eq!(enc.encode_value("chai ☕"), "chai%20%E2%98%95");
    }

    #[test]
    fn test_qr_encoding_keeps_spaces() {
        let enc = QrEncoder;
        assert_eq!(enc.encode_value("John Doe"), "John Doe");
        assert_eq!(enc.encode_value("Fish & Chips #2"), "Fish %26 Chips %232");
        assert_eq!(enc.encode_value("merchant@paytm"), "merchant@paytm");
    }

    #[test]
    fn test_param_set_preserves_order_and_skips_empty() {
        let mut params = UpiParamSet::new();
        params.push("pa", "merchant@paytm");
        params.push("pn", "John Doe");
        params.push_opt("tn", None);
        params.push_opt("mc", Some(""));
        params.push("am", "10.00");

        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["pa", "pn", "am"]);
        assert_eq!(params.get("pn"), Some("John Doe"));
        assert_eq!(
            params.render("upi://pay", &UriComponentEncoder),
            "upi://pay?pa=merchant%40paytm&pn=John%20Doe&am=10.00"
        );
        assert_eq!(
            params.render("upi://pay", &QrEncoder),
            "upi://pay?pa=merchant@paytm&pn=John Doe&am=10.00"
        );
    }
}
