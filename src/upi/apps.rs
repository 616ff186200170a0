//! Wallet apps that accept UPI deep links.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A UPI-capable app and its deep-link prefix.
///
/// Only the scheme/host differs between apps; the query string is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpiApp {
    /// Any registered UPI handler.
    Generic,
    GooglePay,
    PhonePe,
    Paytm,
    Bhim,
}

impl UpiApp {
    pub const ALL: [UpiApp; 5] = [
        UpiApp::Generic,
        UpiApp::GooglePay,
        UpiApp::PhonePe,
        UpiApp::Paytm,
        UpiApp::Bhim,
    ];

    /// URI prefix up to (not including) the `?`.
    pub fn uri_prefix(&self) -> &'static str {
        match self {
            UpiApp::Generic => "upi://pay",
            UpiApp::GooglePay => "tez://upi/pay",
            UpiApp::PhonePe => "phonepe://pay",
            UpiApp::Paytm => "paytmmp://pay",
            UpiApp::Bhim => "bhim://pay",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpiApp::Generic => "generic",
            UpiApp::GooglePay => "googlePay",
            UpiApp::PhonePe => "phonePe",
            UpiApp::Paytm => "paytm",
            UpiApp::Bhim => "bhim",
        }
    }
}

impl fmt::Display for UpiApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown UPI app: {0}")]
pub struct UnknownUpiApp(pub String);

impl FromStr for UpiApp {
    type Err = UnknownUpiApp;

    /// Case-insensitive; accepts `google_pay`/`gpay` style spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "generic" | "upi" => Ok(UpiApp::Generic),
            "googlepay" | "gpay" | "tez" => Ok(UpiApp::GooglePay),
            "phonepe" => Ok(UpiApp::PhonePe),
            "paytm" => Ok(UpiApp::Paytm),
            "bhim" => Ok(UpiApp::Bhim),
            _ => Err(UnknownUpiApp(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_end_in_pay() {
        for app in UpiApp::ALL {
            assert!(app.uri_prefix().ends_with("pay"), "{}", app);
            assert!(app.uri_prefix().contains("://"));
        }
        assert_eq!(UpiApp::Generic.uri_prefix(), "upi://pay");
    }

    #[test]
    fn test_parse_app_names() {
        assert_eq!("GooglePay".parse::<UpiApp>(), Ok(UpiApp::GooglePay));
        assert_eq!("google_pay".parse::<UpiApp>(), Ok(UpiApp::GooglePay));
        assert_eq!(" phonepe ".parse::<UpiApp>(), Ok(UpiApp::PhonePe));
        assert_eq!("BHIM".parse::<UpiApp>(), Ok(UpiApp::Bhim));
        assert!("venmo".parse::<UpiApp>().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&UpiApp::GooglePay).unwrap(),
            "\"googlePay\""
        );
        for app in UpiApp::ALL {
            let json = serde_json::to_string(&app).unwrap();
            assert_eq!(json, format!("\"{}\"", app.as_str()));
        }
    }
}
