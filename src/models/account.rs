//! Account model
//!
//! Represents the accounts money lives in (checking, savings, credit cards,
//! investments). The account type is a closed set with an open-string
//! fallback so documents written by newer versions keep their raw type value
//! instead of failing to load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Type of financial account
///
/// Known values round-trip as the enum; anything else is preserved
/// verbatim in `Other` for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Investment,
    /// Unrecognized type, kept as the raw stored string
    Other(String),
}

impl AccountType {
    /// The canonical string form of this type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::CreditCard => "Credit Card",
            Self::Investment => "Investment",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this is one of the known account types
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Exact-match conversion from a stored string
    ///
    /// Unknown values become `Other`; nothing is lost.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Checking" => Self::Checking,
            "Savings" => Self::Savings,
            "Credit Card" => Self::CreditCard,
            "Investment" => Self::Investment,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Best-effort coercion from a loosely-typed legacy value
    ///
    /// Case-insensitive match against known types and common aliases;
    /// unmatched values survive as `Other`.
    pub fn coerce(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "checking" => Self::Checking,
            "savings" => Self::Savings,
            "credit card" | "credit_card" | "creditcard" | "credit" => Self::CreditCard,
            "investment" => Self::Investment,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        Self::Checking
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AccountType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccountType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// A financial account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier within the accounts collection
    pub id: String,

    /// Account name (e.g. "Chase Checking")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Currency this account is denominated in
    pub currency: String,

    /// Bank or platform holding the account; empty when unknown
    #[serde(default)]
    pub platform: String,
}

impl Account {
    /// Create a new account with a generated id
    pub fn new(name: impl Into<String>, account_type: AccountType, currency: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            account_type,
            currency: currency.into(),
            platform: String::new(),
        }
    }
}
