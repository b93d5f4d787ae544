//! JSON envelope for conversion results

use serde::{Deserialize, Serialize};

/// Outcome of one conversion, shaped for JSON consumers.
///
/// Success and failure share this type; empty fields are left out when
/// serialized, so a failure carries only `ok` and `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Present on every success, including a result of zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
    #[serde(default, rename = "fromsymbol", skip_serializing_if = "String::is_empty")]
    pub from_symbol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
    #[serde(default, rename = "tosymbol", skip_serializing_if = "String::is_empty")]
    pub to_symbol: String,
    #[serde(default, rename = "baseuom", skip_serializing_if = "String::is_empty")]
    pub base_unit: String,
}

impl ConversionResponse {
    /// Create failure response carrying only the error text
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
