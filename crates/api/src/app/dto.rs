use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// -------------------------
// Request DTOs
// -------------------------

/// Raw, untrusted create request as handed over by the routing layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Routed path segment; `None` when the router did not supply it.
    pub warehouse_id: Option<String>,
    /// Body text exactly as received.
    pub body: Option<String>,
}

impl CreateProductRequest {
    pub fn new(warehouse_id: Option<&str>, body: Option<&str>) -> Self {
        Self {
            warehouse_id: warehouse_id.map(str::to_string),
            body: body.map(str::to_string),
        }
    }

    /// Request whose body is the serialized form of `body`.
    pub fn with_json(warehouse_id: Option<&str>, body: &serde_json::Value) -> Self {
        Self {
            warehouse_id: warehouse_id.map(str::to_string),
            body: Some(body.to_string()),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Transport-neutral response: status code, headers and a JSON body as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProductResponse {
    pub(crate) fn json(status_code: u16, body: String) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Parse the body back into JSON.
    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}
