// Transport-level types: the inbound envelope and the response handed back to the runtime

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw request body as found in the envelope, before UTF-8 decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    Text(String),
    Bytes(Vec<u8>),
}

impl RawBody {
    /// Decode to text. Invalid UTF-8 sequences are dropped rather than replaced.
    pub fn into_text(self) -> String {
        match self {
            RawBody::Text(text) => text,
            RawBody::Bytes(bytes) => String::from_utf8_lossy(&bytes)
                .chars()
                .filter(|c| *c != char::REPLACEMENT_CHARACTER)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RawBody::Text(text) => text.len(),
            RawBody::Bytes(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawBody::Text(_) => "text",
            RawBody::Bytes(_) => "bytes",
        }
    }
}

/// Key-value payload delivered by the function runtime or the webhook route.
///
/// The update body may sit in `body` (string, byte array, or base64 string
/// flagged by `isBase64Encoded`), in `httpRequest.body`, or the envelope may
/// itself be a bare Telegram update.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    fields: Map<String, Value>,
    body_bytes: Option<Vec<u8>>,
}

impl Envelope {
    pub fn from_json(value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            fields,
            body_bytes: None,
        }
    }

    /// Envelope whose `body` is a raw byte payload (webhook deliveries).
    pub fn from_body_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            fields: Map::new(),
            body_bytes: Some(bytes.into()),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Locate the request body: `body`, then `httpRequest.body`, then the
    /// envelope itself when it already is an update.
    pub fn body(&self) -> Option<RawBody> {
        if let Some(bytes) = self.body_bytes.as_ref().filter(|b| !b.is_empty()) {
            return Some(RawBody::Bytes(bytes.clone()));
        }

        let base64_encoded = self
            .fields
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if let Some(body) = self.fields.get("body").and_then(|v| body_value(v, base64_encoded)) {
            return Some(body);
        }

        if let Some(body) = self
            .fields
            .get("httpRequest")
            .and_then(|req| req.get("body"))
            .and_then(|v| body_value(v, false))
        {
            return Some(body);
        }

        if self.fields.contains_key("update_id") {
            return serde_json::to_string(&self.fields).ok().map(RawBody::Text);
        }

        None
    }
}

fn body_value(value: &Value, base64_encoded: bool) -> Option<RawBody> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) if base64_encoded => Some(
            base64::engine::general_purpose::STANDARD
                .decode(s.trim())
                .map(RawBody::Bytes)
                .unwrap_or_else(|_| RawBody::Text(s.clone())),
        ),
        Value::String(s) => Some(RawBody::Text(s.clone())),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => {
            let bytes: Option<Vec<u8>> = items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect();
            Some(match bytes {
                Some(bytes) => RawBody::Bytes(bytes),
                None => RawBody::Text(value.to_string()),
            })
        }
        // Some gateways hand the body over already parsed.
        other => Some(RawBody::Text(other.to_string())),
    }
}

/// Response returned to the transport runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl TransportResponse {
    pub const OK_STATUS: u16 = 200;
    pub const ERROR_STATUS: u16 = 500;

    pub fn ok() -> Self {
        Self {
            status_code: Self::OK_STATUS,
            body: "OK".to_string(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self {
            status_code: Self::ERROR_STATUS,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == Self::OK_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_field_preferred() {
        let envelope = Envelope::from_json(json!({
            "body": "{\"update_id\": 1}",
            "httpRequest": { "body": "ignored" }
        }));
        assert_eq!(envelope.body(), Some(RawBody::Text("{\"update_id\": 1}".to_string())));
    }

    #[test]
    fn test_empty_body_falls_through_to_http_request() {
        let envelope = Envelope::from_json(json!({
            "body": "",
            "httpRequest": { "body": "{\"update_id\": 2}" }
        }));
        assert_eq!(envelope.body(), Some(RawBody::Text("{\"update_id\": 2}".to_string())));
    }

    #[test]
    fn test_bare_update_is_its_own_body() {
        let envelope = Envelope::from_json(json!({ "update_id": 7 }));
        let body = envelope.body().unwrap().into_text();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["update_id"], 7);
    }

    #[test]
    fn test_no_body_anywhere() {
        let envelope = Envelope::from_json(json!({ "headers": { "x": "y" } }));
        assert_eq!(envelope.body(), None);
        assert_eq!(Envelope::default().body(), None);
    }

    #[test]
    fn test_base64_body_is_decoded() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("{\"a\":1}");
        let envelope = Envelope::from_json(json!({ "body": encoded, "isBase64Encoded": true }));
        let body = envelope.body().unwrap();
        assert_eq!(body.kind(), "bytes");
        assert_eq!(body.into_text(), "{\"a\":1}");
    }

    #[test]
    fn test_byte_array_body_drops_invalid_utf8() {
        let envelope = Envelope::from_json(json!({ "body": [123, 255, 125] }));
        assert_eq!(envelope.body().unwrap().into_text(), "{}");
    }

    #[test]
    fn test_raw_bytes_body() {
        let envelope = Envelope::from_body_bytes(b"{\"update_id\":3}".to_vec());
        assert_eq!(envelope.body().unwrap().into_text(), "{\"update_id\":3}");
        assert_eq!(Envelope::from_body_bytes(Vec::new()).body(), None);
    }

    #[test]
    fn test_transport_response_shape() {
        let ok = serde_json::to_value(TransportResponse::ok()).unwrap();
        assert_eq!(ok, json!({ "statusCode": 200, "body": "OK" }));
        assert_eq!(TransportResponse::error("boom").status_code, 500);
    }
}
