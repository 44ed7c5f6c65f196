use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::adapters::queue::MessageQueue;

const COMPONENT: &str = "order_gateway";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Forwards the raw request body of a POST to the order queue.
pub fn handle_gateway_event(event: Value, queue: &impl MessageQueue) -> ApiGatewayResponse {
    if let Some(method) = request_method(&event) {
        if !method.eq_ignore_ascii_case("POST") {
            warn!(component = COMPONENT, method, "rejected non-POST request");
            return empty_response(405);
        }
    }

    let body = match extract_body(&event) {
        Ok(value) => value,
        Err(message) => {
            warn!(component = COMPONENT, error = %message, "rejected request body");
            return empty_response(400);
        }
    };

    if let Err(message) = queue.send_message(&body) {
        error!(component = COMPONENT, error = %message, "enqueue failed");
        return empty_response(502);
    }

    info!(component = COMPONENT, bytes = body.len(), "order enqueued");
    empty_response(200)
}

fn request_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| {
            event
                .pointer("/requestContext/http/method")
                .and_then(Value::as_str)
        })
}

fn extract_body(event: &Value) -> Result<String, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let encoded = object
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let body = match object.get("body") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) if encoded => {
            let bytes = STANDARD
                .decode(text)
                .map_err(|error| format!("Malformed base64 body: {error}"))?;
            String::from_utf8(bytes).map_err(|error| format!("Body is not UTF-8: {error}"))?
        }
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };

    // SQS rejects zero-length message bodies.
    if body.is_empty() {
        return Err("Request body is required".to_string());
    }
    Ok(body)
}

fn empty_response(status_code: u16) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({}),
        body: String::new(),
    }
}
