use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const ORDER_ID_ATTRIBUTE: &str = "orderID";
pub const DEFAULT_PAYLOAD_ATTRIBUTE: &str = "order";
pub const DEFAULT_TABLE_NAME: &str = "POC_orders";

/// DynamoDB JSON attribute map, e.g. `{"orderID": {"S": "..."}}`.
pub type AttributeMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueMessage {
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(
        rename = "eventSource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_source: Option<String>,
    pub body: String,
}

impl QueueMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            event_source: None,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueBatch {
    #[serde(rename = "Records")]
    pub records: Vec<QueueMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: String,
    pub payload: String,
}

impl OrderRecord {
    pub fn new(order_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            payload: payload.into(),
        }
    }

    /// Renders the record as a DynamoDB JSON image.
    pub fn to_image(&self, payload_attribute: &str) -> AttributeMap {
        BTreeMap::from([
            (ORDER_ID_ATTRIBUTE.to_string(), json!({ "S": self.order_id })),
            (payload_attribute.to_string(), json!({ "S": self.payload })),
        ])
    }

    pub fn keys(&self) -> AttributeMap {
        BTreeMap::from([(ORDER_ID_ATTRIBUTE.to_string(), json!({ "S": self.order_id }))])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamBatch {
    #[serde(rename = "Records")]
    pub records: Vec<StreamRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamRecord {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(
        rename = "eventSource",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_source: Option<String>,
    #[serde(default)]
    pub dynamodb: StreamRecordData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamRecordData {
    #[serde(rename = "Keys", default)]
    pub keys: AttributeMap,
    #[serde(rename = "OldImage", default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<AttributeMap>,
    #[serde(rename = "NewImage", default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<AttributeMap>,
    #[serde(
        rename = "SequenceNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number: Option<String>,
}

impl StreamRecord {
    /// Best available identifier for diagnostics.
    pub fn label(&self) -> String {
        self.dynamodb
            .sequence_number
            .clone()
            .or_else(|| self.event_id.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

pub fn string_attribute<'a>(attributes: &'a AttributeMap, name: &str) -> Option<&'a str> {
    attributes.get(name)?.get("S")?.as_str()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    message: String,
}

impl ContractError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ContractError {}

pub fn decode_queue_batch(event: Value) -> Result<QueueBatch, ContractError> {
    serde_json::from_value(event)
        .map_err(|error| ContractError::new(format!("invalid queue batch: {error}")))
}

pub fn decode_stream_batch(event: Value) -> Result<StreamBatch, ContractError> {
    serde_json::from_value(event)
        .map_err(|error| ContractError::new(format!("invalid stream batch: {error}")))
}
