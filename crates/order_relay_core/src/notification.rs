use serde::{Deserialize, Serialize};

use crate::contract::{string_attribute, ContractError, StreamRecord, ORDER_ID_ATTRIBUTE};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Modify,
    Remove,
}

impl ChangeKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "INSERT" => Some(Self::Insert),
            "MODIFY" => Some(Self::Modify),
            "REMOVE" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Modify => "MODIFY",
            Self::Remove => "REMOVE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderNotification {
    pub event_name: ChangeKind,
    pub order_id: String,
    pub order: Option<String>,
    pub sequence_number: Option<String>,
}

impl OrderNotification {
    pub fn subject(&self) -> String {
        format!("Order {}", self.event_name.as_str())
    }

    pub fn to_message(&self) -> Result<String, ContractError> {
        serde_json::to_string(self).map_err(|error| {
            ContractError::new(format!("failed to serialize notification: {error}"))
        })
    }
}

/// Builds the notification for one change-stream record.
///
/// The stream carries the prior image only, so an INSERT normally has no
/// payload and `order` stays `None`. The id is taken from the keys first,
/// then from whichever image is present.
pub fn notification_from_change(
    record: &StreamRecord,
    payload_attribute: &str,
) -> Result<OrderNotification, ContractError> {
    let label = record.label();

    let event_name = record
        .event_name
        .as_deref()
        .ok_or_else(|| ContractError::new(format!("record {label} has no eventName")))?;
    let event_name = ChangeKind::parse(event_name).ok_or_else(|| {
        ContractError::new(format!(
            "record {label} has unsupported eventName '{event_name}'"
        ))
    })?;

    let data = &record.dynamodb;
    let images = [data.old_image.as_ref(), data.new_image.as_ref()];

    let order_id = string_attribute(&data.keys, ORDER_ID_ATTRIBUTE)
        .or_else(|| {
            images
                .iter()
                .flatten()
                .find_map(|image| string_attribute(*image, ORDER_ID_ATTRIBUTE))
        })
        .ok_or_else(|| {
            ContractError::new(format!(
                "record {label} is missing {ORDER_ID_ATTRIBUTE}"
            ))
        })?;

    let order = images
        .iter()
        .flatten()
        .find_map(|image| string_attribute(*image, payload_attribute))
        .map(str::to_string);

    Ok(OrderNotification {
        event_name,
        order_id: order_id.to_string(),
        order,
        sequence_number: data.sequence_number.clone(),
    })
}
