use order_relay_core::contract::{decode_stream_batch, StreamBatch};
use order_relay_core::notification::notification_from_change;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::adapters::topic::NotificationPublisher;
use crate::error::RelayError;

const COMPONENT: &str = "change_relay";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeSummary {
    pub notifications_published: usize,
}

pub fn handle_stream_event(
    event: Value,
    payload_attribute: &str,
    publisher: &impl NotificationPublisher,
) -> Result<ChangeSummary, RelayError> {
    let batch = decode_stream_batch(event).map_err(RelayError::Decode)?;
    handle_stream_batch(&batch, payload_attribute, publisher)
}

/// Publishes one notification per change record, in stream order.
///
/// Any failure fails the whole invocation so the event source mapping can
/// retry and bisect the batch down to the offending record.
pub fn handle_stream_batch(
    batch: &StreamBatch,
    payload_attribute: &str,
    publisher: &impl NotificationPublisher,
) -> Result<ChangeSummary, RelayError> {
    info!(
        component = COMPONENT,
        records = batch.records.len(),
        "change batch started"
    );

    let mut published = 0usize;
    for record in &batch.records {
        let label = record.label();
        let notification = notification_from_change(record, payload_attribute).map_err(|error| {
            error!(component = COMPONENT, record = %label, error = %error, "change record rejected");
            RelayError::Transform(error)
        })?;

        debug!(
            component = COMPONENT,
            record = %label,
            order_id = %notification.order_id,
            event_name = notification.event_name.as_str(),
            "publishing notification"
        );
        publisher.publish(&notification).map_err(|message| {
            error!(
                component = COMPONENT,
                record = %label,
                published,
                error = %message,
                "notification publish failed"
            );
            RelayError::Publish {
                record: label.clone(),
                message,
            }
        })?;
        published += 1;
    }

    info!(
        component = COMPONENT,
        notifications_published = published,
        "change batch completed"
    );
    Ok(ChangeSummary {
        notifications_published: published,
    })
}
