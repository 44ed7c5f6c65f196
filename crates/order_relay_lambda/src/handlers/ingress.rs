use order_relay_core::contract::{decode_queue_batch, OrderRecord, QueueBatch};
use order_relay_core::ids::OrderIdGenerator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::adapters::order_table::OrderTable;
use crate::error::RelayError;

const COMPONENT: &str = "ingress_relay";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressSummary {
    pub records_written: usize,
    pub order_ids: Vec<String>,
}

pub fn handle_queue_event(
    event: Value,
    max_batch_size: usize,
    table: &impl OrderTable,
    ids: &impl OrderIdGenerator,
) -> Result<IngressSummary, RelayError> {
    let batch = decode_queue_batch(event).map_err(RelayError::Decode)?;
    handle_queue_batch(&batch, max_batch_size, table, ids)
}

/// Writes one fresh order record per queued message, in batch order.
///
/// Redelivered messages get a new id every time. The first failed write
/// aborts the batch; records already written stay in the table.
pub fn handle_queue_batch(
    batch: &QueueBatch,
    max_batch_size: usize,
    table: &impl OrderTable,
    ids: &impl OrderIdGenerator,
) -> Result<IngressSummary, RelayError> {
    let records = batch.records.len();
    if records > max_batch_size {
        warn!(
            component = COMPONENT,
            records, max_batch_size, "queue batch exceeds configured maximum"
        );
    }
    info!(component = COMPONENT, records, "ingress batch started");

    let mut order_ids = Vec::with_capacity(records);
    for queued in &batch.records {
        let record = OrderRecord::new(ids.next_id(), queued.body.clone());
        debug!(
            component = COMPONENT,
            order_id = %record.order_id,
            message_id = ?queued.message_id,
            "writing order"
        );

        if let Err(message) = table.put_order(&record) {
            error!(
                component = COMPONENT,
                order_id = %record.order_id,
                written = order_ids.len(),
                error = %message,
                "order write failed"
            );
            return Err(RelayError::Write {
                order_id: record.order_id,
                message,
            });
        }
        order_ids.push(record.order_id);
    }

    info!(
        component = COMPONENT,
        records_written = order_ids.len(),
        "ingress batch completed"
    );
    Ok(IngressSummary {
        records_written: order_ids.len(),
        order_ids,
    })
}
