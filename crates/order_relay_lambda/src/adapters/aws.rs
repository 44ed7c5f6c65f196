use std::future::Future;

use aws_sdk_dynamodb::types::AttributeValue;
use order_relay_core::contract::{OrderRecord, ORDER_ID_ATTRIBUTE};
use order_relay_core::notification::OrderNotification;

use crate::adapters::order_table::OrderTable;
use crate::adapters::queue::MessageQueue;
use crate::adapters::topic::NotificationPublisher;

pub struct DynamoOrderTable {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
    payload_attribute: String,
}

impl DynamoOrderTable {
    pub fn new(
        client: aws_sdk_dynamodb::Client,
        table_name: impl Into<String>,
        payload_attribute: impl Into<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            payload_attribute: payload_attribute.into(),
        }
    }
}

impl OrderTable for DynamoOrderTable {
    fn put_order(&self, record: &OrderRecord) -> Result<(), String> {
        let table_name = self.table_name.clone();
        let request = self
            .client
            .put_item()
            .table_name(table_name.clone())
            .item(ORDER_ID_ATTRIBUTE, AttributeValue::S(record.order_id.clone()))
            .item(
                self.payload_attribute.clone(),
                AttributeValue::S(record.payload.clone()),
            );

        block_on_sdk(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to put item into {table_name}: {error}"))
        })
    }
}

pub struct SnsNotificationPublisher {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsNotificationPublisher {
    pub fn new(client: aws_sdk_sns::Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }
}

impl NotificationPublisher for SnsNotificationPublisher {
    fn publish(&self, notification: &OrderNotification) -> Result<(), String> {
        let message = notification
            .to_message()
            .map_err(|error| error.message().to_string())?;
        let request = self
            .client
            .publish()
            .topic_arn(self.topic_arn.clone())
            .subject(notification.subject())
            .message(message);

        block_on_sdk(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to publish notification: {error}"))
        })
    }
}

pub struct SqsMessageQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsMessageQueue {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }
}

impl MessageQueue for SqsMessageQueue {
    fn send_message(&self, body: &str) -> Result<(), String> {
        let request = self
            .client
            .send_message()
            .queue_url(self.queue_url.clone())
            .message_body(body);

        block_on_sdk(async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to enqueue message: {error}"))
        })
    }
}

// Adapter traits are synchronous; the handlers run on the multi-thread runtime.
fn block_on_sdk<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
