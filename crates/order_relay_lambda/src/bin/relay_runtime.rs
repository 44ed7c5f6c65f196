use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_relay_core::config::RelaySettings;
use order_relay_core::contract::ContractError;
use order_relay_core::ids::{OrderIdGenerator, UuidOrderIdGenerator};
use order_relay_lambda::adapters::aws::{
    DynamoOrderTable, SnsNotificationPublisher, SqsMessageQueue,
};
use order_relay_lambda::adapters::order_table::OrderTable;
use order_relay_lambda::adapters::queue::MessageQueue;
use order_relay_lambda::adapters::topic::NotificationPublisher;
use order_relay_lambda::error::RelayError;
use order_relay_lambda::handlers::change::handle_stream_event;
use order_relay_lambda::handlers::gateway::handle_gateway_event;
use order_relay_lambda::handlers::ingress::handle_queue_event;
use serde_json::Value;

const SQS_EVENT_SOURCE: &str = "aws:sqs";
const DYNAMODB_EVENT_SOURCE: &str = "aws:dynamodb";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventRoute {
    Queue,
    Stream,
    Gateway,
}

// Topic and queue are only required when an event routes to them.
struct RuntimeDependencies<T, P, Q> {
    settings: RelaySettings,
    table: T,
    publisher: Result<P, ContractError>,
    queue: Result<Q, ContractError>,
}

fn dispatch_event<T, P, Q>(
    event: Value,
    deps: &RuntimeDependencies<T, P, Q>,
    ids: &impl OrderIdGenerator,
) -> Result<Value, Error>
where
    T: OrderTable,
    P: NotificationPublisher,
    Q: MessageQueue,
{
    let route = route_event(&event).map_err(RelayError::Unroutable)?;
    match route {
        EventRoute::Queue => {
            let summary =
                handle_queue_event(event, deps.settings.max_batch_size, &deps.table, ids)?;
            Ok(serde_json::to_value(summary)?)
        }
        EventRoute::Stream => {
            let publisher = deps
                .publisher
                .as_ref()
                .map_err(|error| RelayError::Configuration(error.clone()))?;
            let summary =
                handle_stream_event(event, &deps.settings.payload_attribute, publisher)?;
            Ok(serde_json::to_value(summary)?)
        }
        EventRoute::Gateway => {
            let queue = deps
                .queue
                .as_ref()
                .map_err(|error| RelayError::Configuration(error.clone()))?;
            Ok(serde_json::to_value(handle_gateway_event(event, queue))?)
        }
    }
}

/// Record batches route on every record's `eventSource`, or on the record
/// shape when the source is absent (`dynamodb` for the stream, `body` for the
/// queue). Only events carrying HTTP request fields reach the gateway.
fn route_event(event: &Value) -> Result<EventRoute, String> {
    if let Some(records) = event.get("Records") {
        let records = records
            .as_array()
            .ok_or_else(|| "Records must be an array".to_string())?;
        if records.is_empty() {
            return Ok(EventRoute::Queue);
        }

        let first = record_route(&records[0]);
        return match first {
            Some(route) if records.iter().all(|record| record_route(record) == first) => {
                Ok(route)
            }
            _ => Err("records come from mixed or unknown sources".to_string()),
        };
    }

    if event.get("httpMethod").is_some() || event.get("requestContext").is_some() {
        Ok(EventRoute::Gateway)
    } else {
        Err("event is neither a record batch nor an HTTP request".to_string())
    }
}

fn record_route(record: &Value) -> Option<EventRoute> {
    match record.get("eventSource").and_then(Value::as_str) {
        Some(SQS_EVENT_SOURCE) => Some(EventRoute::Queue),
        Some(DYNAMODB_EVENT_SOURCE) => Some(EventRoute::Stream),
        Some(_) => None,
        None if record.get("dynamodb").is_some() => Some(EventRoute::Stream),
        None if record.get("body").is_some() => Some(EventRoute::Queue),
        None => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    order_relay_lambda::logging::init();

    let settings = RelaySettings::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        table: DynamoOrderTable::new(
            aws_sdk_dynamodb::Client::new(&aws_config),
            settings.table_name.clone(),
            settings.payload_attribute.clone(),
        ),
        publisher: settings.require_topic_arn().map(|topic_arn| {
            SnsNotificationPublisher::new(aws_sdk_sns::Client::new(&aws_config), topic_arn)
        }),
        queue: settings.require_queue_url().map(|queue_url| {
            SqsMessageQueue::new(aws_sdk_sqs::Client::new(&aws_config), queue_url)
        }),
        settings,
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        dispatch_event(event.payload, deps, &UuidOrderIdGenerator)
    }))
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use order_relay_core::contract::OrderRecord;
    use order_relay_core::ids::SequentialOrderIdGenerator;
    use order_relay_core::notification::OrderNotification;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingTable {
        writes: Mutex<Vec<OrderRecord>>,
    }

    impl OrderTable for RecordingTable {
        fn put_order(&self, record: &OrderRecord) -> Result<(), String> {
            self.writes
                .lock()
                .expect("poisoned mutex")
                .push(record.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTopic {
        published: Mutex<Vec<OrderNotification>>,
    }

    impl NotificationPublisher for RecordingTopic {
        fn publish(&self, notification: &OrderNotification) -> Result<(), String> {
            self.published
                .lock()
                .expect("poisoned mutex")
                .push(notification.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingQueue {
        messages: Mutex<Vec<String>>,
    }

    impl MessageQueue for RecordingQueue {
        fn send_message(&self, body: &str) -> Result<(), String> {
            self.messages
                .lock()
                .expect("poisoned mutex")
                .push(body.to_string());
            Ok(())
        }
    }

    fn wired_deps() -> RuntimeDependencies<RecordingTable, RecordingTopic, RecordingQueue> {
        RuntimeDependencies {
            settings: RelaySettings::default(),
            table: RecordingTable::default(),
            publisher: Ok(RecordingTopic::default()),
            queue: Ok(RecordingQueue::default()),
        }
    }

    fn unwired_deps() -> RuntimeDependencies<RecordingTable, RecordingTopic, RecordingQueue> {
        let settings = RelaySettings::default();
        RuntimeDependencies {
            publisher: Err(settings.require_topic_arn().expect_err("topic is unset")),
            queue: Err(settings.require_queue_url().expect_err("queue is unset")),
            table: RecordingTable::default(),
            settings,
        }
    }

    #[test]
    fn routes_sqs_batches_to_ingress() {
        let event = json!({
            "Records": [
                {"eventSource": "aws:sqs", "body": "order-42"}
            ]
        });
        assert_eq!(route_event(&event), Ok(EventRoute::Queue));
    }

    #[test]
    fn routes_stream_batches_to_change_relay() {
        let event = json!({
            "Records": [
                {"eventSource": "aws:dynamodb", "eventName": "INSERT", "dynamodb": {}}
            ]
        });
        assert_eq!(route_event(&event), Ok(EventRoute::Stream));
    }

    #[test]
    fn routes_sourceless_records_by_shape() {
        assert_eq!(
            route_event(&json!({"Records": [{"body": "order-42"}]})),
            Ok(EventRoute::Queue)
        );
        assert_eq!(
            route_event(&json!({"Records": [{"eventName": "INSERT", "dynamodb": {}}]})),
            Ok(EventRoute::Stream)
        );
    }

    #[test]
    fn routes_empty_batch_to_ingress() {
        assert_eq!(route_event(&json!({"Records": []})), Ok(EventRoute::Queue));
    }

    #[test]
    fn routes_http_events_to_gateway() {
        let v1 = json!({"httpMethod": "POST", "body": "order-42"});
        let v2 = json!({"requestContext": {"http": {"method": "POST"}}, "body": "order-42"});
        assert_eq!(route_event(&v1), Ok(EventRoute::Gateway));
        assert_eq!(route_event(&v2), Ok(EventRoute::Gateway));
    }

    #[test]
    fn rejects_mixed_and_unknown_shapes() {
        let mixed = json!({
            "Records": [
                {"eventSource": "aws:sqs", "body": "a"},
                {"eventSource": "aws:s3"}
            ]
        });
        assert_eq!(
            route_event(&mixed),
            Err("records come from mixed or unknown sources".to_string())
        );
        assert!(route_event(&json!({"Records": [{"messageId": "m-1"}]})).is_err());
        assert!(route_event(&json!({"body": "order-42"})).is_err());
        assert!(route_event(&json!({"Records": "order-42"})).is_err());
    }

    #[test]
    fn sourceless_queue_event_writes_an_order() {
        let deps = wired_deps();
        let ids = SequentialOrderIdGenerator::new("order");

        let response = dispatch_event(json!({"Records": [{"body": "order-42"}]}), &deps, &ids)
            .expect("dispatch should succeed");

        assert_eq!(response["records_written"], 1);
        assert_eq!(
            *deps.table.writes.lock().expect("poisoned mutex"),
            vec![OrderRecord::new("order-0", "order-42")]
        );
        let queue = deps.queue.as_ref().expect("queue wired");
        assert!(queue.messages.lock().expect("poisoned mutex").is_empty());
    }

    #[test]
    fn mixed_batch_fails_without_side_effects() {
        let deps = wired_deps();
        let ids = SequentialOrderIdGenerator::new("order");

        let error = dispatch_event(
            json!({"Records": [{"body": "a"}, {"eventSource": "aws:s3"}]}),
            &deps,
            &ids,
        )
        .expect_err("mixed batch should fail");

        assert_eq!(
            error.to_string(),
            "unroutable event: records come from mixed or unknown sources"
        );
        assert!(deps.table.writes.lock().expect("poisoned mutex").is_empty());
        let queue = deps.queue.as_ref().expect("queue wired");
        assert!(queue.messages.lock().expect("poisoned mutex").is_empty());
    }

    #[test]
    fn stream_event_without_topic_is_a_configuration_error() {
        let deps = unwired_deps();
        let ids = SequentialOrderIdGenerator::new("order");

        let error = dispatch_event(
            json!({"Records": [{
                "eventSource": "aws:dynamodb",
                "eventName": "INSERT",
                "dynamodb": {"Keys": {"orderID": {"S": "id-1"}}}
            }]}),
            &deps,
            &ids,
        )
        .expect_err("missing topic should fail");

        assert_eq!(error.to_string(), "ORDER_TOPIC_ARN must be configured");
    }

    #[test]
    fn http_event_without_queue_is_a_configuration_error() {
        let deps = unwired_deps();
        let ids = SequentialOrderIdGenerator::new("order");

        let error = dispatch_event(json!({"httpMethod": "POST", "body": "order-42"}), &deps, &ids)
            .expect_err("missing queue should fail");

        assert_eq!(error.to_string(), "ORDER_QUEUE_URL must be configured");
    }

    #[test]
    fn wired_stream_event_publishes() {
        let deps = wired_deps();
        let ids = SequentialOrderIdGenerator::new("order");

        let response = dispatch_event(
            json!({"Records": [{
                "eventSource": "aws:dynamodb",
                "eventName": "INSERT",
                "dynamodb": {"Keys": {"orderID": {"S": "id-1"}}}
            }]}),
            &deps,
            &ids,
        )
        .expect("dispatch should succeed");

        assert_eq!(response["notifications_published"], 1);
        let topic = deps.publisher.as_ref().expect("topic wired");
        assert_eq!(topic.published.lock().expect("poisoned mutex").len(), 1);
    }
}
