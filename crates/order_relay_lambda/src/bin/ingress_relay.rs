use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_relay_core::config::RelaySettings;
use order_relay_core::ids::UuidOrderIdGenerator;
use order_relay_lambda::adapters::aws::DynamoOrderTable;
use order_relay_lambda::handlers::ingress::handle_queue_event;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    order_relay_lambda::logging::init();

    let settings = RelaySettings::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let table = DynamoOrderTable::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        settings.table_name.clone(),
        settings.payload_attribute.clone(),
    );
    let max_batch_size = settings.max_batch_size;
    let table = &table;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_queue_event(event.payload, max_batch_size, table, &UuidOrderIdGenerator)
            .map_err(Error::from)
    }))
    .await
}
