use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_relay_core::config::RelaySettings;
use order_relay_lambda::adapters::aws::SqsMessageQueue;
use order_relay_lambda::handlers::gateway::{handle_gateway_event, ApiGatewayResponse};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    order_relay_lambda::logging::init();

    let settings = RelaySettings::from_env()?;
    let queue_url = settings.require_queue_url()?.to_string();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let queue = SqsMessageQueue::new(aws_sdk_sqs::Client::new(&aws_config), queue_url);
    let queue = &queue;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiGatewayResponse, Error>(handle_gateway_event(event.payload, queue))
    }))
    .await
}
