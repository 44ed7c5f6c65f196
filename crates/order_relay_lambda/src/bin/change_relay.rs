use lambda_runtime::{service_fn, Error, LambdaEvent};
use order_relay_core::config::RelaySettings;
use order_relay_lambda::adapters::aws::SnsNotificationPublisher;
use order_relay_lambda::handlers::change::handle_stream_event;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    order_relay_lambda::logging::init();

    let settings = RelaySettings::from_env()?;
    let topic_arn = settings.require_topic_arn()?.to_string();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let publisher =
        SnsNotificationPublisher::new(aws_sdk_sns::Client::new(&aws_config), topic_arn);
    let payload_attribute = settings.payload_attribute.as_str();
    let publisher = &publisher;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_stream_event(event.payload, payload_attribute, publisher).map_err(Error::from)
    }))
    .await
}
