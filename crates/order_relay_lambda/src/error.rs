use order_relay_core::contract::ContractError;
use thiserror::Error;

/// Failure of a relay invocation. Returning one from a Lambda handler hands
/// the batch back to the platform's retry and redrive policy.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Decode(ContractError),
    #[error("{0}")]
    Configuration(ContractError),
    #[error("failed to write order {order_id}: {message}")]
    Write { order_id: String, message: String },
    #[error("{0}")]
    Transform(ContractError),
    #[error("failed to publish record {record}: {message}")]
    Publish { record: String, message: String },
    #[error("unroutable event: {0}")]
    Unroutable(String),
}
