use crate::contract::{
    ContractError, DEFAULT_PAYLOAD_ATTRIBUTE, DEFAULT_TABLE_NAME, ORDER_ID_ATTRIBUTE,
};

pub const ENV_TABLE_NAME: &str = "ORDERS_TABLE_NAME";
pub const ENV_PAYLOAD_ATTRIBUTE: &str = "ORDER_PAYLOAD_ATTRIBUTE";
pub const ENV_QUEUE_URL: &str = "ORDER_QUEUE_URL";
pub const ENV_TOPIC_ARN: &str = "ORDER_TOPIC_ARN";
pub const ENV_NOTIFICATION_EMAIL: &str = "ORDER_NOTIFICATION_EMAIL";
pub const ENV_MAX_BATCH_SIZE: &str = "INGRESS_MAX_BATCH_SIZE";

pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub table_name: String,
    pub payload_attribute: String,
    pub queue_url: Option<String>,
    pub topic_arn: Option<String>,
    pub notification_email: Option<String>,
    pub max_batch_size: usize,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            payload_attribute: DEFAULT_PAYLOAD_ATTRIBUTE.to_string(),
            queue_url: None,
            topic_arn: None,
            notification_email: None,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl RelaySettings {
    pub fn from_env() -> Result<Self, ContractError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ContractError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        let max_batch_size = match read(ENV_MAX_BATCH_SIZE) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) | Err(_) => {
                    return Err(ContractError::new(format!(
                        "{ENV_MAX_BATCH_SIZE} must be a positive integer, got '{raw}'"
                    )));
                }
                Ok(value) => value,
            },
            None => defaults.max_batch_size,
        };

        // The payload must not overwrite the partition key.
        let payload_attribute = read(ENV_PAYLOAD_ATTRIBUTE).unwrap_or(defaults.payload_attribute);
        if payload_attribute == ORDER_ID_ATTRIBUTE {
            return Err(ContractError::new(format!(
                "{ENV_PAYLOAD_ATTRIBUTE} must differ from {ORDER_ID_ATTRIBUTE}"
            )));
        }

        Ok(Self {
            table_name: read(ENV_TABLE_NAME).unwrap_or(defaults.table_name),
            payload_attribute,
            queue_url: read(ENV_QUEUE_URL),
            topic_arn: read(ENV_TOPIC_ARN),
            notification_email: read(ENV_NOTIFICATION_EMAIL),
            max_batch_size,
        })
    }

    pub fn require_queue_url(&self) -> Result<&str, ContractError> {
        self.queue_url
            .as_deref()
            .ok_or_else(|| ContractError::new(format!("{ENV_QUEUE_URL} must be configured")))
    }

    pub fn require_topic_arn(&self) -> Result<&str, ContractError> {
        self.topic_arn
            .as_deref()
            .ok_or_else(|| ContractError::new(format!("{ENV_TOPIC_ARN} must be configured")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = RelaySettings::from_lookup(lookup_from(&[])).expect("defaults load");

        assert_eq!(settings, RelaySettings::default());
        assert_eq!(settings.table_name, "POC_orders");
        assert_eq!(settings.payload_attribute, "order");
        assert_eq!(settings.max_batch_size, 10);
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let settings = RelaySettings::from_lookup(lookup_from(&[
            (ENV_TABLE_NAME, "  "),
            (ENV_TOPIC_ARN, ""),
        ]))
        .expect("settings load");

        assert_eq!(settings.table_name, "POC_orders");
        let error = settings.require_topic_arn().expect_err("topic is unset");
        assert_eq!(error.message(), "ORDER_TOPIC_ARN must be configured");
    }

    #[test]
    fn reads_overrides() {
        let settings = RelaySettings::from_lookup(lookup_from(&[
            (ENV_TABLE_NAME, "orders-prod"),
            (ENV_PAYLOAD_ATTRIBUTE, "POC_order"),
            (ENV_QUEUE_URL, "https://sqs.example/queue"),
            (ENV_MAX_BATCH_SIZE, "25"),
        ]))
        .expect("settings load");

        assert_eq!(settings.table_name, "orders-prod");
        assert_eq!(settings.payload_attribute, "POC_order");
        assert_eq!(
            settings.require_queue_url().expect("queue configured"),
            "https://sqs.example/queue"
        );
        assert_eq!(settings.max_batch_size, 25);
    }

    #[test]
    fn rejects_invalid_batch_size() {
        for raw in ["0", "ten"] {
            let error = RelaySettings::from_lookup(lookup_from(&[(ENV_MAX_BATCH_SIZE, raw)]))
                .expect_err("batch size should fail");
            assert_eq!(
                error.message(),
                format!("INGRESS_MAX_BATCH_SIZE must be a positive integer, got '{raw}'")
            );
        }
    }

    #[test]
    fn rejects_payload_attribute_that_collides_with_the_key() {
        let error = RelaySettings::from_lookup(lookup_from(&[(ENV_PAYLOAD_ATTRIBUTE, "orderID")]))
            .expect_err("key collision should fail");

        assert_eq!(
            error.message(),
            "ORDER_PAYLOAD_ATTRIBUTE must differ from orderID"
        );
    }
}
