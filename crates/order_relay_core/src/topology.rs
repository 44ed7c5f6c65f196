//! Deployment settings the relays rely on.
//!
//! Provisioning happens elsewhere; this is the typed record of what it must
//! configure so the relay behavior holds (batching, stream view, redrive).

use serde::{Deserialize, Serialize};

use crate::config::RelaySettings;
use crate::contract::ORDER_ID_ATTRIBUTE;

pub const QUEUE_VISIBILITY_TIMEOUT_SECS: u64 = 300;
pub const STREAM_BATCH_SIZE: usize = 10;
pub const STREAM_RETRY_ATTEMPTS: u32 = 3;
pub const STREAM_VIEW_TYPE: &str = "OLD_IMAGE";
pub const STREAM_STARTING_POSITION: &str = "TRIM_HORIZON";

const LOG_ACTIONS: [&str; 3] = [
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelayRole {
    Ingress,
    Change,
    Gateway,
}

impl RelayRole {
    pub const ALL: [RelayRole; 3] = [Self::Ingress, Self::Change, Self::Gateway];

    pub fn actions(self) -> Vec<&'static str> {
        let mut actions = match self {
            Self::Ingress => vec![
                "dynamodb:PutItem",
                "dynamodb:DescribeTable",
                "sqs:ReceiveMessage",
                "sqs:DeleteMessage",
                "sqs:GetQueueAttributes",
                "sqs:GetQueueUrl",
            ],
            Self::Change => vec![
                "dynamodb:GetShardIterator",
                "dynamodb:DescribeStream",
                "dynamodb:ListStreams",
                "dynamodb:GetRecords",
                "sns:Publish",
                "sns:GetTopicAttributes",
                "sns:ListTopics",
            ],
            Self::Gateway => return vec!["sqs:SendMessage", "sqs:GetQueueUrl"],
        };
        actions.extend(LOG_ACTIONS);
        actions
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueTopology {
    pub visibility_timeout_secs: u64,
    pub consumer_batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableTopology {
    pub table_name: String,
    pub partition_key: String,
    pub stream_view_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamBindingTopology {
    pub batch_size: usize,
    pub starting_position: String,
    pub retry_attempts: u32,
    pub bisect_batch_on_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicTopology {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subscriber: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: RelayRole,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayTopology {
    pub queue: QueueTopology,
    pub table: TableTopology,
    pub stream_binding: StreamBindingTopology,
    pub topic: TopicTopology,
    pub roles: Vec<RoleGrant>,
}

impl RelayTopology {
    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self {
            queue: QueueTopology {
                visibility_timeout_secs: QUEUE_VISIBILITY_TIMEOUT_SECS,
                consumer_batch_size: settings.max_batch_size,
            },
            table: TableTopology {
                table_name: settings.table_name.clone(),
                partition_key: ORDER_ID_ATTRIBUTE.to_string(),
                stream_view_type: STREAM_VIEW_TYPE.to_string(),
            },
            stream_binding: StreamBindingTopology {
                batch_size: STREAM_BATCH_SIZE,
                starting_position: STREAM_STARTING_POSITION.to_string(),
                retry_attempts: STREAM_RETRY_ATTEMPTS,
                bisect_batch_on_error: true,
            },
            topic: TopicTopology {
                email_subscriber: settings.notification_email.clone(),
            },
            roles: RelayRole::ALL
                .into_iter()
                .map(|role| RoleGrant {
                    role,
                    actions: role.actions().into_iter().map(str::to_string).collect(),
                })
                .collect(),
        }
    }

    pub fn grant(&self, role: RelayRole) -> Option<&RoleGrant> {
        self.roles.iter().find(|grant| grant.role == role)
    }
}
