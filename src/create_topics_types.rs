//! CreateTopics API types (key 19, version 2).

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 2;

pub fn request(
    topic: &str,
    num_partitions: i32,
    replication_factor: i16,
    configs: Vec<CreateTopicsConfig>,
) -> Request<CreateTopicsRequest> {
    let t = CreateTopicsTopic {
        topic: topic.to_string(),
        num_partitions,
        replication_factor,
        assignments: vec![],
        configs,
    };
    Request::new(
        api::CREATE_TOPICS,
        VERSION,
        CreateTopicsRequest {
            topics: vec![t],
            timeout_ms: 1000,
            validate_only: false,
        },
    )
}

wire_struct! {
    pub struct CreateTopicsRequest {
        pub topics: Vec<CreateTopicsTopic>,
        pub timeout_ms: i32,
        pub validate_only: bool,
    }
}

wire_struct! {
    pub struct CreateTopicsTopic {
        pub topic: String,
        pub num_partitions: i32,
        pub replication_factor: i16,
        pub assignments: Vec<CreateTopicsAssignment>,
        pub configs: Vec<CreateTopicsConfig>,
    }
}

wire_struct! {
    pub struct CreateTopicsAssignment {
        pub partition: i32,
        pub broker_ids: Vec<i32>,
    }
}

wire_struct! {
    /// Topic config override, e.g. `message.timestamp.type` =
    /// `LogAppendTime`.
    pub struct CreateTopicsConfig {
        pub name: String,
        pub value: String,
    }
}

wire_struct! {
    pub struct CreateTopicsResponse {
        pub throttle_time_ms: i32,
        pub topics: Vec<CreateTopicsTopicResponse>,
    }
}

wire_struct! {
    pub struct CreateTopicsTopicResponse {
        pub topic: String,
        pub error_code: i16,
        pub error_message: String,
    }
}
