//! Produce API types (key 0, version 7, downgraded to 5 for 1.0 brokers).
//!
//! The request body layout is identical across versions 3 through 7, so the
//! downgrade only rewrites the version number in the envelope.

use bytes::Bytes;

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 7;

/// Per-call parameters for a single-partition produce.
#[derive(Debug, Clone)]
pub struct ProduceArgs {
    pub topic: String,
    pub partition: i32,
    /// 0: no acks, 1: leader only, -1: all in-sync replicas.
    pub acks: i16,
    pub timeout_ms: i32,
}

pub fn request(args: &ProduceArgs, record_set: Bytes) -> Request<ProduceRequest> {
    let data = ProducePartitionData {
        partition: args.partition,
        record_set,
    };
    let topic_data = ProduceTopicData {
        topic: args.topic.clone(),
        data: vec![data],
    };
    Request::new(
        api::PRODUCE,
        VERSION,
        ProduceRequest {
            transactional_id: String::new(),
            acks: args.acks,
            timeout_ms: args.timeout_ms,
            topic_data: vec![topic_data],
        },
    )
}

wire_struct! {
    pub struct ProduceRequest {
        pub transactional_id: String,
        pub acks: i16,
        pub timeout_ms: i32,
        pub topic_data: Vec<ProduceTopicData>,
    }
}

wire_struct! {
    pub struct ProduceTopicData {
        pub topic: String,
        pub data: Vec<ProducePartitionData>,
    }
}

wire_struct! {
    pub struct ProducePartitionData {
        pub partition: i32,
        pub record_set: Bytes,
    }
}

wire_struct! {
    pub struct ProduceResponse {
        pub responses: Vec<ProduceTopicResponse>,
        pub throttle_time_ms: i32,
    }
}

wire_struct! {
    pub struct ProduceTopicResponse {
        pub topic: String,
        pub partition_responses: Vec<ProducePartitionResponse>,
    }
}

wire_struct! {
    pub struct ProducePartitionResponse {
        pub partition: i32,
        pub error_code: i16,
        pub base_offset: i64,
        pub log_append_time: i64,
        pub log_start_offset: i64,
    }
}
