//! OffsetCommit API types (key 8, version 2).

use std::collections::BTreeMap;

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 2;

/// Commit a single partition offset. `retention_ms` is how long the broker
/// retains the offset, -1 for the broker default.
pub fn request(
    group: &str,
    topic: &str,
    partition: i32,
    offset: i64,
    retention_ms: i64,
) -> Request<OffsetCommitRequest> {
    let mut offsets = BTreeMap::new();
    offsets.insert(partition, offset);
    request_multiple(group, topic, &offsets, retention_ms)
}

/// Commit offsets for multiple partitions of one topic at once.
pub fn request_multiple(
    group: &str,
    topic: &str,
    offsets: &BTreeMap<i32, i64>,
    retention_ms: i64,
) -> Request<OffsetCommitRequest> {
    let partitions = offsets
        .iter()
        .map(|(&partition, &offset)| OffsetCommitRequestPartition {
            partition,
            offset,
            metadata: String::new(),
        })
        .collect();
    let t = OffsetCommitRequestTopic {
        topic: topic.to_string(),
        partitions,
    };
    Request::new(
        api::OFFSET_COMMIT,
        VERSION,
        OffsetCommitRequest {
            group_id: group.to_string(),
            generation_id: -1,
            member_id: String::new(),
            retention_time_ms: retention_ms,
            topics: vec![t],
        },
    )
}

wire_struct! {
    pub struct OffsetCommitRequest {
        pub group_id: String,
        pub generation_id: i32,
        pub member_id: String,
        pub retention_time_ms: i64,
        pub topics: Vec<OffsetCommitRequestTopic>,
    }
}

wire_struct! {
    pub struct OffsetCommitRequestTopic {
        pub topic: String,
        pub partitions: Vec<OffsetCommitRequestPartition>,
    }
}

wire_struct! {
    pub struct OffsetCommitRequestPartition {
        pub partition: i32,
        pub offset: i64,
        pub metadata: String,
    }
}

wire_struct! {
    pub struct OffsetCommitResponse {
        pub topics: Vec<OffsetCommitTopicResponse>,
    }
}

wire_struct! {
    pub struct OffsetCommitTopicResponse {
        pub topic: String,
        pub partitions: Vec<OffsetCommitPartitionResponse>,
    }
}

wire_struct! {
    pub struct OffsetCommitPartitionResponse {
        pub partition: i32,
        pub error_code: i16,
    }
}
