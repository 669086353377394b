//! ListOffsets API types (key 2, version 2).

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 2;

/// Timestamp sentinel for the next offset to be written.
pub const LATEST_TIMESTAMP: i64 = -1;
/// Timestamp sentinel for the oldest retained offset.
pub const EARLIEST_TIMESTAMP: i64 = -2;

/// `timestamp_ms` is milliseconds since epoch, or one of the sentinels.
pub fn request(topic: &str, partition: i32, timestamp_ms: i64) -> Request<ListOffsetsRequest> {
    let p = ListOffsetsRequestPartition {
        partition,
        timestamp: timestamp_ms,
    };
    let t = ListOffsetsRequestTopic {
        topic: topic.to_string(),
        partitions: vec![p],
    };
    Request::new(
        api::LIST_OFFSETS,
        VERSION,
        ListOffsetsRequest {
            replica_id: -1,
            isolation_level: 0,
            topics: vec![t],
        },
    )
}

wire_struct! {
    pub struct ListOffsetsRequest {
        pub replica_id: i32,
        pub isolation_level: i8,
        pub topics: Vec<ListOffsetsRequestTopic>,
    }
}

wire_struct! {
    pub struct ListOffsetsRequestTopic {
        pub topic: String,
        pub partitions: Vec<ListOffsetsRequestPartition>,
    }
}

wire_struct! {
    pub struct ListOffsetsRequestPartition {
        pub partition: i32,
        pub timestamp: i64,
    }
}

wire_struct! {
    pub struct ListOffsetsResponse {
        pub throttle_time_ms: i32,
        pub responses: Vec<ListOffsetsTopicResponse>,
    }
}

wire_struct! {
    pub struct ListOffsetsTopicResponse {
        pub topic: String,
        pub partitions: Vec<ListOffsetsPartitionResponse>,
    }
}

wire_struct! {
    pub struct ListOffsetsPartitionResponse {
        pub partition: i32,
        pub error_code: i16,
        pub timestamp: i64,
        pub offset: i64,
    }
}

impl ListOffsetsResponse {
    /// Offset for the topic partition, or -1 when the response has none.
    pub fn offset(&self, topic: &str, partition: i32) -> i64 {
        self.partition_response(topic, partition)
            .map(|p| p.offset)
            .unwrap_or(-1)
    }

    pub fn partition_response(
        &self,
        topic: &str,
        partition: i32,
    ) -> Option<&ListOffsetsPartitionResponse> {
        self.responses
            .iter()
            .filter(|t| t.topic == topic)
            .flat_map(|t| t.partitions.iter())
            .find(|p| p.partition == partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    #[test]
    fn test_round_trip_and_lookup() {
        let resp = ListOffsetsResponse {
            throttle_time_ms: 0,
            responses: vec![ListOffsetsTopicResponse {
                topic: "events".to_string(),
                partitions: vec![ListOffsetsPartitionResponse {
                    partition: 1,
                    error_code: 0,
                    timestamp: -1,
                    offset: 1042,
                }],
            }],
        };
        let back: ListOffsetsResponse = from_bytes(to_bytes(&resp)).unwrap();
        assert_eq!(back, resp);
        assert_eq!(back.offset("events", 1), 1042);
        assert_eq!(back.offset("events", 2), -1);
        assert_eq!(back.offset("other", 1), -1);
    }
}
