//! OffsetFetch API types (key 9, version 3).

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 3;

pub fn request(group: &str, topic: &str, partition: i32) -> Request<OffsetFetchRequest> {
    let t = OffsetFetchRequestTopic {
        topic: topic.to_string(),
        partitions: vec![partition],
    };
    Request::new(
        api::OFFSET_FETCH,
        VERSION,
        OffsetFetchRequest {
            group_id: group.to_string(),
            topics: vec![t],
        },
    )
}

wire_struct! {
    pub struct OffsetFetchRequest {
        pub group_id: String,
        pub topics: Vec<OffsetFetchRequestTopic>,
    }
}

wire_struct! {
    pub struct OffsetFetchRequestTopic {
        pub topic: String,
        pub partitions: Vec<i32>,
    }
}

wire_struct! {
    pub struct OffsetFetchResponse {
        pub throttle_time_ms: i32,
        pub topics: Vec<OffsetFetchTopicResponse>,
        pub error_code: i16,
    }
}

wire_struct! {
    pub struct OffsetFetchTopicResponse {
        pub topic: String,
        pub partitions: Vec<OffsetFetchPartitionResponse>,
    }
}

wire_struct! {
    pub struct OffsetFetchPartitionResponse {
        pub partition: i32,
        pub offset: i64,
        pub metadata: String,
        pub error_code: i16,
    }
}
