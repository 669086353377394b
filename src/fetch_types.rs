//! Fetch API types (key 1, versions 11 and 6).
//!
//! Version 11 is the default. Version 6 is the newest a Kafka 1.0 broker
//! accepts; it predates fetch sessions, leader epochs, and rack ids, so it
//! has its own body declarations. The partition client picks the variant
//! from the broker's negotiated versions.

use bytes::Bytes;

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 11;
pub const VERSION_V6: i16 = 6;

/// Per-call parameters for a single-partition fetch.
#[derive(Debug, Clone)]
pub struct FetchArgs {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Broker waits for this many bytes before responding, up to
    /// `max_wait_time_ms`.
    pub min_bytes: i32,
    pub max_bytes: i32,
    /// Must be smaller than the process request timeout.
    pub max_wait_time_ms: i32,
}

pub fn request(args: &FetchArgs) -> Request<FetchRequest> {
    let partition = FetchPartition {
        partition: args.partition,
        current_leader_epoch: -1,
        fetch_offset: args.offset,
        log_start_offset: 0,
        partition_max_bytes: args.max_bytes,
    };
    let topic = FetchTopic {
        topic: args.topic.clone(),
        partitions: vec![partition],
    };
    Request::new(
        api::FETCH,
        VERSION,
        FetchRequest {
            replica_id: -1,
            max_wait_time_ms: args.max_wait_time_ms,
            min_bytes: args.min_bytes,
            max_bytes: args.max_bytes,
            isolation_level: 0,
            session_id: 0,
            session_epoch: -1,
            topics: vec![topic],
            forgotten_topics: vec![],
            rack_id: String::new(),
        },
    )
}

pub fn request_v6(args: &FetchArgs) -> Request<FetchRequestV6> {
    let partition = FetchPartitionV6 {
        partition: args.partition,
        fetch_offset: args.offset,
        log_start_offset: 0,
        partition_max_bytes: args.max_bytes,
    };
    let topic = FetchTopicV6 {
        topic: args.topic.clone(),
        partitions: vec![partition],
    };
    Request::new(
        api::FETCH,
        VERSION_V6,
        FetchRequestV6 {
            replica_id: -1,
            max_wait_time_ms: args.max_wait_time_ms,
            min_bytes: args.min_bytes,
            max_bytes: args.max_bytes,
            isolation_level: 0,
            topics: vec![topic],
        },
    )
}

wire_struct! {
    pub struct FetchRequest {
        pub replica_id: i32,
        pub max_wait_time_ms: i32,
        pub min_bytes: i32,
        pub max_bytes: i32,
        pub isolation_level: i8,
        pub session_id: i32,
        pub session_epoch: i32,
        pub topics: Vec<FetchTopic>,
        pub forgotten_topics: Vec<ForgottenTopic>,
        pub rack_id: String,
    }
}

wire_struct! {
    pub struct FetchTopic {
        pub topic: String,
        pub partitions: Vec<FetchPartition>,
    }
}

wire_struct! {
    pub struct FetchPartition {
        pub partition: i32,
        pub current_leader_epoch: i32,
        pub fetch_offset: i64,
        pub log_start_offset: i64,
        pub partition_max_bytes: i32,
    }
}

wire_struct! {
    pub struct ForgottenTopic {
        pub topic: String,
        pub partitions: Vec<i32>,
    }
}

wire_struct! {
    pub struct FetchRequestV6 {
        pub replica_id: i32,
        pub max_wait_time_ms: i32,
        pub min_bytes: i32,
        pub max_bytes: i32,
        pub isolation_level: i8,
        pub topics: Vec<FetchTopicV6>,
    }
}

wire_struct! {
    pub struct FetchTopicV6 {
        pub topic: String,
        pub partitions: Vec<FetchPartitionV6>,
    }
}

wire_struct! {
    pub struct FetchPartitionV6 {
        pub partition: i32,
        pub fetch_offset: i64,
        pub log_start_offset: i64,
        pub partition_max_bytes: i32,
    }
}

wire_struct! {
    pub struct FetchResponse {
        pub throttle_time_ms: i32,
        pub error_code: i16,
        pub session_id: i32,
        pub responses: Vec<FetchTopicResponse>,
    }
}

wire_struct! {
    pub struct FetchTopicResponse {
        pub topic: String,
        pub partition_responses: Vec<FetchPartitionResponse>,
    }
}

wire_struct! {
    pub struct FetchPartitionResponse {
        pub partition: i32,
        pub error_code: i16,
        pub high_watermark: i64,
        pub last_stable_offset: i64,
        pub log_start_offset: i64,
        pub aborted_transactions: Vec<AbortedTransaction>,
        pub preferred_read_replica: i32,
        /// The record set, untouched. Batches sliced out of it share this
        /// buffer's backing.
        pub record_set: Bytes,
    }
}

wire_struct! {
    pub struct AbortedTransaction {
        pub producer_id: i64,
        pub first_offset: i64,
    }
}

wire_struct! {
    pub struct FetchResponseV6 {
        pub throttle_time_ms: i32,
        pub responses: Vec<FetchTopicResponseV6>,
    }
}

wire_struct! {
    pub struct FetchTopicResponseV6 {
        pub topic: String,
        pub partition_responses: Vec<FetchPartitionResponseV6>,
    }
}

wire_struct! {
    pub struct FetchPartitionResponseV6 {
        pub partition: i32,
        pub error_code: i16,
        pub high_watermark: i64,
        pub last_stable_offset: i64,
        pub log_start_offset: i64,
        pub aborted_transactions: Vec<AbortedTransaction>,
        pub record_set: Bytes,
    }
}

impl From<FetchResponseV6> for FetchResponse {
    fn from(v6: FetchResponseV6) -> FetchResponse {
        FetchResponse {
            throttle_time_ms: v6.throttle_time_ms,
            error_code: 0,
            session_id: 0,
            responses: v6
                .responses
                .into_iter()
                .map(|t| FetchTopicResponse {
                    topic: t.topic,
                    partition_responses: t
                        .partition_responses
                        .into_iter()
                        .map(|p| FetchPartitionResponse {
                            partition: p.partition,
                            error_code: p.error_code,
                            high_watermark: p.high_watermark,
                            last_stable_offset: p.last_stable_offset,
                            log_start_offset: p.log_start_offset,
                            aborted_transactions: p.aborted_transactions,
                            preferred_read_replica: -1,
                            record_set: p.record_set,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl FetchResponse {
    /// The first (and for this library, only) partition response.
    pub fn partition_response(&self) -> Option<&FetchPartitionResponse> {
        self.responses.first()?.partition_responses.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    #[test]
    fn test_response_round_trip() {
        let resp = FetchResponse {
            throttle_time_ms: 0,
            error_code: 0,
            session_id: 7,
            responses: vec![FetchTopicResponse {
                topic: "events".to_string(),
                partition_responses: vec![FetchPartitionResponse {
                    partition: 0,
                    error_code: 0,
                    high_watermark: 100,
                    last_stable_offset: 100,
                    log_start_offset: 0,
                    aborted_transactions: vec![],
                    preferred_read_replica: -1,
                    record_set: Bytes::from_static(b"recordsetbytes"),
                }],
            }],
        };
        let back: FetchResponse = from_bytes(to_bytes(&resp)).unwrap();
        assert_eq!(back, resp);
        assert_eq!(
            back.partition_response().unwrap().record_set,
            Bytes::from_static(b"recordsetbytes")
        );
    }

    #[test]
    fn test_v6_conversion() {
        let v6 = FetchResponseV6 {
            throttle_time_ms: 5,
            responses: vec![FetchTopicResponseV6 {
                topic: "t".to_string(),
                partition_responses: vec![FetchPartitionResponseV6 {
                    partition: 3,
                    error_code: 1,
                    high_watermark: 9,
                    last_stable_offset: 9,
                    log_start_offset: 0,
                    aborted_transactions: vec![],
                    record_set: Bytes::new(),
                }],
            }],
        };
        let resp: FetchResponse = v6.into();
        assert_eq!(resp.throttle_time_ms, 5);
        let p = resp.partition_response().unwrap();
        assert_eq!(p.partition, 3);
        assert_eq!(p.preferred_read_replica, -1);
    }

    #[test]
    fn test_request_defaults() {
        let args = FetchArgs {
            topic: "t".to_string(),
            partition: 0,
            offset: 42,
            min_bytes: 1,
            max_bytes: 1 << 20,
            max_wait_time_ms: 500,
        };
        let req = request(&args);
        assert_eq!(req.api_version, 11);
        assert_eq!(req.body.replica_id, -1);
        assert_eq!(req.body.session_epoch, -1);
        assert_eq!(req.body.topics[0].partitions[0].fetch_offset, 42);

        let req6 = request_v6(&args);
        assert_eq!(req6.api_version, 6);
        assert_eq!(req6.body.topics[0].partitions[0].fetch_offset, 42);
    }
}
