//! A scripted in-process broker for client tests.
//!
//! Speaks just enough of the protocol to serve connection lifecycle,
//! version negotiation, and error mapping scenarios without a real
//! cluster. Each accepted connection is served on its own thread until the
//! peer hangs up, which is also how the broker simulates a dropped
//! connection.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;

use kafkawire::api;
use kafkawire::api_versions_types::{ApiKeyVersion, ApiVersionsResponse};
use kafkawire::create_topics_types::{
    CreateTopicsRequest, CreateTopicsResponse, CreateTopicsTopicResponse,
};
use kafkawire::error_codes;
use kafkawire::fetch_types::{
    FetchPartitionResponse, FetchRequest, FetchResponse, FetchTopicResponse,
};
use kafkawire::find_coordinator_types::FindCoordinatorResponse;
use kafkawire::heartbeat_types::HeartbeatResponse;
use kafkawire::join_group_types::{JoinGroupRequest, JoinGroupResponse};
use kafkawire::list_offsets_types::{
    ListOffsetsPartitionResponse, ListOffsetsRequest, ListOffsetsResponse,
    ListOffsetsTopicResponse,
};
use kafkawire::metadata_types::{
    Broker, MetadataRequest, MetadataResponse, PartitionMetadata, TopicMetadata,
};
use kafkawire::offset_commit_types::{
    OffsetCommitPartitionResponse, OffsetCommitRequest, OffsetCommitResponse,
    OffsetCommitTopicResponse,
};
use kafkawire::offset_fetch_types::{
    OffsetFetchPartitionResponse, OffsetFetchRequest, OffsetFetchResponse,
    OffsetFetchTopicResponse,
};
use kafkawire::produce_types::{
    ProducePartitionResponse, ProduceRequest, ProduceResponse, ProduceTopicResponse,
};
use kafkawire::sync_group_types::{SyncGroupRequest, SyncGroupResponse};
use kafkawire::wire::{Decoder, Encoder, WireRead, WireWrite};

#[derive(Default)]
pub struct BrokerState {
    pub port: u16,
    pub produce_max: i16,
    pub fetch_max: i16,
    pub commit_error: i16,
    pub produce_versions: Mutex<Vec<i16>>,
    pub offsets: Mutex<BTreeMap<(String, i32), i64>>,
    pub topics: Mutex<HashSet<String>>,
    pub record_set: Mutex<Bytes>,
    pub drop_next_list_offsets: AtomicBool,
}

pub struct MockBroker {
    pub state: Arc<BrokerState>,
}

impl MockBroker {
    pub fn start() -> MockBroker {
        Self::start_with(7, 11, 0)
    }

    pub fn start_with(produce_max: i16, fetch_max: i16, commit_error: i16) -> MockBroker {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(BrokerState {
            port,
            produce_max,
            fetch_max,
            commit_error,
            ..BrokerState::default()
        });
        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for conn in listener.incoming() {
                let Ok(conn) = conn else { return };
                let state = Arc::clone(&accept_state);
                thread::spawn(move || serve(conn, state));
            }
        });
        MockBroker { state }
    }

    pub fn bootstrap(&self) -> String {
        format!("127.0.0.1:{}", self.state.port)
    }
}

fn serve(mut conn: TcpStream, state: Arc<BrokerState>) {
    loop {
        let mut len_buf = [0u8; 4];
        if conn.read_exact(&mut len_buf).is_err() {
            return; // client hung up
        }
        let len = i32::from_be_bytes(len_buf) as usize;
        let mut frame = vec![0u8; len];
        if conn.read_exact(&mut frame).is_err() {
            return;
        }
        let mut body = Bytes::from(frame);
        let mut d = Decoder::new(&mut body);
        let api_key = d.read_i16().unwrap();
        let api_version = d.read_i16().unwrap();
        let correlation_id = d.read_i32().unwrap();
        let _client_id = d.read_string().unwrap();

        match api_key {
            api::API_VERSIONS => {
                let resp = api_versions_response(&state);
                respond(&mut conn, correlation_id, &resp);
            }
            api::METADATA => {
                let req = MetadataRequest::read(&mut d).unwrap();
                let resp = metadata_response(&state, &req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::LIST_OFFSETS => {
                if state.drop_next_list_offsets.swap(false, Ordering::SeqCst) {
                    return; // simulate the broker dropping the connection
                }
                let req = ListOffsetsRequest::read(&mut d).unwrap();
                let resp = list_offsets_response(&req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::PRODUCE => {
                state.produce_versions.lock().push(api_version);
                let req = ProduceRequest::read(&mut d).unwrap();
                let resp = produce_response(&req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::FETCH => {
                assert_eq!(api_version, 11, "mock broker only parses fetch v11");
                let req = FetchRequest::read(&mut d).unwrap();
                let resp = fetch_response(&state, &req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::FIND_COORDINATOR => {
                let resp = FindCoordinatorResponse {
                    throttle_time_ms: 0,
                    error_code: 0,
                    error_message: String::new(),
                    node_id: 0,
                    host: "127.0.0.1".to_string(),
                    port: i32::from(state.port),
                };
                respond(&mut conn, correlation_id, &resp);
            }
            api::OFFSET_COMMIT => {
                let req = OffsetCommitRequest::read(&mut d).unwrap();
                let resp = offset_commit_response(&state, &req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::OFFSET_FETCH => {
                let req = OffsetFetchRequest::read(&mut d).unwrap();
                let resp = offset_fetch_response(&state, &req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::CREATE_TOPICS => {
                let req = CreateTopicsRequest::read(&mut d).unwrap();
                let resp = create_topics_response(&state, &req);
                respond(&mut conn, correlation_id, &resp);
            }
            api::JOIN_GROUP => {
                let req = JoinGroupRequest::read(&mut d).unwrap();
                let member_id = if req.member_id.is_empty() {
                    "member-1".to_string()
                } else {
                    req.member_id.clone()
                };
                let resp = JoinGroupResponse {
                    throttle_time_ms: 0,
                    error_code: 0,
                    generation_id: 1,
                    protocol_name: req
                        .protocols
                        .first()
                        .map(|p| p.name.clone())
                        .unwrap_or_default(),
                    leader_id: member_id.clone(),
                    member_id,
                    members: vec![],
                };
                respond(&mut conn, correlation_id, &resp);
            }
            api::SYNC_GROUP => {
                let req = SyncGroupRequest::read(&mut d).unwrap();
                let resp = SyncGroupResponse {
                    throttle_time_ms: 0,
                    error_code: 0,
                    assignment: req
                        .assignments
                        .first()
                        .map(|a| a.assignment.clone())
                        .unwrap_or_default(),
                };
                respond(&mut conn, correlation_id, &resp);
            }
            api::HEARTBEAT => {
                let resp = HeartbeatResponse {
                    throttle_time_ms: 0,
                    error_code: 0,
                };
                respond(&mut conn, correlation_id, &resp);
            }
            other => panic!("mock broker got unexpected api key {}", other),
        }
    }
}

fn respond<R: WireWrite>(conn: &mut TcpStream, correlation_id: i32, resp: &R) {
    let mut payload = BytesMut::new();
    let mut e = Encoder::new(&mut payload);
    e.write_i32(correlation_id);
    resp.write(&mut e);
    let mut framed = BytesMut::new();
    let mut e = Encoder::new(&mut framed);
    e.write_i32(payload.len() as i32);
    framed.extend_from_slice(&payload);
    conn.write_all(&framed).unwrap();
}

fn api_versions_response(state: &BrokerState) -> ApiVersionsResponse {
    let versions = [
        (api::PRODUCE, state.produce_max),
        (api::FETCH, state.fetch_max),
        (api::LIST_OFFSETS, 2),
        (api::METADATA, 5),
        (api::OFFSET_COMMIT, 2),
        (api::OFFSET_FETCH, 3),
        (api::FIND_COORDINATOR, 1),
        (api::JOIN_GROUP, 2),
        (api::HEARTBEAT, 1),
        (api::SYNC_GROUP, 1),
        (api::API_VERSIONS, 0),
        (api::CREATE_TOPICS, 2),
    ];
    ApiVersionsResponse {
        error_code: 0,
        api_keys: versions
            .iter()
            .map(|&(api_key, max_version)| ApiKeyVersion {
                api_key,
                min_version: 0,
                max_version,
            })
            .collect(),
    }
}

fn metadata_response(state: &BrokerState, req: &MetadataRequest) -> MetadataResponse {
    MetadataResponse {
        throttle_time_ms: 0,
        brokers: vec![Broker {
            node_id: 0,
            host: "127.0.0.1".to_string(),
            port: i32::from(state.port),
            rack: String::new(),
        }],
        cluster_id: "mock".to_string(),
        controller_id: 0,
        topic_metadata: req
            .topics
            .iter()
            .map(|topic| TopicMetadata {
                error_code: 0,
                topic: topic.clone(),
                is_internal: false,
                partition_metadata: vec![PartitionMetadata {
                    error_code: 0,
                    partition: 0,
                    leader: 0,
                    replicas: vec![0],
                    isr: vec![0],
                    offline_replicas: vec![],
                }],
            })
            .collect(),
    }
}

fn list_offsets_response(req: &ListOffsetsRequest) -> ListOffsetsResponse {
    let t = &req.topics[0];
    ListOffsetsResponse {
        throttle_time_ms: 0,
        responses: vec![ListOffsetsTopicResponse {
            topic: t.topic.clone(),
            partitions: vec![ListOffsetsPartitionResponse {
                partition: t.partitions[0].partition,
                error_code: 0,
                timestamp: -1,
                offset: 0,
            }],
        }],
    }
}

fn produce_response(req: &ProduceRequest) -> ProduceResponse {
    let t = &req.topic_data[0];
    let error_code = if req.acks != 0 && req.acks != 1 && req.acks != -1 {
        error_codes::INVALID_REQUIRED_ACKS
    } else {
        error_codes::NONE
    };
    ProduceResponse {
        responses: vec![ProduceTopicResponse {
            topic: t.topic.clone(),
            partition_responses: vec![ProducePartitionResponse {
                partition: t.data[0].partition,
                error_code,
                base_offset: 0,
                log_append_time: -1,
                log_start_offset: 0,
            }],
        }],
        throttle_time_ms: 0,
    }
}

fn fetch_response(state: &BrokerState, req: &FetchRequest) -> FetchResponse {
    let t = &req.topics[0];
    FetchResponse {
        throttle_time_ms: 0,
        error_code: 0,
        session_id: 0,
        responses: vec![FetchTopicResponse {
            topic: t.topic.clone(),
            partition_responses: vec![FetchPartitionResponse {
                partition: t.partitions[0].partition,
                error_code: 0,
                high_watermark: 3,
                last_stable_offset: 3,
                log_start_offset: 0,
                aborted_transactions: vec![],
                preferred_read_replica: -1,
                record_set: state.record_set.lock().clone(),
            }],
        }],
    }
}

fn offset_commit_response(state: &BrokerState, req: &OffsetCommitRequest) -> OffsetCommitResponse {
    let t = &req.topics[0];
    let partitions = t
        .partitions
        .iter()
        .map(|p| {
            if state.commit_error == 0 {
                state
                    .offsets
                    .lock()
                    .insert((t.topic.clone(), p.partition), p.offset);
            }
            OffsetCommitPartitionResponse {
                partition: p.partition,
                error_code: state.commit_error,
            }
        })
        .collect();
    OffsetCommitResponse {
        topics: vec![OffsetCommitTopicResponse {
            topic: t.topic.clone(),
            partitions,
        }],
    }
}

fn offset_fetch_response(state: &BrokerState, req: &OffsetFetchRequest) -> OffsetFetchResponse {
    let t = &req.topics[0];
    let partitions = t
        .partitions
        .iter()
        .map(|&partition| OffsetFetchPartitionResponse {
            partition,
            offset: state
                .offsets
                .lock()
                .get(&(t.topic.clone(), partition))
                .copied()
                .unwrap_or(-1),
            metadata: String::new(),
            error_code: 0,
        })
        .collect();
    OffsetFetchResponse {
        throttle_time_ms: 0,
        topics: vec![OffsetFetchTopicResponse {
            topic: t.topic.clone(),
            partitions,
        }],
        error_code: 0,
    }
}

fn create_topics_response(state: &BrokerState, req: &CreateTopicsRequest) -> CreateTopicsResponse {
    let t = &req.topics[0];
    let error_code = if t.replication_factor > 1 {
        error_codes::INVALID_REPLICATION_FACTOR
    } else if !state.topics.lock().insert(t.topic.clone()) {
        error_codes::TOPIC_ALREADY_EXISTS
    } else {
        error_codes::NONE
    };
    CreateTopicsResponse {
        throttle_time_ms: 0,
        topics: vec![CreateTopicsTopicResponse {
            topic: t.topic.clone(),
            error_code,
            error_message: String::new(),
        }],
    }
}
