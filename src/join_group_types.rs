//! JoinGroup API types (key 11, version 2).
//!
//! See the Kafka client-side assignment proposal for how the join, sync,
//! and heartbeat calls fit together.

use bytes::Bytes;

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 2;

/// If no heartbeat arrives within the session timeout the member is
/// evicted and the group rebalances.
pub const DEFAULT_SESSION_TIMEOUT_MS: i32 = 10_000;
/// How long the coordinator waits for members to join.
pub const DEFAULT_REBALANCE_TIMEOUT_MS: i32 = 5_000;

pub fn request(
    group: &str,
    member: &str,
    protocol_type: &str,
    protocols: Vec<JoinGroupProtocol>,
) -> Request<JoinGroupRequest> {
    Request::new(
        api::JOIN_GROUP,
        VERSION,
        JoinGroupRequest {
            group_id: group.to_string(),
            session_timeout_ms: DEFAULT_SESSION_TIMEOUT_MS,
            rebalance_timeout_ms: DEFAULT_REBALANCE_TIMEOUT_MS,
            member_id: member.to_string(),
            protocol_type: protocol_type.to_string(),
            protocols,
        },
    )
}

wire_struct! {
    pub struct JoinGroupRequest {
        pub group_id: String,
        pub session_timeout_ms: i32,
        pub rebalance_timeout_ms: i32,
        pub member_id: String,
        pub protocol_type: String,
        pub protocols: Vec<JoinGroupProtocol>,
    }
}

wire_struct! {
    pub struct JoinGroupProtocol {
        pub name: String,
        pub metadata: Bytes,
    }
}

wire_struct! {
    pub struct JoinGroupResponse {
        pub throttle_time_ms: i32,
        pub error_code: i16,
        pub generation_id: i32,
        pub protocol_name: String,
        pub leader_id: String,
        pub member_id: String,
        pub members: Vec<JoinGroupMember>,
    }
}

wire_struct! {
    pub struct JoinGroupMember {
        pub member_id: String,
        pub metadata: Bytes,
    }
}

impl JoinGroupResponse {
    /// True when this member was elected the group leader.
    pub fn is_leader(&self) -> bool {
        !self.member_id.is_empty() && self.member_id == self.leader_id
    }
}
