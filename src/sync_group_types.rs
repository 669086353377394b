//! SyncGroup API types (key 14, version 1).

use bytes::Bytes;

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 1;

pub fn request(
    group: &str,
    member: &str,
    generation: i32,
    assignments: Vec<SyncGroupAssignment>,
) -> Request<SyncGroupRequest> {
    Request::new(
        api::SYNC_GROUP,
        VERSION,
        SyncGroupRequest {
            group_id: group.to_string(),
            generation_id: generation,
            member_id: member.to_string(),
            assignments,
        },
    )
}

wire_struct! {
    pub struct SyncGroupRequest {
        pub group_id: String,
        pub generation_id: i32,
        pub member_id: String,
        pub assignments: Vec<SyncGroupAssignment>,
    }
}

wire_struct! {
    pub struct SyncGroupAssignment {
        pub member_id: String,
        pub assignment: Bytes,
    }
}

wire_struct! {
    pub struct SyncGroupResponse {
        pub throttle_time_ms: i32,
        pub error_code: i16,
        pub assignment: Bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    #[test]
    fn test_round_trip() {
        let resp = SyncGroupResponse {
            throttle_time_ms: 0,
            error_code: 0,
            assignment: Bytes::from_static(b"assignment"),
        };
        let back: SyncGroupResponse = from_bytes(to_bytes(&resp)).unwrap();
        assert_eq!(back, resp);
    }
}
