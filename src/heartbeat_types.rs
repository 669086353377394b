//! Heartbeat API types (key 12, version 1).

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 1;

pub fn request(group: &str, member: &str, generation: i32) -> Request<HeartbeatRequest> {
    Request::new(
        api::HEARTBEAT,
        VERSION,
        HeartbeatRequest {
            group_id: group.to_string(),
            generation_id: generation,
            member_id: member.to_string(),
        },
    )
}

wire_struct! {
    pub struct HeartbeatRequest {
        pub group_id: String,
        pub generation_id: i32,
        pub member_id: String,
    }
}

wire_struct! {
    pub struct HeartbeatResponse {
        pub throttle_time_ms: i32,
        pub error_code: i16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    #[test]
    fn test_round_trip() {
        let req = request("g", "m", 4);
        let back: HeartbeatRequest = from_bytes(to_bytes(&req.body)).unwrap();
        assert_eq!(back, req.body);
        assert_eq!(back.generation_id, 4);
    }
}
