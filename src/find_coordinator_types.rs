//! FindCoordinator API types (key 10, version 1).

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 1;

pub const COORDINATOR_GROUP: i8 = 0;
pub const COORDINATOR_TRANSACTION: i8 = 1;

pub fn request(group_id: &str) -> Request<FindCoordinatorRequest> {
    Request::new(
        api::FIND_COORDINATOR,
        VERSION,
        FindCoordinatorRequest {
            key: group_id.to_string(),
            key_type: COORDINATOR_GROUP,
        },
    )
}

wire_struct! {
    pub struct FindCoordinatorRequest {
        pub key: String,
        pub key_type: i8,
    }
}

wire_struct! {
    pub struct FindCoordinatorResponse {
        pub throttle_time_ms: i32,
        pub error_code: i16,
        pub error_message: String,
        pub node_id: i32,
        pub host: String,
        pub port: i32,
    }
}

impl FindCoordinatorResponse {
    /// Coordinator `host:port`, suitable for dialing.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    #[test]
    fn test_round_trip() {
        let resp = FindCoordinatorResponse {
            throttle_time_ms: 0,
            error_code: 0,
            error_message: String::new(),
            node_id: 3,
            host: "coordinator".to_string(),
            port: 9092,
        };
        let back: FindCoordinatorResponse = from_bytes(to_bytes(&resp)).unwrap();
        assert_eq!(back, resp);
        assert_eq!(back.addr(), "coordinator:9092");
    }
}
