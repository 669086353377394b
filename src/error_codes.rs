//! Kafka protocol error codes.
//!
//! Standard error codes from the Kafka protocol specification.
//! See: https://kafka.apache.org/protocol#protocol_error_codes

/// The server experienced an unexpected error
pub const UNKNOWN_SERVER_ERROR: i16 = -1;

/// No error occurred
pub const NONE: i16 = 0;

/// The requested offset is out of range
pub const OFFSET_OUT_OF_RANGE: i16 = 1;

/// The message contents do not match the CRC
pub const CORRUPT_MESSAGE: i16 = 2;

/// This server does not host this topic-partition
pub const UNKNOWN_TOPIC_OR_PARTITION: i16 = 3;

/// The requested fetch size is invalid
pub const INVALID_FETCH_SIZE: i16 = 4;

/// There is no leader for this topic-partition
pub const LEADER_NOT_AVAILABLE: i16 = 5;

/// This server is not the leader for that topic-partition
pub const NOT_LEADER_FOR_PARTITION: i16 = 6;

/// The request timed out
pub const REQUEST_TIMED_OUT: i16 = 7;

/// The broker is not available
pub const BROKER_NOT_AVAILABLE: i16 = 8;

/// The replica is not available for the requested topic-partition
pub const REPLICA_NOT_AVAILABLE: i16 = 9;

/// The request included a message larger than the max message size the server will accept
pub const MESSAGE_TOO_LARGE: i16 = 10;

/// The controller moved to another broker
pub const STALE_CONTROLLER_EPOCH: i16 = 11;

/// The committing offset data size is not valid
pub const OFFSET_METADATA_TOO_LARGE: i16 = 12;

/// The server disconnected before a response was received
pub const NETWORK_EXCEPTION: i16 = 13;

/// The coordinator is loading and hence can't process requests
pub const COORDINATOR_LOAD_IN_PROGRESS: i16 = 14;

/// The coordinator is not available
pub const COORDINATOR_NOT_AVAILABLE: i16 = 15;

/// This is not the correct coordinator
pub const NOT_COORDINATOR: i16 = 16;

/// The request attempted to perform an operation on an invalid topic
pub const INVALID_TOPIC_EXCEPTION: i16 = 17;

/// The request included message batch larger than the configured segment size on the server
pub const RECORD_LIST_TOO_LARGE: i16 = 18;

/// Messages are rejected since there are fewer in-sync replicas than required
pub const NOT_ENOUGH_REPLICAS: i16 = 19;

/// Messages are written to the log, but to fewer in-sync replicas than required
pub const NOT_ENOUGH_REPLICAS_AFTER_APPEND: i16 = 20;

/// Produce request specified an invalid value for required acks
pub const INVALID_REQUIRED_ACKS: i16 = 21;

/// Specified group generation id is not valid
pub const ILLEGAL_GENERATION: i16 = 22;

/// The group member's supported protocols are incompatible with those of existing members
pub const INCONSISTENT_GROUP_PROTOCOL: i16 = 23;

/// The configured groupId is invalid
pub const INVALID_GROUP_ID: i16 = 24;

/// The coordinator is not aware of this member
pub const UNKNOWN_MEMBER_ID: i16 = 25;

/// The session timeout is not within the range allowed by the broker
pub const INVALID_SESSION_TIMEOUT: i16 = 26;

/// The group is rebalancing, so a rejoin is needed
pub const REBALANCE_IN_PROGRESS: i16 = 27;

/// The committing offset data size is not valid
pub const INVALID_COMMIT_OFFSET_SIZE: i16 = 28;

/// Not authorized to access topics
pub const TOPIC_AUTHORIZATION_FAILED: i16 = 29;

/// Not authorized to access group
pub const GROUP_AUTHORIZATION_FAILED: i16 = 30;

/// Cluster authorization failed
pub const CLUSTER_AUTHORIZATION_FAILED: i16 = 31;

/// The timestamp of the message is out of acceptable range
pub const INVALID_TIMESTAMP: i16 = 32;

/// The broker does not support the requested SASL mechanism
pub const UNSUPPORTED_SASL_MECHANISM: i16 = 33;

/// Request is not valid given the current SASL state
pub const ILLEGAL_SASL_STATE: i16 = 34;

/// The version of API is not supported
pub const UNSUPPORTED_VERSION: i16 = 35;

/// Topic with this name already exists
pub const TOPIC_ALREADY_EXISTS: i16 = 36;

/// Number of partitions is below 1
pub const INVALID_PARTITIONS: i16 = 37;

/// Replication factor is below 1 or larger than the number of available brokers
pub const INVALID_REPLICATION_FACTOR: i16 = 38;

/// Replica assignment is invalid
pub const INVALID_REPLICA_ASSIGNMENT: i16 = 39;

/// Configuration is invalid
pub const INVALID_CONFIG: i16 = 40;

/// This is not the correct controller for this cluster
pub const NOT_CONTROLLER: i16 = 41;

/// The request was malformed or omitted required fields
pub const INVALID_REQUEST: i16 = 42;

/// The message format version on the broker does not support the request
pub const UNSUPPORTED_FOR_MESSAGE_FORMAT: i16 = 43;

/// Request parameters do not satisfy the configured policy
pub const POLICY_VIOLATION: i16 = 44;

/// The broker received an out of order sequence number
pub const OUT_OF_ORDER_SEQUENCE_NUMBER: i16 = 45;

/// The broker received a duplicate sequence number
pub const DUPLICATE_SEQUENCE_NUMBER: i16 = 46;

/// Producer attempted an operation with an old epoch
pub const INVALID_PRODUCER_EPOCH: i16 = 47;

/// The producer attempted a transactional operation in an invalid state
pub const INVALID_TXN_STATE: i16 = 48;

/// The producer attempted to use a producer id which is not currently assigned to its transactional id
pub const INVALID_PRODUCER_ID_MAPPING: i16 = 49;

/// The transaction timeout is larger than the maximum value allowed by the broker
pub const INVALID_TRANSACTION_TIMEOUT: i16 = 50;

/// The producer attempted to update a transaction while another concurrent operation on the same transaction was ongoing
pub const CONCURRENT_TRANSACTIONS: i16 = 51;

/// There is a newer producer with the same transactional id which fences the current one
pub const TRANSACTION_COORDINATOR_FENCED: i16 = 52;

/// Transactional id authorization failed
pub const TRANSACTIONAL_ID_AUTHORIZATION_FAILED: i16 = 53;

/// Security features are disabled
pub const SECURITY_DISABLED: i16 = 54;

/// The broker did not attempt to execute this operation
pub const OPERATION_NOT_ATTEMPTED: i16 = 55;

/// Disk error when trying to access log file on the disk
pub const KAFKA_STORAGE_ERROR: i16 = 56;

/// The user-specified log directory is not found in the broker config
pub const LOG_DIR_NOT_FOUND: i16 = 57;

/// SASL authentication failed
pub const SASL_AUTHENTICATION_FAILED: i16 = 58;

/// The broker could not locate the producer metadata associated with the producer id
pub const UNKNOWN_PRODUCER_ID: i16 = 59;

/// A partition reassignment is in progress
pub const REASSIGNMENT_IN_PROGRESS: i16 = 60;

/// The fetch session id was not found
pub const FETCH_SESSION_ID_NOT_FOUND: i16 = 70;

/// The fetch session epoch is invalid
pub const INVALID_FETCH_SESSION_EPOCH: i16 = 71;

/// The leader epoch in the request is older than the epoch on the broker
pub const FENCED_LEADER_EPOCH: i16 = 74;

/// The leader epoch in the request is newer than the epoch on the broker
pub const UNKNOWN_LEADER_EPOCH: i16 = 75;

/// The requesting client does not support the compression type of given partition
pub const UNSUPPORTED_COMPRESSION_TYPE: i16 = 76;

/// Canonical name for a Kafka error code.
pub fn name(code: i16) -> &'static str {
    match code {
        UNKNOWN_SERVER_ERROR => "UNKNOWN_SERVER_ERROR",
        NONE => "NONE",
        OFFSET_OUT_OF_RANGE => "OFFSET_OUT_OF_RANGE",
        CORRUPT_MESSAGE => "CORRUPT_MESSAGE",
        UNKNOWN_TOPIC_OR_PARTITION => "UNKNOWN_TOPIC_OR_PARTITION",
        INVALID_FETCH_SIZE => "INVALID_FETCH_SIZE",
        LEADER_NOT_AVAILABLE => "LEADER_NOT_AVAILABLE",
        NOT_LEADER_FOR_PARTITION => "NOT_LEADER_FOR_PARTITION",
        REQUEST_TIMED_OUT => "REQUEST_TIMED_OUT",
        BROKER_NOT_AVAILABLE => "BROKER_NOT_AVAILABLE",
        REPLICA_NOT_AVAILABLE => "REPLICA_NOT_AVAILABLE",
        MESSAGE_TOO_LARGE => "MESSAGE_TOO_LARGE",
        STALE_CONTROLLER_EPOCH => "STALE_CONTROLLER_EPOCH",
        OFFSET_METADATA_TOO_LARGE => "OFFSET_METADATA_TOO_LARGE",
        NETWORK_EXCEPTION => "NETWORK_EXCEPTION",
        COORDINATOR_LOAD_IN_PROGRESS => "COORDINATOR_LOAD_IN_PROGRESS",
        COORDINATOR_NOT_AVAILABLE => "COORDINATOR_NOT_AVAILABLE",
        NOT_COORDINATOR => "NOT_COORDINATOR",
        INVALID_TOPIC_EXCEPTION => "INVALID_TOPIC_EXCEPTION",
        RECORD_LIST_TOO_LARGE => "RECORD_LIST_TOO_LARGE",
        NOT_ENOUGH_REPLICAS => "NOT_ENOUGH_REPLICAS",
        NOT_ENOUGH_REPLICAS_AFTER_APPEND => "NOT_ENOUGH_REPLICAS_AFTER_APPEND",
        INVALID_REQUIRED_ACKS => "INVALID_REQUIRED_ACKS",
        ILLEGAL_GENERATION => "ILLEGAL_GENERATION",
        INCONSISTENT_GROUP_PROTOCOL => "INCONSISTENT_GROUP_PROTOCOL",
        INVALID_GROUP_ID => "INVALID_GROUP_ID",
        UNKNOWN_MEMBER_ID => "UNKNOWN_MEMBER_ID",
        INVALID_SESSION_TIMEOUT => "INVALID_SESSION_TIMEOUT",
        REBALANCE_IN_PROGRESS => "REBALANCE_IN_PROGRESS",
        INVALID_COMMIT_OFFSET_SIZE => "INVALID_COMMIT_OFFSET_SIZE",
        TOPIC_AUTHORIZATION_FAILED => "TOPIC_AUTHORIZATION_FAILED",
        GROUP_AUTHORIZATION_FAILED => "GROUP_AUTHORIZATION_FAILED",
        CLUSTER_AUTHORIZATION_FAILED => "CLUSTER_AUTHORIZATION_FAILED",
        INVALID_TIMESTAMP => "INVALID_TIMESTAMP",
        UNSUPPORTED_SASL_MECHANISM => "UNSUPPORTED_SASL_MECHANISM",
        ILLEGAL_SASL_STATE => "ILLEGAL_SASL_STATE",
        UNSUPPORTED_VERSION => "UNSUPPORTED_VERSION",
        TOPIC_ALREADY_EXISTS => "TOPIC_ALREADY_EXISTS",
        INVALID_PARTITIONS => "INVALID_PARTITIONS",
        INVALID_REPLICATION_FACTOR => "INVALID_REPLICATION_FACTOR",
        INVALID_REPLICA_ASSIGNMENT => "INVALID_REPLICA_ASSIGNMENT",
        INVALID_CONFIG => "INVALID_CONFIG",
        NOT_CONTROLLER => "NOT_CONTROLLER",
        INVALID_REQUEST => "INVALID_REQUEST",
        UNSUPPORTED_FOR_MESSAGE_FORMAT => "UNSUPPORTED_FOR_MESSAGE_FORMAT",
        POLICY_VIOLATION => "POLICY_VIOLATION",
        OUT_OF_ORDER_SEQUENCE_NUMBER => "OUT_OF_ORDER_SEQUENCE_NUMBER",
        DUPLICATE_SEQUENCE_NUMBER => "DUPLICATE_SEQUENCE_NUMBER",
        INVALID_PRODUCER_EPOCH => "INVALID_PRODUCER_EPOCH",
        INVALID_TXN_STATE => "INVALID_TXN_STATE",
        INVALID_PRODUCER_ID_MAPPING => "INVALID_PRODUCER_ID_MAPPING",
        INVALID_TRANSACTION_TIMEOUT => "INVALID_TRANSACTION_TIMEOUT",
        CONCURRENT_TRANSACTIONS => "CONCURRENT_TRANSACTIONS",
        TRANSACTION_COORDINATOR_FENCED => "TRANSACTION_COORDINATOR_FENCED",
        TRANSACTIONAL_ID_AUTHORIZATION_FAILED => "TRANSACTIONAL_ID_AUTHORIZATION_FAILED",
        SECURITY_DISABLED => "SECURITY_DISABLED",
        OPERATION_NOT_ATTEMPTED => "OPERATION_NOT_ATTEMPTED",
        KAFKA_STORAGE_ERROR => "KAFKA_STORAGE_ERROR",
        LOG_DIR_NOT_FOUND => "LOG_DIR_NOT_FOUND",
        SASL_AUTHENTICATION_FAILED => "SASL_AUTHENTICATION_FAILED",
        UNKNOWN_PRODUCER_ID => "UNKNOWN_PRODUCER_ID",
        REASSIGNMENT_IN_PROGRESS => "REASSIGNMENT_IN_PROGRESS",
        FETCH_SESSION_ID_NOT_FOUND => "FETCH_SESSION_ID_NOT_FOUND",
        INVALID_FETCH_SESSION_EPOCH => "INVALID_FETCH_SESSION_EPOCH",
        FENCED_LEADER_EPOCH => "FENCED_LEADER_EPOCH",
        UNKNOWN_LEADER_EPOCH => "UNKNOWN_LEADER_EPOCH",
        UNSUPPORTED_COMPRESSION_TYPE => "UNSUPPORTED_COMPRESSION_TYPE",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(name(NONE), "NONE");
        assert_eq!(name(INVALID_REQUIRED_ACKS), "INVALID_REQUIRED_ACKS");
        assert_eq!(name(TOPIC_ALREADY_EXISTS), "TOPIC_ALREADY_EXISTS");
        assert_eq!(name(12345), "UNKNOWN");
    }
}
