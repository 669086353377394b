//! Kafka API keys and the request envelope.

use bytes::{Bytes, BytesMut};

use crate::wire::{Encoder, WireWrite};

pub const PRODUCE: i16 = 0;
pub const FETCH: i16 = 1;
pub const LIST_OFFSETS: i16 = 2;
pub const METADATA: i16 = 3;
pub const LEADER_AND_ISR: i16 = 4;
pub const STOP_REPLICA: i16 = 5;
pub const UPDATE_METADATA: i16 = 6;
pub const CONTROLLED_SHUTDOWN: i16 = 7;
pub const OFFSET_COMMIT: i16 = 8;
pub const OFFSET_FETCH: i16 = 9;
pub const FIND_COORDINATOR: i16 = 10;
pub const JOIN_GROUP: i16 = 11;
pub const HEARTBEAT: i16 = 12;
pub const LEAVE_GROUP: i16 = 13;
pub const SYNC_GROUP: i16 = 14;
pub const DESCRIBE_GROUPS: i16 = 15;
pub const LIST_GROUPS: i16 = 16;
pub const SASL_HANDSHAKE: i16 = 17;
pub const API_VERSIONS: i16 = 18;
pub const CREATE_TOPICS: i16 = 19;
pub const DELETE_TOPICS: i16 = 20;
pub const DELETE_RECORDS: i16 = 21;
pub const INIT_PRODUCER_ID: i16 = 22;
pub const OFFSET_FOR_LEADER_EPOCH: i16 = 23;
pub const ADD_PARTITIONS_TO_TXN: i16 = 24;
pub const ADD_OFFSETS_TO_TXN: i16 = 25;
pub const END_TXN: i16 = 26;
pub const WRITE_TXN_MARKERS: i16 = 27;
pub const TXN_OFFSET_COMMIT: i16 = 28;
pub const DESCRIBE_ACLS: i16 = 29;
pub const CREATE_ACLS: i16 = 30;
pub const DELETE_ACLS: i16 = 31;
pub const DESCRIBE_CONFIGS: i16 = 32;
pub const ALTER_CONFIGS: i16 = 33;
pub const ALTER_REPLICA_LOG_DIRS: i16 = 34;
pub const DESCRIBE_LOG_DIRS: i16 = 35;
pub const SASL_AUTHENTICATE: i16 = 36;
pub const CREATE_PARTITIONS: i16 = 37;
pub const CREATE_DELEGATION_TOKEN: i16 = 38;
pub const RENEW_DELEGATION_TOKEN: i16 = 39;
pub const EXPIRE_DELEGATION_TOKEN: i16 = 40;
pub const DESCRIBE_DELEGATION_TOKEN: i16 = 41;
pub const DELETE_GROUPS: i16 = 42;
pub const ELECT_PREFERRED_LEADERS: i16 = 43;

/// Name of an API key, for logs and errors.
pub fn key_name(key: i16) -> &'static str {
    match key {
        PRODUCE => "Produce",
        FETCH => "Fetch",
        LIST_OFFSETS => "ListOffsets",
        METADATA => "Metadata",
        LEADER_AND_ISR => "LeaderAndIsr",
        STOP_REPLICA => "StopReplica",
        UPDATE_METADATA => "UpdateMetadata",
        CONTROLLED_SHUTDOWN => "ControlledShutdown",
        OFFSET_COMMIT => "OffsetCommit",
        OFFSET_FETCH => "OffsetFetch",
        FIND_COORDINATOR => "FindCoordinator",
        JOIN_GROUP => "JoinGroup",
        HEARTBEAT => "Heartbeat",
        LEAVE_GROUP => "LeaveGroup",
        SYNC_GROUP => "SyncGroup",
        DESCRIBE_GROUPS => "DescribeGroups",
        LIST_GROUPS => "ListGroups",
        SASL_HANDSHAKE => "SaslHandshake",
        API_VERSIONS => "ApiVersions",
        CREATE_TOPICS => "CreateTopics",
        DELETE_TOPICS => "DeleteTopics",
        DELETE_RECORDS => "DeleteRecords",
        INIT_PRODUCER_ID => "InitProducerId",
        OFFSET_FOR_LEADER_EPOCH => "OffsetForLeaderEpoch",
        ADD_PARTITIONS_TO_TXN => "AddPartitionsToTxn",
        ADD_OFFSETS_TO_TXN => "AddOffsetsToTxn",
        END_TXN => "EndTxn",
        WRITE_TXN_MARKERS => "WriteTxnMarkers",
        TXN_OFFSET_COMMIT => "TxnOffsetCommit",
        DESCRIBE_ACLS => "DescribeAcls",
        CREATE_ACLS => "CreateAcls",
        DELETE_ACLS => "DeleteAcls",
        DESCRIBE_CONFIGS => "DescribeConfigs",
        ALTER_CONFIGS => "AlterConfigs",
        ALTER_REPLICA_LOG_DIRS => "AlterReplicaLogDirs",
        DESCRIBE_LOG_DIRS => "DescribeLogDirs",
        SASL_AUTHENTICATE => "SaslAuthenticate",
        CREATE_PARTITIONS => "CreatePartitions",
        CREATE_DELEGATION_TOKEN => "CreateDelegationToken",
        RENEW_DELEGATION_TOKEN => "RenewDelegationToken",
        EXPIRE_DELEGATION_TOKEN => "ExpireDelegationToken",
        DESCRIBE_DELEGATION_TOKEN => "DescribeDelegationToken",
        DELETE_GROUPS => "DeleteGroups",
        ELECT_PREFERRED_LEADERS => "ElectPreferredLeaders",
        _ => "Unknown",
    }
}

/// A Kafka request: the common header plus a typed body whose shape is
/// fixed by (api_key, api_version).
///
/// The correlation id is always 0. There is at most one request in flight
/// per connection, so responses never need to be matched back.
#[derive(Debug, Clone)]
pub struct Request<B> {
    pub api_key: i16,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: String,
    pub body: B,
}

impl<B: WireWrite> Request<B> {
    pub fn new(api_key: i16, api_version: i16, body: B) -> Request<B> {
        Request {
            api_key,
            api_version,
            correlation_id: 0,
            client_id: String::new(),
            body,
        }
    }

    /// Wire bytes of the request, behind the i32 total-length prefix.
    pub fn to_bytes(&self) -> Bytes {
        let mut payload = BytesMut::new();
        let mut e = Encoder::new(&mut payload);
        e.write_i16(self.api_key);
        e.write_i16(self.api_version);
        e.write_i32(self.correlation_id);
        e.write_string(&self.client_id);
        self.body.write(&mut e);
        let mut framed = BytesMut::with_capacity(4 + payload.len());
        let mut e = Encoder::new(&mut framed);
        e.write_i32(payload.len() as i32);
        framed.extend_from_slice(&payload);
        framed.freeze()
    }
}
