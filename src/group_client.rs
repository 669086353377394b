//! Connection-bound client for a consumer group coordinator.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use rustls::ClientConfig;
use tracing::debug;

use crate::api::Request;
use crate::bootstrap;
use crate::error::{ApiError, Error, Result};
use crate::error_codes;
use crate::heartbeat_types::{self, HeartbeatResponse};
use crate::join_group_types::{self, JoinGroupProtocol, JoinGroupResponse};
use crate::offset_commit_types::{self, OffsetCommitResponse};
use crate::offset_fetch_types::{self, OffsetFetchResponse};
use crate::sync_group_types::{self, SyncGroupAssignment, SyncGroupResponse};
use crate::transport::{self, BrokerConn};
use crate::wire::{WireRead, WireWrite};

/// Join parameters for [`GroupClient::join`]. An empty member id asks the
/// coordinator to assign one.
#[derive(Debug, Clone, Default)]
pub struct JoinGroupArgs {
    pub member_id: String,
    pub protocol_type: String,
    pub protocol_name: String,
    pub metadata: Bytes,
}

/// Sync parameters for [`GroupClient::sync`]. Only the group leader sends
/// assignments; followers sync with an empty list.
#[derive(Debug, Clone, Default)]
pub struct SyncGroupArgs {
    pub member_id: String,
    pub generation_id: i32,
    pub assignments: Vec<SyncGroupAssignment>,
}

/// Maintains a connection to a consumer group coordinator.
///
/// The coordinator is resolved lazily through a FindCoordinator call to a
/// bootstrap broker. The connection lifecycle is the same as the partition
/// client's: transport errors close the connection and the client stays
/// reusable. Unlike the partition client, the offset helpers translate
/// broker error codes into call failures.
pub struct GroupClient {
    bootstrap: String,
    group_id: String,
    client_id: String,
    tls: Option<Arc<ClientConfig>>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    coordinator: Option<String>,
    conn: Option<BrokerConn>,
}

impl GroupClient {
    pub fn new(bootstrap: &str, group_id: &str) -> GroupClient {
        GroupClient {
            bootstrap: bootstrap.to_string(),
            group_id: group_id.to_string(),
            client_id: String::new(),
            tls: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_client_id(mut self, client_id: &str) -> GroupClient {
        self.client_id = client_id.to_string();
        self
    }

    pub fn with_tls(mut self, tls: Arc<ClientConfig>) -> GroupClient {
        self.tls = Some(tls);
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// The last resolved coordinator address, if any.
    pub fn coordinator(&self) -> Option<String> {
        self.inner.lock().coordinator.clone()
    }

    /// Close the connection to the coordinator. The client stays usable.
    pub fn close(&self) {
        self.inner.lock().conn = None;
    }

    pub fn join(&self, args: &JoinGroupArgs) -> Result<JoinGroupResponse> {
        let protocol = JoinGroupProtocol {
            name: args.protocol_name.clone(),
            metadata: args.metadata.clone(),
        };
        let req = join_group_types::request(
            &self.group_id,
            &args.member_id,
            &args.protocol_type,
            vec![protocol],
        );
        self.call(req)
    }

    pub fn sync(&self, args: &SyncGroupArgs) -> Result<SyncGroupResponse> {
        let req = sync_group_types::request(
            &self.group_id,
            &args.member_id,
            args.generation_id,
            args.assignments.clone(),
        );
        self.call(req)
    }

    pub fn heartbeat(&self, member_id: &str, generation_id: i32) -> Result<HeartbeatResponse> {
        let req = heartbeat_types::request(&self.group_id, member_id, generation_id);
        self.call(req)
    }

    /// Last committed offset for the topic partition. Broker error codes,
    /// at the top level or for the partition, fail the call.
    pub fn fetch_offset(&self, topic: &str, partition: i32) -> Result<i64> {
        let req = offset_fetch_types::request(&self.group_id, topic, partition);
        let resp: OffsetFetchResponse = self.call(req)?;
        parse_offset_fetch_response(&resp)
    }

    /// Commit an offset for one partition. `retention_ms` of -1 keeps the
    /// broker's default retention.
    pub fn commit_offset(
        &self,
        topic: &str,
        partition: i32,
        offset: i64,
        retention_ms: i64,
    ) -> Result<()> {
        let req = offset_commit_types::request(&self.group_id, topic, partition, offset, retention_ms);
        let resp: OffsetCommitResponse = self.call(req)?;
        parse_offset_commit_response(&resp)
    }

    /// Commit offsets for several partitions of one topic in a single
    /// call. Any partition-level error code fails the whole call; on such
    /// a failure some partitions may have committed and some not.
    pub fn commit_offsets(
        &self,
        topic: &str,
        offsets: &BTreeMap<i32, i64>,
        retention_ms: i64,
    ) -> Result<()> {
        let req = offset_commit_types::request_multiple(&self.group_id, topic, offsets, retention_ms);
        let resp: OffsetCommitResponse = self.call(req)?;
        parse_offset_commit_response(&resp)
    }

    fn call<B: WireWrite, R: WireRead>(&self, mut req: Request<B>) -> Result<R> {
        let mut inner = self.inner.lock();
        self.ensure_connected(&mut inner)?;
        req.client_id = self.client_id.clone();
        let target = inner.coordinator.clone().unwrap_or_default();
        let conn = match inner.conn.as_mut() {
            Some(conn) => conn,
            None => return Err(Error::Protocol("not connected".into())),
        };
        match transport::call(conn, &req) {
            Ok(resp) => Ok(resp),
            Err(e) => {
                inner.conn = None;
                Err(Error::call(target, e))
            }
        }
    }

    fn ensure_connected(&self, inner: &mut Inner) -> Result<()> {
        if inner.conn.is_some() {
            return Ok(());
        }
        let addr =
            bootstrap::get_group_coordinator(&self.bootstrap, self.tls.as_ref(), &self.group_id)
                .map_err(|e| Error::connect(self.bootstrap.clone(), e))?;
        let conn = BrokerConn::dial(&addr, self.tls.as_ref())
            .map_err(|e| Error::connect(addr.clone(), e))?;
        debug!(coordinator = %addr, group = %self.group_id, "connected");
        inner.coordinator = Some(addr);
        inner.conn = Some(conn);
        Ok(())
    }
}

fn parse_offset_fetch_response(r: &OffsetFetchResponse) -> Result<i64> {
    if r.error_code != error_codes::NONE {
        return Err(Error::Api(ApiError::new(r.error_code)));
    }
    if r.topics.len() != 1 {
        return Err(Error::Protocol(format!(
            "unexpected number of topic responses: {}",
            r.topics.len()
        )));
    }
    let t = &r.topics[0];
    if t.partitions.len() != 1 {
        return Err(Error::Protocol(format!(
            "unexpected number of topic partition responses: {}",
            t.partitions.len()
        )));
    }
    let p = &t.partitions[0];
    if p.error_code != error_codes::NONE {
        return Err(Error::Api(ApiError::new(p.error_code)));
    }
    Ok(p.offset)
}

/// Shared by the single- and multi-partition commits: any partition-level
/// error fails the call. The looser alternative, returning the first
/// error only, hides per-partition failures.
fn parse_offset_commit_response(r: &OffsetCommitResponse) -> Result<()> {
    if r.topics.len() != 1 {
        return Err(Error::Protocol(format!(
            "unexpected number of topic responses: {}",
            r.topics.len()
        )));
    }
    let t = &r.topics[0];
    if t.partitions.is_empty() {
        return Err(Error::Protocol(
            "unexpected number of topic partition responses: 0".into(),
        ));
    }
    for p in &t.partitions {
        if p.error_code != error_codes::NONE {
            return Err(Error::Api(ApiError::new(p.error_code)));
        }
    }
    Ok(())
}
