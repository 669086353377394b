//! Connection-bound client for a single topic partition.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;
use rustls::ClientConfig;
use tracing::debug;

use crate::api::{self, Request};
use crate::api_versions_types::{self, ApiVersionsResponse};
use crate::bootstrap;
use crate::config;
use crate::error::{ApiError, Error, Result};
use crate::error_codes;
use crate::fetch_types::{self, FetchArgs, FetchResponse, FetchResponseV6};
use crate::list_offsets_types::{self, ListOffsetsResponse};
use crate::metadata_types::Broker;
use crate::produce_types::{self, ProduceArgs, ProduceResponse};
use crate::transport::{self, BrokerConn};
use crate::wire::{WireRead, WireWrite};

/// Maintains a connection to the leader of a single topic partition.
///
/// The client uses the bootstrap address to look up topic metadata and to
/// connect to the leader of the topic partition. This happens on the first
/// API call. Connections are persistent and all calls are synchronous. If
/// a call can not complete the request-response round trip, or the
/// response can not be parsed, the call returns an error and the
/// connection is closed; it will be re-opened on the next call. A
/// successful call means only that the round trip completed: the typed
/// response may still carry a broker error code, and checking it is up to
/// the caller, as are retries.
///
/// All calls are safe for concurrent use; they serialize through one
/// mutex, so there is at most one request in flight per connection.
pub struct PartitionClient {
    bootstrap: String,
    topic: String,
    partition: i32,
    client_id: String,
    tls: Option<Arc<ClientConfig>>,
    /// Counterpart of the `connections.max.idle.ms` broker setting. The
    /// broker closes connections idle that long, which would make the next
    /// call fail. With this set, a connection idle past the limit is
    /// closed and re-opened instead. None disables the check.
    conn_max_idle: Option<Duration>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    leader: Option<Broker>,
    versions: Option<ApiVersionsResponse>,
    conn: Option<BrokerConn>,
    opened: Option<Instant>,
    last_used: Option<Instant>,
    generation: u64,
}

impl PartitionClient {
    /// The bootstrap address is an SRV name or `host:port`; it does not
    /// need to be the leader of the topic partition.
    pub fn new(bootstrap: &str, topic: &str, partition: i32) -> PartitionClient {
        PartitionClient {
            bootstrap: bootstrap.to_string(),
            topic: topic.to_string(),
            partition,
            client_id: String::new(),
            tls: None,
            conn_max_idle: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_client_id(mut self, client_id: &str) -> PartitionClient {
        self.client_id = client_id.to_string();
        self
    }

    pub fn with_tls(mut self, tls: Arc<ClientConfig>) -> PartitionClient {
        self.tls = Some(tls);
        self
    }

    pub fn with_conn_max_idle(mut self, max_idle: Duration) -> PartitionClient {
        self.conn_max_idle = Some(max_idle);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn partition(&self) -> i32 {
        self.partition
    }

    /// The last resolved partition leader, kept even after the connection
    /// is closed on error so it can be inspected.
    pub fn leader(&self) -> Option<Broker> {
        self.inner.lock().leader.clone()
    }

    /// Counts successful dials. Two calls served by the same connection
    /// observe the same generation.
    pub fn connection_generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Close the connection to the partition leader. Nop without an active
    /// connection; blocks until an in-progress request completes. Calls
    /// made after close open a new connection.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        Self::disconnect(&mut inner);
    }

    pub fn list_offsets(&self, timestamp_ms: i64) -> Result<ListOffsetsResponse> {
        let req = list_offsets_types::request(&self.topic, self.partition, timestamp_ms);
        self.call(req)
    }

    pub fn fetch(&self, args: &FetchArgs) -> Result<FetchResponse> {
        let mut inner = self.inner.lock();
        self.ensure_connected(&mut inner)?;
        // kafka 1.0 brokers top out at fetch v6
        let old_fetch = inner
            .versions
            .as_ref()
            .and_then(|v| v.max_version(api::FETCH))
            .is_some_and(|max| max < fetch_types::VERSION);
        if old_fetch {
            let mut req = fetch_types::request_v6(args);
            req.client_id = self.client_id.clone();
            let resp: FetchResponseV6 = self.dispatch(&mut inner, &req)?;
            Ok(resp.into())
        } else {
            let mut req = fetch_types::request(args);
            req.client_id = self.client_id.clone();
            self.dispatch(&mut inner, &req)
        }
    }

    pub fn produce(&self, args: &ProduceArgs, record_set: Bytes) -> Result<ProduceResponse> {
        let req = produce_types::request(args, record_set);
        self.call(req)
    }

    fn call<B: WireWrite, R: WireRead>(&self, mut req: Request<B>) -> Result<R> {
        let mut inner = self.inner.lock();
        self.ensure_connected(&mut inner)?;
        req.client_id = self.client_id.clone();
        // downgrade so that a kafka 1.0 broker (max produce version 5)
        // accepts the request
        if req.api_key == api::PRODUCE {
            if let Some(max) = inner
                .versions
                .as_ref()
                .and_then(|v| v.max_version(api::PRODUCE))
            {
                if max < req.api_version {
                    debug!(from = req.api_version, to = max, "downgrading produce");
                    req.api_version = max;
                }
            }
        }
        self.dispatch(&mut inner, &req)
    }

    /// Issue one request on the open connection. A transport error closes
    /// the connection but keeps the cached leader.
    fn dispatch<B: WireWrite, R: WireRead>(&self, inner: &mut Inner, req: &Request<B>) -> Result<R> {
        let target = inner
            .leader
            .as_ref()
            .map(|l| l.addr())
            .unwrap_or_else(|| self.bootstrap.clone());
        let conn = match inner.conn.as_mut() {
            Some(conn) => conn,
            None => return Err(Error::Protocol("not connected".into())),
        };
        let result = transport::call(conn, req);
        inner.last_used = Some(Instant::now());
        match result {
            Ok(resp) => Ok(resp),
            Err(e) => {
                Self::disconnect(inner);
                Err(Error::call(target, e))
            }
        }
    }

    /// Open a connection when there is none, closing one that exceeded the
    /// process connection TTL or this client's idle limit first. Resolves
    /// the leader through the bootstrap and negotiates API versions.
    fn ensure_connected(&self, inner: &mut Inner) -> Result<()> {
        if inner.conn.is_some() {
            let expired = config::connection_ttl()
                .zip(inner.opened)
                .is_some_and(|(ttl, opened)| opened.elapsed() > ttl);
            let idle = self
                .conn_max_idle
                .zip(inner.last_used)
                .is_some_and(|(max, last)| last.elapsed() > max);
            if !expired && !idle {
                return Ok(());
            }
            debug!(expired, idle, "closing connection");
            Self::disconnect(inner);
        }
        let leader = bootstrap::get_partition_leader(
            &self.bootstrap,
            self.tls.as_ref(),
            &self.topic,
            self.partition,
        )
        .map_err(|e| Error::connect(self.bootstrap.clone(), e))?;
        let mut conn = BrokerConn::dial(&leader.addr(), self.tls.as_ref())
            .map_err(|e| Error::connect(leader.addr(), e))?;
        let mut req = api_versions_types::request();
        req.client_id = self.client_id.clone();
        let versions: ApiVersionsResponse = transport::call(&mut conn, &req)
            .map_err(|e| Error::connect(leader.addr(), e))?;
        if versions.error_code != error_codes::NONE {
            return Err(Error::Api(ApiError::new(versions.error_code)));
        }
        debug!(leader = %leader, topic = %self.topic, partition = self.partition, "connected");
        inner.leader = Some(leader);
        inner.conn = Some(conn);
        inner.versions = Some(versions);
        inner.opened = Some(Instant::now());
        inner.last_used = inner.opened;
        inner.generation += 1;
        Ok(())
    }

    /// Close the connection but keep the cached leader.
    fn disconnect(inner: &mut Inner) {
        inner.conn = None;
    }
}
