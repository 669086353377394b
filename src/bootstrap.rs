//! Stateless calls to bootstrap brokers.
//!
//! The bootstrap address is first tried as an SRV name through the
//! process-wide resolver hook; the resolved `host:port` list is cached and
//! a random entry is used per call. When SRV resolution fails the address
//! is used verbatim, so a literal `localhost:9092` works with no resolver
//! configured. Because a cached list can point at retired brokers, the
//! cache entry is dropped on any call error.

use std::collections::HashMap;
use std::net::ToSocketAddrs;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rustls::ClientConfig;
use tracing::debug;

use crate::api::Request;
use crate::api_versions_types::{self, ApiVersionsResponse};
use crate::config;
use crate::create_topics_types::{self, CreateTopicsResponse};
use crate::error::{ApiError, Error, Result};
use crate::error_codes;
use crate::find_coordinator_types::{self, FindCoordinatorResponse};
use crate::metadata_types::{self, Broker, MetadataResponse};
use crate::transport::{self, BrokerConn};
use crate::wire::{WireRead, WireWrite};

static SRV_CACHE: Lazy<Mutex<HashMap<String, Vec<String>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Pick a broker address for the bootstrap name. SRV results are cached;
/// on lookup failure the name itself is returned.
fn random_broker(bootstrap: &str) -> String {
    if let Some(addrs) = SRV_CACHE.lock().get(bootstrap) {
        if let Some(addr) = addrs.choose(&mut rand::thread_rng()) {
            return addr.clone();
        }
    }
    let addrs = match config::srv_lookup(bootstrap) {
        Ok(addrs) => resolvable(addrs),
        Err(e) => {
            debug!(bootstrap, error = %e, "srv lookup failed, using address verbatim");
            return bootstrap.to_string();
        }
    };
    if addrs.is_empty() {
        return bootstrap.to_string();
    }
    let addr = addrs
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| bootstrap.to_string());
    SRV_CACHE.lock().insert(bootstrap.to_string(), addrs);
    addr
}

/// Keep only addresses that resolve. An SRV answer may mix live and
/// retired hosts; one dead entry must not fail the whole resolution.
fn resolvable(addrs: Vec<String>) -> Vec<String> {
    addrs
        .into_iter()
        .filter(|addr| match addr.to_socket_addrs() {
            Ok(_) => true,
            Err(e) => {
                debug!(%addr, error = %e, "skipping unresolvable broker");
                false
            }
        })
        .collect()
}

fn forget(bootstrap: &str) {
    SRV_CACHE.lock().remove(bootstrap);
}

#[cfg(test)]
pub(crate) fn seed_srv_cache(bootstrap: &str, addrs: Vec<String>) {
    SRV_CACHE.lock().insert(bootstrap.to_string(), addrs);
}

#[cfg(test)]
pub(crate) fn srv_cache_contains(bootstrap: &str) -> bool {
    SRV_CACHE.lock().contains_key(bootstrap)
}

/// Dial a random bootstrap broker, make one call, close the connection.
/// Any error invalidates the bootstrap's SRV cache entry.
pub(crate) fn connect_and_call<B: WireWrite, R: WireRead>(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
    req: &Request<B>,
) -> Result<R> {
    let addr = random_broker(bootstrap);
    let result = BrokerConn::dial(&addr, tls).and_then(|mut conn| transport::call(&mut conn, req));
    match result {
        Ok(resp) => Ok(resp),
        Err(e) => {
            forget(bootstrap);
            Err(Error::call(addr, e))
        }
    }
}

pub fn call_api_versions(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
) -> Result<ApiVersionsResponse> {
    connect_and_call(bootstrap, tls, &api_versions_types::request())
}

pub fn call_metadata(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
    topics: &[&str],
) -> Result<MetadataResponse> {
    connect_and_call(bootstrap, tls, &metadata_types::request(topics))
}

pub fn call_create_topic(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
    topic: &str,
    num_partitions: i32,
    replication_factor: i16,
) -> Result<CreateTopicsResponse> {
    let req = create_topics_types::request(topic, num_partitions, replication_factor, vec![]);
    connect_and_call(bootstrap, tls, &req)
}

pub fn call_find_coordinator(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
    group_id: &str,
) -> Result<FindCoordinatorResponse> {
    connect_and_call(bootstrap, tls, &find_coordinator_types::request(group_id))
}

/// Resolve the current leader of a topic partition through cluster
/// metadata. A topic with no metadata entry for the partition is
/// [`Error::PartitionDoesNotExist`]; an entry with no live leader is
/// [`Error::NoLeaderForPartition`].
pub fn get_partition_leader(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
    topic: &str,
    partition: i32,
) -> Result<Broker> {
    let meta = call_metadata(bootstrap, tls, &[topic])?;
    if !meta.partitions(topic).contains_key(&partition) {
        return Err(Error::PartitionDoesNotExist);
    }
    match meta.leaders(topic).remove(&partition) {
        Some(leader) => Ok(leader),
        None => Err(Error::NoLeaderForPartition),
    }
}

/// Resolve the coordinator for a consumer group. A broker-reported error
/// code fails the call.
pub fn get_group_coordinator(
    bootstrap: &str,
    tls: Option<&Arc<ClientConfig>>,
    group_id: &str,
) -> Result<String> {
    let resp = call_find_coordinator(bootstrap, tls, group_id)?;
    if resp.error_code != error_codes::NONE {
        return Err(Error::Api(ApiError::with_message(
            resp.error_code,
            resp.error_message,
        )));
    }
    Ok(resp.addr())
}
