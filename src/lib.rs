//! Low-level synchronous client library for the Kafka wire protocol.
//!
//! kafkawire talks to Kafka 1.0+ brokers directly over the wire format.
//! It is not modeled on the Java client: there is no background activity
//! of any kind, every call runs to completion on the caller's thread, and
//! suspension happens only on socket I/O and on a client's mutex.
//!
//! # Scope
//!
//! The library covers non-transactional production and consumption for a
//! single partition at a time. Multi-partition producers and consumers,
//! retry policies, and rebalance orchestration are built on top of it.
//!
//! # Design decisions
//!
//! 1. Record batches first. Produce and Fetch operate on sets of record
//!    batches; the batch is the unit at which data is produced, fetched,
//!    partitioned, and compressed. Building and parsing batches is
//!    separate from producing and fetching, and compression codecs beyond
//!    gzip are supplied by the library user.
//!
//! 2. Synchronous single-partition calls. The wire protocol allows many
//!    in-flight requests per connection and many partitions per call.
//!    This library deliberately maintains one connection per topic
//!    partition, with one outstanding request, each call for one
//!    partition. Call and failure handling stay simple, at the cost of
//!    throughput tricks that belong in higher layers.
//!
//! 3. Declared wire schemas. Every request and response body is a
//!    [`wire_struct!`](crate::wire) declaration walked field by field by
//!    the codec, so supporting a new API is a data declaration, not new
//!    serialization code.
//!
//! 4. Little data hiding. Wire structs expose their fields to make
//!    debugging and metrics collection easy. The library is not intended
//!    to be child proof.
//!
//! # Getting started
//!
//! Build batches with [`batch::Builder`], ship them with
//! [`producer::PartitionProducer`], read them back with
//! [`fetcher::PartitionFetcher`] and [`batch::batches`]. Process-wide
//! timeouts live in [`config`]; set them once at startup.

pub mod api;
pub mod api_versions_types;
pub mod batch;
pub mod bootstrap;
pub mod compression;
pub mod config;
pub mod create_topics_types;
pub mod error;
pub mod error_codes;
pub mod fetch_types;
pub mod fetcher;
pub mod find_coordinator_types;
pub mod group_client;
pub mod heartbeat_types;
pub mod join_group_types;
pub mod list_offsets_types;
pub mod metadata_types;
pub mod offset_commit_types;
pub mod offset_fetch_types;
pub mod partition_client;
pub mod produce_types;
pub mod producer;
pub mod record;
pub mod sync_group_types;
pub mod transport;
pub mod varint;
pub mod wire;

pub use batch::{batches, Batch, Builder};
pub use compression::{Compressor, Decompressor};
pub use error::{ApiError, Error, Result};
pub use fetcher::{PartitionFetcher, MESSAGE_NEWEST, MESSAGE_OLDEST};
pub use group_client::GroupClient;
pub use partition_client::PartitionClient;
pub use producer::PartitionProducer;
pub use record::Record;
