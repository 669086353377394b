//! Single-partition fetcher.

use crate::error::{ApiError, Error, Result};
use crate::error_codes;
use crate::fetch_types::{FetchArgs, FetchPartitionResponse};
use crate::partition_client::PartitionClient;

/// Seek target for the next offset to be written to the partition.
pub const MESSAGE_NEWEST: i64 = -1;
/// Seek target for the oldest retained offset.
pub const MESSAGE_OLDEST: i64 = -2;

/// Fetches record batches from a single partition, one call at a time.
///
/// The fetcher tracks the offset to fetch from but never advances it: a
/// successful fetch leaves the offset untouched, and deciding where to go
/// next (usually the last returned offset plus one) is up to the caller.
/// `max_wait_time_ms` must be smaller than the process request timeout or
/// long polls will be cut short by the socket deadline.
pub struct PartitionFetcher {
    client: PartitionClient,
    offset: i64,
    pub min_bytes: i32,
    pub max_bytes: i32,
    pub max_wait_time_ms: i32,
}

impl PartitionFetcher {
    pub fn new(client: PartitionClient) -> PartitionFetcher {
        PartitionFetcher {
            client,
            offset: 0,
            min_bytes: 1 << 20,
            max_bytes: 100 << 20,
            max_wait_time_ms: 1000,
        }
    }

    pub fn client(&self) -> &PartitionClient {
        &self.client
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// Translate a wall-clock target into an offset through a ListOffsets
    /// call and position the fetcher there. `when` is milliseconds since
    /// epoch, [`MESSAGE_NEWEST`], or [`MESSAGE_OLDEST`]. The fetcher
    /// offset changes only when the call succeeds.
    pub fn seek(&mut self, when: i64) -> Result<i64> {
        let resp = self.client.list_offsets(when)?;
        let p = resp
            .partition_response(self.client.topic(), self.client.partition())
            .ok_or_else(|| Error::Protocol("no partition in list offsets response".into()))?;
        if p.error_code != error_codes::NONE {
            return Err(Error::Api(ApiError::new(p.error_code)));
        }
        self.offset = p.offset;
        Ok(self.offset)
    }

    /// Fetch from the current offset. Returns the partition-level response
    /// with the record set bytes untouched; parse them with
    /// [`crate::batch::batches`]. Broker error codes are left in the
    /// response for the caller to inspect; only an unexpected response
    /// shape fails the call.
    pub fn fetch(&mut self) -> Result<FetchPartitionResponse> {
        let args = FetchArgs {
            topic: self.client.topic().to_string(),
            partition: self.client.partition(),
            offset: self.offset,
            min_bytes: self.min_bytes,
            max_bytes: self.max_bytes,
            max_wait_time_ms: self.max_wait_time_ms,
        };
        let resp = self.client.fetch(&args)?;
        if resp.responses.len() != 1 {
            return Err(Error::Protocol(format!(
                "unexpected number of topic responses: {}",
                resp.responses.len()
            )));
        }
        let t = &resp.responses[0];
        if t.partition_responses.len() != 1 {
            return Err(Error::Protocol(format!(
                "unexpected number of topic partition responses: {}",
                t.partition_responses.len()
            )));
        }
        Ok(t.partition_responses[0].clone())
    }
}
