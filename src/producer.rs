//! Single-partition producer.

use bytes::Bytes;

use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::partition_client::PartitionClient;
use crate::produce_types::{ProduceArgs, ProducePartitionResponse};

/// Produces record batches to a single partition.
///
/// A successful call means the request-response round trip completed; the
/// embedded error code may still say the broker rejected the batch. The
/// reverse does not hold either: a connection interrupted while reading
/// the response does not mean the broker failed to persist the batch.
/// Producing is at-least-once and there is no way around that here.
pub struct PartitionProducer {
    client: PartitionClient,
    /// 0: no acks, 1: leader only, -1: all in-sync replicas.
    pub acks: i16,
    pub timeout_ms: i32,
}

impl PartitionProducer {
    pub fn new(client: PartitionClient) -> PartitionProducer {
        PartitionProducer {
            client,
            acks: 1,
            timeout_ms: 1000,
        }
    }

    pub fn client(&self) -> &PartitionClient {
        &self.client
    }

    /// Marshal the batch and ship it. Compress the batch first if wanted.
    /// Stamps the batch CRC as a side effect of marshaling.
    pub fn produce(&self, batch: &mut Batch) -> Result<ProducePartitionResponse> {
        self.produce_record_set(batch.marshal())
    }

    /// Ship an already marshaled record set.
    pub fn produce_record_set(&self, record_set: Bytes) -> Result<ProducePartitionResponse> {
        let args = ProduceArgs {
            topic: self.client.topic().to_string(),
            partition: self.client.partition(),
            acks: self.acks,
            timeout_ms: self.timeout_ms,
        };
        let resp = self.client.produce(&args, record_set)?;
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
