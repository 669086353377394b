//! Metadata API types (key 3, version 5).

use std::collections::HashMap;

use crate::api::{self, Request};
use crate::wire::wire_struct;

pub const VERSION: i16 = 5;

pub fn request(topics: &[&str]) -> Request<MetadataRequest> {
    Request::new(
        api::METADATA,
        VERSION,
        MetadataRequest {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            allow_auto_topic_creation: false,
        },
    )
}

wire_struct! {
    pub struct MetadataRequest {
        pub topics: Vec<String>,
        pub allow_auto_topic_creation: bool,
    }
}

wire_struct! {
    pub struct MetadataResponse {
        pub throttle_time_ms: i32,
        pub brokers: Vec<Broker>,
        pub cluster_id: String,
        pub controller_id: i32,
        pub topic_metadata: Vec<TopicMetadata>,
    }
}

wire_struct! {
    pub struct Broker {
        pub node_id: i32,
        pub host: String,
        pub port: i32,
        pub rack: String,
    }
}

wire_struct! {
    pub struct TopicMetadata {
        pub error_code: i16,
        pub topic: String,
        pub is_internal: bool,
        pub partition_metadata: Vec<PartitionMetadata>,
    }
}

wire_struct! {
    pub struct PartitionMetadata {
        pub error_code: i16,
        pub partition: i32,
        pub leader: i32,
        pub replicas: Vec<i32>,
        pub isr: Vec<i32>,
        pub offline_replicas: Vec<i32>,
    }
}

impl Broker {
    /// `host:port`, suitable for dialing.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.rack, self.node_id, self.host, self.port
        )
    }
}

impl MetadataResponse {
    pub fn broker(&self, node_id: i32) -> Option<&Broker> {
        self.brokers.iter().find(|b| b.node_id == node_id)
    }

    /// Partition metadata for a topic, keyed by partition number. Empty
    /// when the topic has no metadata entry.
    pub fn partitions(&self, topic: &str) -> HashMap<i32, &PartitionMetadata> {
        self.topic_metadata
            .iter()
            .filter(|t| t.topic == topic)
            .flat_map(|t| t.partition_metadata.iter())
            .map(|p| (p.partition, p))
            .collect()
    }

    /// Partition leaders for a topic. Partitions whose leader is not in
    /// the broker list are left out.
    pub fn leaders(&self, topic: &str) -> HashMap<i32, Broker> {
        let mut leaders = HashMap::new();
        for t in self.topic_metadata.iter().filter(|t| t.topic == topic) {
            for p in &t.partition_metadata {
                if let Some(broker) = self.broker(p.leader) {
                    leaders.insert(p.partition, broker.clone());
                }
            }
        }
        leaders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{from_bytes, to_bytes};

    fn sample() -> MetadataResponse {
        MetadataResponse {
            throttle_time_ms: 0,
            brokers: vec![
                Broker {
                    node_id: 1,
                    host: "b1".to_string(),
                    port: 9092,
                    rack: String::new(),
                },
                Broker {
                    node_id: 2,
                    host: "b2".to_string(),
                    port: 9092,
                    rack: "r2".to_string(),
                },
            ],
            cluster_id: "cluster".to_string(),
            controller_id: 1,
            topic_metadata: vec![TopicMetadata {
                error_code: 0,
                topic: "events".to_string(),
                is_internal: false,
                partition_metadata: vec![
                    PartitionMetadata {
                        error_code: 0,
                        partition: 0,
                        leader: 1,
                        replicas: vec![1, 2],
                        isr: vec![1, 2],
                        offline_replicas: vec![],
                    },
                    PartitionMetadata {
                        error_code: 0,
                        partition: 1,
                        leader: 9, // not in the broker list
                        replicas: vec![],
                        isr: vec![],
                        offline_replicas: vec![],
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_round_trip() {
        let resp = sample();
        let back: MetadataResponse = from_bytes(to_bytes(&resp)).unwrap();
        assert_eq!(back, resp);
    }

    #[test]
    fn test_leader_lookup() {
        let resp = sample();
        assert_eq!(resp.broker(2).unwrap().addr(), "b2:9092");
        let partitions = resp.partitions("events");
        assert_eq!(partitions.len(), 2);
        let leaders = resp.leaders("events");
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[&0].node_id, 1);
        assert!(resp.partitions("missing").is_empty());
    }

    #[test]
    fn test_broker_display() {
        let b = Broker {
            node_id: 1,
            host: "bar".to_string(),
            port: 9092,
            rack: "foo".to_string(),
        };
        assert_eq!(b.to_string(), "foo:1:bar:9092");
    }
}
