#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use queue_bridge::messaging::rabbitmq::{DeliveryStream, QueueClient, QueueDelivery, RabbitMQError};

/// 記錄所有呼叫的佇列客戶端，不需要真正的 RabbitMQ
#[derive(Default)]
pub struct RecordingClient {
    pub registrations: Mutex<Vec<(String, String, String)>>,
    pub published: Mutex<Vec<(String, String, Vec<u8>)>>,
    pub consumers: Mutex<Vec<(String, String, bool)>>,
    pub acked: Mutex<Vec<u64>>,
    pub commits: AtomicUsize,
    pub closed: AtomicBool,
    pub fail_publish: AtomicBool,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let client = Self::default();
        client.fail_publish.store(true, Ordering::SeqCst);
        Arc::new(client)
    }

    pub fn published(&self) -> Vec<(String, String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> Vec<(String, String, String)> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueClient for RecordingClient {
    async fn register(&self, exchange: &str, queue: &str, key_pattern: &str) -> Result<(), RabbitMQError> {
        self.registrations
            .lock()
            .unwrap()
            .push((exchange.to_string(), queue.to_string(), key_pattern.to_string()));
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn publish(&self, exchange: &str, routing_key: &str, body: &[u8]) -> Result<(), RabbitMQError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(RabbitMQError::from("broker unavailable"));
        }
        self.published
            .lock()
            .unwrap()
            .push((exchange.to_string(), routing_key.to_string(), body.to_vec()));
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn consume(&self, queue: &str, consumer: &str, auto_ack: bool) -> Result<DeliveryStream, RabbitMQError> {
        self.consumers
            .lock()
            .unwrap()
            .push((queue.to_string(), consumer.to_string(), auto_ack));
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(stream::pending().boxed())
    }

    async fn ack(&self, delivery: &QueueDelivery) -> Result<(), RabbitMQError> {
        self.acked.lock().unwrap().push(delivery.delivery_tag);
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn commit(&self) -> Result<(), RabbitMQError> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), RabbitMQError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
