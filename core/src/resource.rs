use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::engine::SimTime;
use crate::scheduler::ProcessId;

pub type PoolId = usize;

/// Queue length observed right after an admission or departure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueSample {
    pub timestamp: SimTime,
    pub q_len: usize,
    pub in_service: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Granted,
    Queued,
}

/// Capacity-limited server with a FIFO wait queue. Every request and release
/// leaves a [`QueueSample`] behind.
#[derive(Debug)]
pub struct ResourcePool {
    pub name: String,
    capacity: u32,
    busy: u32,
    wait_queue: VecDeque<ProcessId>,
    samples: Vec<QueueSample>,
}

impl ResourcePool {
    pub fn new(name: &str, capacity: u32) -> Self {
        assert!(capacity >= 1, "resource pool {name} needs a capacity of at least 1");
        Self {
            name: name.to_string(),
            capacity,
            busy: 0,
            wait_queue: VecDeque::new(),
            samples: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_service(&self) -> u32 {
        self.busy
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    pub fn samples(&self) -> &[QueueSample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<QueueSample> {
        self.samples
    }

    pub fn request(&mut self, process: ProcessId, now: SimTime) -> Admission {
        let admission = if self.busy < self.capacity {
            self.busy += 1;
            Admission::Granted
        } else {
            self.wait_queue.push_back(process);
            Admission::Queued
        };
        self.record(now);
        admission
    }

    /// Frees one slot and hands it to the longest waiter, which the caller must
    /// resume.
    ///
    /// # Panics
    ///
    /// Releasing a pool with nothing admitted.
    pub fn release(&mut self, now: SimTime) -> Option<ProcessId> {
        assert!(self.busy > 0, "release on idle resource pool {}", self.name);
        self.busy -= 1;
        let next = self.wait_queue.pop_front();
        if next.is_some() {
            self.busy += 1;
        }
        self.record(now);
        next
    }

    fn record(&mut self, now: SimTime) {
        self.samples.push(QueueSample {
            timestamp: now,
            q_len: self.wait_queue.len(),
            in_service: self.busy,
        });
    }
}
