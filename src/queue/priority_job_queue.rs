// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Priority ordering for a single named job queue.
//!
//! Jobs are ordered by:
//! 1. **Priority** (higher = claimed first)
//! 2. **Arrival** (earlier enqueue = claimed first among equal priorities)
//!
//! # Examples
//!
//! ```rust
//! use vcon_pipeline::queue::{PipelineJob, PriorityJobQueue};
//!
//! let mut queue = PriorityJobQueue::new();
//! let low = PipelineJob::new("low", vec![]);
//! let high = PipelineJob::new("high", vec![]).with_priority(5);
//! queue.push(low.clone());
//! queue.push(high.clone());
//!
//! assert_eq!(queue.pop().map(|job| job.id), Some(high.id));
//! assert_eq!(queue.pop().map(|job| job.id), Some(low.id));
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::queue::PipelineJob;

/// A job plus its arrival sequence within the queue.
#[derive(Debug, Clone)]
struct QueuedJob {
    job: PipelineJob,
    sequence: u64,
}

impl PartialEq for QueuedJob {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedJob {}

impl PartialOrd for QueuedJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedJob {
    /// BinaryHeap is a max-heap: higher priority pops first, then the lower
    /// (earlier) sequence number.
    fn cmp(&self, other: &Self) -> Ordering {
        match self.job.priority.cmp(&other.job.priority) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            other_ordering => other_ordering,
        }
    }
}

/// Max-heap of jobs, FIFO among equal priorities.
#[derive(Debug, Default)]
pub struct PriorityJobQueue {
    heap: BinaryHeap<QueuedJob>,
    next_sequence: u64,
}

impl PriorityJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: PipelineJob) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(QueuedJob { job, sequence });
    }

    pub fn pop(&mut self) -> Option<PipelineJob> {
        self.heap.pop().map(|queued| queued.job)
    }

    /// Highest priority job without removing it
    pub fn peek(&self) -> Option<&PipelineJob> {
        self.heap.peek().map(|queued| &queued.job)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
