// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Work Queue
//!
//! A FIFO job queue shared by all workers, with an explicit completion
//! barrier. A queue that is momentarily empty is not finished: another
//! worker may be mid-expansion and about to push children. The queue
//! therefore tracks how many dequeued jobs are still being processed, and
//! `next` only reports exhaustion when the deque is empty *and* no job is in
//! flight.
//!
//! Every dequeued job comes with an `InFlight` guard. Dropping the guard
//! (after the job's children have been pushed, or during unwinding) releases
//! the job and wakes idle workers if the queue just became quiescent.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

#[derive(Debug)]
struct QueueState<T> {
    jobs: VecDeque<T>,
    in_flight: usize,
}

#[derive(Debug)]
pub struct WorkQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                in_flight: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Enqueues `job` and returns the queue depth afterwards.
    pub fn push(&self, job: T) -> usize {
        let depth = {
            let mut state = self.state.lock();
            state.jobs.push_back(job);
            state.jobs.len()
        };
        self.available.notify_one();
        depth
    }

    /// Enqueues every job of `jobs` in order and returns the queue depth
    /// afterwards.
    pub fn push_all<I>(&self, jobs: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let (pushed, depth) = {
            let mut state = self.state.lock();
            let before = state.jobs.len();
            state.jobs.extend(jobs);
            (state.jobs.len() - before, state.jobs.len())
        };
        match pushed {
            0 => {}
            1 => {
                self.available.notify_one();
            }
            _ => {
                self.available.notify_all();
            }
        }
        depth
    }

    /// Blocks until a job is available or the queue is quiescent.
    ///
    /// Returns `None` only once the deque is empty and no other job is in
    /// flight; every caller blocked in `next` is then released as well.
    pub fn next(&self) -> Option<(T, InFlight<'_, T>)> {
        let mut state = self.state.lock();
        loop {
            if let Some(job) = state.jobs.pop_front() {
                state.in_flight += 1;
                return Some((job, InFlight { queue: self }));
            }
            if state.in_flight == 0 {
                drop(state);
                self.available.notify_all();
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Number of queued jobs, not counting those in flight.
    pub fn len(&self) -> usize {
        self.state.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().jobs.is_empty()
    }

    /// Number of dequeued jobs whose guard is still alive.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight
    }

    fn release(&self) {
        let quiescent = {
            let mut state = self.state.lock();
            debug_assert!(
                state.in_flight > 0,
                "called `WorkQueue::release` with no job in flight"
            );
            state.in_flight -= 1;
            state.in_flight == 0 && state.jobs.is_empty()
        };
        if quiescent {
            self.available.notify_all();
        }
    }
}

/// Marks one dequeued job as in flight until dropped.
#[derive(Debug)]
#[must_use = "dropping the guard releases the job immediately"]
pub struct InFlight<'a, T> {
    queue: &'a WorkQueue<T>,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.queue.release();
    }
}
