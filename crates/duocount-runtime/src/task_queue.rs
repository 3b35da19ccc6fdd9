#![forbid(unsafe_code)]

//! Deadline-ordered queue of deferred tasks.
//!
//! Hosts own the clock, so the queue never reads time itself: callers pass
//! `now` into [`TaskQueue::schedule`] and [`TaskQueue::pop_due`]. Tasks with
//! equal deadlines come out in scheduling order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use web_time::Duration;

use crate::effect;
use crate::program::Task;

struct Entry<M> {
    deadline: Duration,
    seq: u64,
    task: Task<M>,
}

impl<M> PartialEq for Entry<M> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<M> Eq for Entry<M> {}

impl<M> PartialOrd for Entry<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap; reverse so the earliest deadline pops first.
impl<M> Ord for Entry<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A task whose deadline has passed.
#[derive(Debug)]
pub struct DueTask<M> {
    pub deadline: Duration,
    pub task: Task<M>,
}

impl<M> DueTask<M> {
    /// Run the task, recording how late it was relative to `now`.
    pub fn resolve(self, now: Duration) -> M {
        let lateness = now.saturating_sub(self.deadline);
        effect::record_task_completed(self.task.label(), lateness.as_millis() as u64);
        self.task.run()
    }
}

/// Pending tasks keyed by `(deadline, sequence)`.
pub struct TaskQueue<M> {
    heap: BinaryHeap<Entry<M>>,
    next_seq: u64,
}

impl<M> TaskQueue<M> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Park `task` until `now + task.delay()`. Returns the deadline.
    pub fn schedule(&mut self, now: Duration, task: Task<M>) -> Duration {
        let deadline = now.saturating_add(task.delay());
        effect::record_task_scheduled(
            task.label(),
            now.as_millis() as u64,
            task.delay().as_millis() as u64,
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            deadline,
            seq,
            task,
        });
        tracing::trace!(
            target: "duocount.runtime",
            deadline_ms = deadline.as_millis() as u64,
            pending = self.heap.len(),
            "task queued"
        );
        deadline
    }

    /// Remove and return the earliest task due at `now`.
    ///
    /// Cancelled tasks encountered on the way are dropped and never returned.
    pub fn pop_due(&mut self, now: Duration) -> Option<DueTask<M>> {
        while self.heap.peek().is_some_and(|e| e.deadline <= now) {
            let entry = self.heap.pop()?;
            if entry.task.is_cancelled() {
                effect::record_task_cancelled(entry.task.label());
                continue;
            }
            return Some(DueTask {
                deadline: entry.deadline,
                task: entry.task,
            });
        }
        None
    }

    /// Earliest deadline among tasks that have not been cancelled.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|e| !e.task.is_cancelled())
            .map(|e| e.deadline)
            .min()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<M> Default for TaskQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for TaskQueue<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("len", &self.heap.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::CancellationSource;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn task(label: &'static str, delay: u64, out: u32) -> Task<u32> {
        Task::new(label, ms(delay), move || out)
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut q = TaskQueue::new();
        assert_eq!(q.schedule(ms(0), task("a", 1000, 1)), ms(1000));
        assert!(q.pop_due(ms(999)).is_none());
        assert_eq!(q.len(), 1);
        let due = q.pop_due(ms(1000)).expect("due at deadline");
        assert_eq!(due.resolve(ms(1000)), 1);
        assert!(q.is_empty());
    }

    #[test]
    fn earliest_deadline_first() {
        let mut q = TaskQueue::new();
        q.schedule(ms(0), task("slow", 500, 1));
        q.schedule(ms(0), task("fast", 100, 2));
        q.schedule(ms(50), task("mid", 200, 3));

        assert_eq!(q.next_deadline(), Some(ms(100)));
        let order: Vec<u32> = std::iter::from_fn(|| q.pop_due(ms(1000)))
            .map(|d| d.resolve(ms(1000)))
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let mut q = TaskQueue::new();
        for i in 0..5 {
            q.schedule(ms(0), task("tie", 10, i));
        }
        let order: Vec<u32> = std::iter::from_fn(|| q.pop_due(ms(10)))
            .map(|d| d.resolve(ms(10)))
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn cancelled_tasks_are_skipped() {
        let mut q = TaskQueue::new();
        let source = CancellationSource::new();
        q.schedule(ms(0), task("stale", 10, 1).with_cancellation(source.token()));
        q.schedule(ms(0), task("fresh", 20, 2));
        source.cancel();

        assert_eq!(q.next_deadline(), Some(ms(20)));
        let due = q.pop_due(ms(30)).expect("fresh task");
        assert_eq!(due.task.label(), "fresh");
        assert!(q.pop_due(ms(30)).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn cancelled_task_not_yet_due_stays_queued() {
        let mut q = TaskQueue::new();
        let source = CancellationSource::new();
        q.schedule(ms(0), task("stale", 100, 1).with_cancellation(source.token()));
        source.cancel();
        assert_eq!(q.next_deadline(), None);
        assert!(q.pop_due(ms(50)).is_none());
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(ms(100)).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn deadline_saturates() {
        let mut q = TaskQueue::new();
        let deadline = q.schedule(Duration::MAX, task("late", 1, 0));
        assert_eq!(deadline, Duration::MAX);
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = TaskQueue::default();
        q.schedule(ms(0), task("a", 1, 0));
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.next_deadline(), None);
    }
}
