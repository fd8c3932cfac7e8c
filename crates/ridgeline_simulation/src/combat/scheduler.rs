//! TimerQueue: отложенные callbacks с отменой.
//!
//! Время: секунды симуляции (`Time<Fixed>::elapsed_secs`). Очередь всегда
//! отсортирована по времени срабатывания; при равенстве срабатывает раньше
//! запланированный.

/// Handle of a scheduled callback (for cancellation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    at: f32,
    handle: TimerHandle,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to fire at simulation time `at`.
    pub fn schedule(&mut self, at: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let index = self.pending.partition_point(|entry| entry.at <= at);
        self.pending.insert(index, Scheduled { at, handle, payload });
        handle
    }

    /// Cancel one callback. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        self.pending.len() != before
    }

    /// Remove and return every callback due at `now`, in firing order.
    pub fn drain_due(&mut self, now: f32) -> Vec<T> {
        let due = self.pending.partition_point(|entry| entry.at <= now);
        self.pending.drain(..due).map(|entry| entry.payload).collect()
    }

    pub fn next_due(&self) -> Option<f32> {
        self.pending.first().map(|entry| entry.at)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
