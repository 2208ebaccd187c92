/// Virtual-clock task scheduler.
///
/// Stands in for wall-clock timers: the owner advances the clock explicitly
/// and pulls due tasks one at a time, so a task scheduled while handling
/// another can still fire within the same advance.  Every task is identified
/// by a `TaskId` that doubles as its cancellation token.
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

#[derive(Clone, Debug)]
struct Task<K> {
    id: TaskId,
    kind: K,
    due: u64,
    /// `Some(period)` for recurring tasks, `None` for one-shots.
    period: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct Scheduler<K> {
    now: u64,
    next_id: u64,
    tasks: Vec<Task<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Scheduler<K> {
    pub fn new() -> Self {
        Scheduler {
            now: 0,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Run `kind` every `period_ms`, first firing one period from now.
    pub fn schedule_every(&mut self, period_ms: u64, kind: K) -> TaskId {
        let period = period_ms.max(1);
        self.push(kind, period, Some(period))
    }

    /// Run `kind` once, `delay_ms` from now.
    pub fn schedule_once(&mut self, delay_ms: u64, kind: K) -> TaskId {
        self.push(kind, delay_ms, None)
    }

    /// Returns `true` if the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before != self.tasks.len()
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Pop the earliest task due at or before `until`, moving the clock to
    /// its due time.  Ties fire in scheduling order.  Recurring tasks are
    /// re-armed one period later.
    pub fn next_due(&mut self, until: u64) -> Option<(TaskId, K)>
    where
        K: Clone,
    {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let task = &mut self.tasks[index];
        self.now = self.now.max(task.due);
        let fired = (task.id, task.kind.clone());
        trace!("task {:?} fired at {} ms", task.id, self.now);

        match task.period {
            Some(period) => task.due += period,
            None => {
                self.tasks.swap_remove(index);
            }
        }
        Some(fired)
    }

    /// Move the clock forward to `until` once every due task was handled.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    fn push(&mut self, kind: K, delay: u64, period: Option<u64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            due: self.now + delay,
            period,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut s = Scheduler::new();
        let id = s.schedule_once(10, "once");
        assert_eq!(s.next_due(9), None);
        assert_eq!(s.next_due(10), Some((id, "once")));
        assert_eq!(s.next_due(100), None);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = Scheduler::new();
        s.schedule_every(0, ());
        assert!(s.next_due(0).is_none());
        assert!(s.next_due(1).is_some());
    }
}
