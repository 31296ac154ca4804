use crate::bounds::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Work that waits for the page layout to settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredTask {
    /// The container just became visible: recompute its size, then show `view`.
    RefreshAndCenter { view: MapView },
    /// The viewport changed size (fullscreen transition).
    RefreshSize,
}

impl DeferredTask {
    fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub id: TaskId,
    pub task: DeferredTask,
    pub delay_ms: u32,
}

/// One-shot, cancelable tasks. The queue only tracks what is still pending;
/// the host arms a real timer per id and hands the id back when it fires.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    next_id: u64,
    pending: Vec<ScheduledTask>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task`. A pending task of the same kind is superseded and its id
    /// returned alongside the new one so the host can disarm it.
    pub fn schedule(&mut self, task: DeferredTask, delay_ms: u32) -> (TaskId, Option<TaskId>) {
        let superseded = self
            .pending
            .iter()
            .position(|t| t.task.same_kind(&task))
            .map(|idx| self.pending.remove(idx).id);

        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push(ScheduledTask { id, task, delay_ms });
        (id, superseded)
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        before != self.pending.len()
    }

    /// Remove and return the task for a fired timer. Cancelled or already
    /// fired ids yield `None`.
    pub fn take(&mut self, id: TaskId) -> Option<DeferredTask> {
        let idx = self.pending.iter().position(|t| t.id == id)?;
        Some(self.pending.remove(idx).task)
    }

    /// Remove every pending task in scheduling order.
    pub fn drain(&mut self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[ScheduledTask] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
