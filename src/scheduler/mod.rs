// Copyright (c) 2024 Mike Tsao

//! A single-threaded cooperative scheduler.
//!
//! Multi-step work such as "load the rows, post an event, wait a second, post
//! another event" is written as a [Task]: a small state machine whose
//! [Task::poll()] does as much as it can and then says when it wants to run
//! again. The host drives everything by calling
//! [ProximityController::tick()](crate::ProximityController::tick()) once per
//! frame, which advances the clock and polls every task that's due.
//!
//! There are no threads or locks. A task gets exclusive access to the rule
//! repository and the host for the duration of its poll, and the task that
//! starts a load cycle is the only one that writes that cycle's results.

use crate::{
    detection::RuleRepository,
    traits::Host,
    types::Seconds,
    util::{ControllerSettings, Rng},
};
use core::fmt::Debug;

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Scheduler, Task, TaskContext, TaskStatus};
}

/// What a [Task] wants after a poll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TaskStatus {
    /// Poll again on the next pump.
    Yield,
    /// Poll again once this much time has passed.
    Sleep(Seconds),
    /// The task is complete and can be dropped.
    Done,
}

/// A suspendable unit of work. See the [module documentation](self).
pub trait Task: Debug {
    /// Does as much work as possible without waiting.
    fn poll(&mut self, cx: &mut TaskContext) -> TaskStatus;
}

/// Everything a [Task] may touch while it's being polled.
pub struct TaskContext<'a> {
    /// The scheduler's clock at the start of this pump.
    pub now: Seconds,
    /// Audio, spatial, and fetch capabilities.
    pub host: &'a mut dyn Host,
    /// The rules and their loaded rows and curves.
    pub rules: &'a mut RuleRepository,
    /// Source of parameter jitter.
    pub rng: &'a mut Rng,
    #[allow(missing_docs)]
    pub settings: &'a ControllerSettings,

    spawned: Vec<Box<dyn Task>>,
}
impl<'a> TaskContext<'a> {
    #[allow(missing_docs)]
    pub fn new_with(
        now: Seconds,
        host: &'a mut dyn Host,
        rules: &'a mut RuleRepository,
        rng: &'a mut Rng,
        settings: &'a ControllerSettings,
    ) -> Self {
        Self {
            now,
            host,
            rules,
            rng,
            settings,
            spawned: Vec::default(),
        }
    }

    /// Starts a new task. It is first polled on the next pump.
    pub fn spawn(&mut self, task: Box<dyn Task>) {
        self.spawned.push(task);
    }
}

#[derive(Debug)]
struct TaskSlot {
    task: Box<dyn Task>,
    wake_at: Seconds,
}

/// Owns the clock and the set of live tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Seconds,
    slots: Vec<TaskSlot>,
}
impl Scheduler {
    /// The scheduler's notion of the current time: the sum of every
    /// [Scheduler::advance()] so far.
    pub fn now(&self) -> Seconds {
        self.now
    }

    /// Moves the clock forward. Negative deltas are ignored.
    pub fn advance(&mut self, delta: Seconds) {
        self.now = self.now.plus(delta.max(Seconds::zero()));
    }

    /// Adds a task that will be polled on the next pump.
    pub fn spawn(&mut self, task: Box<dyn Task>) {
        self.slots.push(TaskSlot {
            task,
            wake_at: self.now,
        });
    }

    /// The number of tasks that haven't finished.
    pub fn pending_task_count(&self) -> usize {
        self.slots.len()
    }

    /// Polls each task that is due, once, in the order they were spawned.
    /// Tasks spawned during the pump join the set afterward.
    pub fn pump(&mut self, cx: &mut TaskContext) {
        cx.now = self.now;
        for mut slot in core::mem::take(&mut self.slots) {
            if !slot.wake_at.is_due(self.now) {
                self.slots.push(slot);
                continue;
            }
            match slot.task.poll(cx) {
                TaskStatus::Yield => {
                    slot.wake_at = self.now;
                    self.slots.push(slot);
                }
                TaskStatus::Sleep(duration) => {
                    slot.wake_at = self.now.plus(duration);
                    self.slots.push(slot);
                }
                TaskStatus::Done => {}
            }
        }
        for task in cx.spawned.drain(..) {
            self.slots.push(TaskSlot {
                task,
                wake_at: self.now,
            });
        }
    }
}
