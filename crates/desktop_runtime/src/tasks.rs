//! Cancellable background work bound to windows and file items.
//!
//! Each task gets a ticket and its future is wrapped in [`Abortable`]. When the bound window
//! closes or the item leaves the tree, the task is aborted and its ticket retired, so a late
//! completion can be recognized as stale and dropped.

use std::{collections::HashMap, future::Future};

use futures::future::{AbortHandle, Abortable};

use crate::{model::WindowId, vfs::ItemId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskTicket(u64);

/// What a background task produces data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskTarget {
    Window(WindowId),
    Item(ItemId),
}

#[derive(Debug, Default)]
pub struct TaskRegistry {
    next_ticket: u64,
    live: HashMap<TaskTicket, (TaskTarget, AbortHandle)>,
}

impl TaskRegistry {
    /// Registers a task for `target` and returns its ticket with the abortable future to spawn.
    pub fn begin<F: Future>(&mut self, target: TaskTarget, future: F) -> (TaskTicket, Abortable<F>) {
        let (handle, registration) = AbortHandle::new_pair();
        self.next_ticket = self.next_ticket.saturating_add(1);
        let ticket = TaskTicket(self.next_ticket);
        self.live.insert(ticket, (target, handle));
        (ticket, Abortable::new(future, registration))
    }

    pub fn is_live(&self, ticket: TaskTicket) -> bool {
        self.live.contains_key(&ticket)
    }

    pub fn target(&self, ticket: TaskTicket) -> Option<TaskTarget> {
        self.live.get(&ticket).map(|(target, _)| *target)
    }

    /// Retires a completed ticket. Returns its target, or `None` if the ticket was not live.
    pub fn finish(&mut self, ticket: TaskTicket) -> Option<TaskTarget> {
        self.live.remove(&ticket).map(|(target, _)| target)
    }

    pub fn cancel(&mut self, ticket: TaskTicket) -> bool {
        match self.live.remove(&ticket) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Aborts every task bound to `target` and returns how many were cancelled.
    pub fn cancel_for(&mut self, target: TaskTarget) -> usize {
        let stale: Vec<TaskTicket> = self
            .live
            .iter()
            .filter(|(_, (bound, _))| *bound == target)
            .map(|(ticket, _)| *ticket)
            .collect();
        for ticket in &stale {
            self.cancel(*ticket);
        }
        stale.len()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
