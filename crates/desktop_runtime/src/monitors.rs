//! Registry of virtual displays windows can be placed on.
//!
//! The registry always holds at least one monitor and exactly one primary monitor. Window
//! reassignment after a removal is the reducer's job; the registry only reports the fallback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Monitor, MonitorId, MonitorSpec, Point, Size};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor not found")]
    NotFound,
    #[error("cannot remove the last monitor")]
    LastMonitor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRegistry {
    monitors: Vec<Monitor>,
    active: MonitorId,
    next_id: u64,
}

impl Default for MonitorRegistry {
    fn default() -> Self {
        let primary = Monitor {
            id: MonitorId(1),
            name: "Primary Display".to_string(),
            primary: true,
            resolution: Size::new(1920.0, 1080.0),
            position: Point::default(),
            scale_factor: 1.0,
            active: true,
        };
        Self {
            monitors: vec![primary],
            active: MonitorId(1),
            next_id: 2,
        }
    }
}

impl MonitorRegistry {
    pub fn all(&self) -> &[Monitor] {
        &self.monitors
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn get(&self, id: MonitorId) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MonitorId) -> bool {
        self.get(id).is_some()
    }

    pub fn active_id(&self) -> MonitorId {
        self.active
    }

    pub fn primary(&self) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.primary)
    }

    /// Primary monitor, or the first one when no primary is marked.
    pub fn fallback_id(&self) -> Option<MonitorId> {
        self.primary()
            .or_else(|| self.monitors.first())
            .map(|m| m.id)
    }

    pub fn add(&mut self, spec: MonitorSpec) -> MonitorId {
        let id = MonitorId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        if spec.primary {
            for monitor in &mut self.monitors {
                monitor.primary = false;
            }
        }
        self.monitors.push(Monitor {
            id,
            name: spec.name,
            primary: spec.primary,
            resolution: spec.resolution,
            position: spec.position,
            scale_factor: spec.scale_factor,
            active: false,
        });
        id
    }

    /// Removes `id` and returns the monitor that inherits its windows.
    ///
    /// # Errors
    ///
    /// Fails when `id` is unknown or is the only remaining monitor.
    pub fn remove(&mut self, id: MonitorId) -> Result<MonitorId, MonitorError> {
        let index = self
            .monitors
            .iter()
            .position(|m| m.id == id)
            .ok_or(MonitorError::NotFound)?;
        if self.monitors.len() == 1 {
            return Err(MonitorError::LastMonitor);
        }
        self.monitors.remove(index);

        let fallback = self.fallback_id().ok_or(MonitorError::LastMonitor)?;
        if self.primary().is_none() {
            self.mark_primary(fallback);
        }
        if self.active == id {
            self.mark_active(fallback);
        }
        Ok(fallback)
    }

    /// # Errors
    ///
    /// Fails when `id` is unknown.
    pub fn set_primary(&mut self, id: MonitorId) -> Result<(), MonitorError> {
        if !self.contains(id) {
            return Err(MonitorError::NotFound);
        }
        self.mark_primary(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails when `id` is unknown.
    pub fn set_active(&mut self, id: MonitorId) -> Result<(), MonitorError> {
        if !self.contains(id) {
            return Err(MonitorError::NotFound);
        }
        self.mark_active(id);
        Ok(())
    }

    fn mark_primary(&mut self, id: MonitorId) {
        for monitor in &mut self.monitors {
            monitor.primary = monitor.id == id;
        }
    }

    fn mark_active(&mut self, id: MonitorId) {
        self.active = id;
        for monitor in &mut self.monitors {
            monitor.active = monitor.id == id;
        }
    }
}
