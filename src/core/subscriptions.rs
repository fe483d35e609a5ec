// Author: Dustin Pilgrim
// License: MIT

use std::collections::BTreeSet;

use crate::core::events::HostEvent;

/// One-shot subscriptions to host notifications.
///
/// A handler fires at most once per arming; it has to be re-armed by a
/// (re)initialisation before it sees the same notification again.
#[derive(Debug, Default, Clone)]
pub struct Subscriptions {
    armed: BTreeSet<HostEvent>,
}

impl Subscriptions {
    pub fn arm_all(&mut self) {
        self.armed.extend(HostEvent::ALL);
    }

    pub fn unsubscribe(&mut self, event: HostEvent) {
        self.armed.remove(&event);
    }

    pub fn is_armed(&self, event: HostEvent) -> bool {
        self.armed.contains(&event)
    }

    pub fn armed(&self) -> Vec<HostEvent> {
        self.armed.iter().copied().collect()
    }
}
