// Author: Dustin Pilgrim
// License: MIT

pub mod clock;
pub mod daemon_msg;
pub mod error;
pub mod events;
pub mod format;
pub mod info;
pub mod project;
pub mod store;
pub mod subscriptions;
pub mod timer;

#[cfg(test)]
mod timer_tests;
