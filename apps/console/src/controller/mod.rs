//! Controller layer: page state machines, notices and navigation.

pub mod events;
pub mod history;
pub mod navigation;
pub mod submission;

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;
