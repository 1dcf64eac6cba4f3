//! Integration test runner for unit tests
//! This file makes cargo test discover the unit test modules

#[path = "unit/test_notification.rs"]
mod test_notification;

#[path = "unit/test_capability.rs"]
mod test_capability;
