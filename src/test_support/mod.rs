//! Shared fixtures for unit tests.

pub mod fake_store;
pub mod socket_guard;
