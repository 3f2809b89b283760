//! Storage traits the services depend on.

pub mod blocklist_store;
