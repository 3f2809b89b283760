//! File-backed implementations of the storage traits.

pub mod extension_store;
