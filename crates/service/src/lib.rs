//! Service layer for the extension blocklist.
//! - `domain`: the persisted document and normalization rules.
//! - `storage`/`file`: the JSON file the document lives in.
//! - `services`: validation and the six blocklist operations.

pub mod errors;
pub mod domain;
pub mod runtime;
pub mod storage;
pub mod repository;
pub mod file;
pub mod services;
