//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores for services that persist one small
//! JSON document instead of a database.

pub mod json_document_store;
