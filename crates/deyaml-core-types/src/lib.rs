//! Core types shared across deyaml facilities
//!
//! This crate provides the canonical field keys and event names used by
//! both the error and logging facilities, so every crate in the workspace
//! emits the same structured schema.

pub mod schema;
