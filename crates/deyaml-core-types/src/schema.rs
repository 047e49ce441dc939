//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Input location
pub const FIELD_DOCUMENT: &str = "document";
pub const FIELD_FILE: &str = "file";

// Collection sizes
pub const FIELD_NAMESPACE_COUNT: &str = "namespace_count";
pub const FIELD_ALIASED_COUNT: &str = "aliased_count";
pub const FIELD_OBJECT_COUNT: &str = "object_count";
pub const FIELD_OUTPUT_LEN: &str = "output_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
