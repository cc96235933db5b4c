//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across the store, the diff
//! engine and the CLI so log queries do not depend on call sites.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_DOCUMENT_ID: &str = "document_id";
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";
pub const FIELD_SECTION_ID: &str = "section_id";
pub const FIELD_FINGERPRINT: &str = "fingerprint";
pub const FIELD_VERSION_LABEL: &str = "version_label";

// Collection sizes
pub const FIELD_SECTION_COUNT: &str = "section_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
