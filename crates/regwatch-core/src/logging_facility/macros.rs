//! Operation-boundary logging macros.
//!
//! Every store, diff and report operation logs its start and its end
//! (or failure) through these so events carry the same field names. Extra
//! `tracing` fields may follow the required arguments.

/// `start` event for an operation.
///
/// ```
/// # use regwatch_core::log_op_start;
/// log_op_start!("record");
/// log_op_start!("record", document_id = "far", section_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)+)?
        );
    };
}

/// `end` event for an operation that succeeded.
///
/// ```
/// # use regwatch_core::log_op_end;
/// log_op_end!("diff", duration_ms = 3);
/// log_op_end!("diff", duration_ms = 3, change_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        );
    };
}

/// `end_error` event carrying the error's kind, stable code and message.
///
/// The error may be anything convertible into `ExError`.
///
/// ```
/// # use regwatch_core::{log_op_error, errors::RegwatchError};
/// log_op_error!("record", RegwatchError::EmptySectionId, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            $($($field)+)?
        );
    }};
}
