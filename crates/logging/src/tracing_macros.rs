//! crates/logging/src/tracing_macros.rs
//! Convenience macros for reconciliation tracing.
//!
//! Each macro forwards to a standard tracing macro with a fixed target so the
//! subsystems can be filtered independently (for example
//! `RUST_LOG=filestate::own=debug`). The first token selects the level.

/// Emit a permission-bits trace.
///
/// # Example
/// ```ignore
/// trace_perms!(info, path = %path.display(), "chmod {:o}", mode);
/// ```
#[macro_export]
macro_rules! trace_perms {
    ($level:ident, $($arg:tt)*) => {
        $crate::__tracing::$level!(target: "filestate::perms", $($arg)*);
    };
}

/// Emit an owner trace.
///
/// # Example
/// ```ignore
/// trace_own!(debug, uid, "owner already matches");
/// ```
#[macro_export]
macro_rules! trace_own {
    ($level:ident, $($arg:tt)*) => {
        $crate::__tracing::$level!(target: "filestate::own", $($arg)*);
    };
}

/// Emit a group trace.
///
/// # Example
/// ```ignore
/// trace_group!(info, gid, "changing group");
/// ```
#[macro_export]
macro_rules! trace_group {
    ($level:ident, $($arg:tt)*) => {
        $crate::__tracing::$level!(target: "filestate::group", $($arg)*);
    };
}

/// Emit a content trace.
///
/// # Example
/// ```ignore
/// trace_content!(info, bytes = body.len(), "rewriting content");
/// ```
#[macro_export]
macro_rules! trace_content {
    ($level:ident, $($arg:tt)*) => {
        $crate::__tracing::$level!(target: "filestate::content", $($arg)*);
    };
}
