//! Variadic call shapes for the process-wide logger
//!
//! `log!`, `log_with!` and the per-level `info!`/`info_with!` forms join their
//! arguments with single spaces. The `f` variants take a format string.

/// Log space-joined values at a severity on the default logger
///
/// ```ignore
/// fanlog::log!(fanlog::Severity::Info, "served", 200, "in", elapsed_ms);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:expr),+ $(,)?) => {
        $crate::default_entry().log(
            $level,
            &$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

/// Log a formatted message at a severity on the default logger
#[macro_export]
macro_rules! logf {
    ($level:expr, $($arg:tt)+) => {
        $crate::default_entry().logf($level, ::std::format_args!($($arg)+))
    };
}

/// Log space-joined values with fields at a severity on the default logger
#[macro_export]
macro_rules! log_with {
    ($level:expr, $fields:expr, $($arg:expr),+ $(,)?) => {
        $crate::default_entry().log_with(
            $level,
            &$fields,
            &$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

/// Log a formatted message with fields at a severity on the default logger
#[macro_export]
macro_rules! logf_with {
    ($level:expr, $fields:expr, $($arg:tt)+) => {
        $crate::default_entry().logf_with($level, &$fields, ::std::format_args!($($arg)+))
    };
}

/// Log space-joined values at debug level on the default logger
///
/// ```ignore
/// fanlog::debug!("cache", "miss", key);
/// fanlog::debug_with!(fields, "cache miss");
/// fanlog::debugf_with!(fields, "cache miss after {}ms", elapsed);
/// ```

#[macro_export]
macro_rules! debug {
    ($($arg:expr),+ $(,)?) => {
        $crate::debug(&$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug_with {
    ($fields:expr, $($arg:expr),+ $(,)?) => {
        $crate::debug_with(
            &$fields,
            &$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

#[macro_export]
macro_rules! debugf_with {
    ($fields:expr, $($arg:tt)+) => {
        $crate::debugf_with(&$fields, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:expr),+ $(,)?) => {
        $crate::info(&$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! info_with {
    ($fields:expr, $($arg:expr),+ $(,)?) => {
        $crate::info_with(
            &$fields,
            &$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

#[macro_export]
macro_rules! infof_with {
    ($fields:expr, $($arg:tt)+) => {
        $crate::infof_with(&$fields, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:expr),+ $(,)?) => {
        $crate::warn(&$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warn_with {
    ($fields:expr, $($arg:expr),+ $(,)?) => {
        $crate::warn_with(
            &$fields,
            &$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

#[macro_export]
macro_rules! warnf_with {
    ($fields:expr, $($arg:tt)+) => {
        $crate::warnf_with(&$fields, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:expr),+ $(,)?) => {
        $crate::error(&$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::errorf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! error_with {
    ($fields:expr, $($arg:expr),+ $(,)?) => {
        $crate::error_with(
            &$fields,
            &$crate::Joined(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
}

#[macro_export]
macro_rules! errorf_with {
    ($fields:expr, $($arg:tt)+) => {
        $crate::errorf_with(&$fields, ::std::format_args!($($arg)+))
    };
}
