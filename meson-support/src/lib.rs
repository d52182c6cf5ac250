use std::borrow::Cow;
use std::fmt;

fn escape_single_quotes(input: &str) -> Cow<'_, str> {
    if input.contains('\'') {
        Cow::Owned(input.replace('\'', "\\'"))
    } else {
        Cow::Borrowed(input)
    }
}

fn format_operation_error(
    area: &str,
    operation: &str,
    target: Option<&str>,
    error: impl fmt::Display,
) -> String {
    match target {
        Some(target) => {
            let escaped = escape_single_quotes(target);
            format!("{area}.{operation}('{}') failed: {error}", escaped)
        }
        None => format!("{area}.{operation} failed: {error}"),
    }
}

/// Message for a failed filesystem operation on `path`.
pub fn fs_error(operation: &str, path: &str, error: impl fmt::Display) -> String {
    format_operation_error("fs", operation, Some(path), error)
}

/// Message for a build file that could not be parsed.
pub fn parse_error(path: &str, error: impl fmt::Display) -> String {
    format_operation_error("parser", "parse", Some(path), error)
}

pub fn config_error(path: &str, error: impl fmt::Display) -> String {
    format_operation_error("config", "load", Some(path), error)
}

pub fn cli_error(operation: &str, error: impl fmt::Display) -> String {
    format_operation_error("cli", operation, None, error)
}

pub fn cli_target_error(operation: &str, target: &str, error: impl fmt::Display) -> String {
    format_operation_error("cli", operation, Some(target), error)
}
