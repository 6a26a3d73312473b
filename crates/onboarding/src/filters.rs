//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders `"checked"` for a true value, nothing otherwise.
///
/// Usage in templates: `<input type="checkbox" {{ draft.show_phone|checked }}>`
#[askama::filter_fn]
pub fn checked(value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(if value.to_string() == "true" {
        "checked"
    } else {
        ""
    })
}
