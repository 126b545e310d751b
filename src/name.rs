//! Logical name normalization
//!
//! Every directive argument that refers to a file, section, yield, or stack
//! goes through [`normalize`] before it is used as a map key, so that
//! `@extends('layouts/app')`, `@extends("layouts/app.blade")` and a loader
//! walking `layouts\app.blade` all agree on the same logical name.

/// File extensions recognized as template files. Shared by the loader's
/// directory filter and by [`normalize`]'s extension stripping.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".blade", ".tmpl", ".html", ".gohtml"];

/// Canonicalize a raw directive argument into a logical name.
///
/// Trims surrounding whitespace and quotes, strips a trailing template
/// extension, and converts backslash separators to forward slashes.
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Example
///
/// ```rust
/// use blade_compose::normalize;
///
/// assert_eq!(normalize("  'layouts\\app.blade' "), "layouts/app");
/// assert_eq!(normalize("pages/home"), "pages/home");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut name = raw.trim().trim_matches(|c| c == '\'' || c == '"' || c == ' ');

    // Only known template extensions are stripped. Stripping any final
    // extension (as a naive `Path::extension` would) breaks idempotence and
    // eats dotted names like `jquery.min`.
    for ext in TEMPLATE_EXTENSIONS {
        if name.len() > ext.len() {
            if let Some(stem) = name.strip_suffix(ext) {
                name = stem;
                break;
            }
        }
    }

    name.replace('\\', "/")
}
