//! Blade Compose - a Blade-style template composition compiler
//!
//! This library flattens a set of template files written with
//! inheritance-style directives (`@extends`, `@section`, `@yield`,
//! `@include`, `@stack`, `@push`) into self-contained texts in the primitive
//! named-block syntax of a downstream template engine
//! (`{{ define "name" }}...{{ end }}` / `{{ template "name" data }}`). It
//! never evaluates expressions or renders with real data; that is the
//! engine's job.
//!
//! # Example
//!
//! ```rust
//! use blade_compose::compose_sources;
//!
//! let out = compose_sources(
//!     [
//!         ("layouts/app", "<title>@yield('title', 'Untitled')</title>"),
//!         ("home", "@extends('layouts/app')@section('title', 'Home')"),
//!     ],
//!     "home",
//! )
//! .unwrap();
//!
//! assert!(out.contains(r#"{{ define "__yield_title" }}Home{{ end }}"#));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod name;
pub mod resolver;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{BlockKind, ParseError, Span};
pub use extract::{extract, ParsedFile};
pub use name::{normalize, TEMPLATE_EXTENSIONS};
pub use resolver::{
    compose, resolve, CompileContext, ResolveError, YieldInfo, PARTIAL_PREFIX, STACK_PREFIX,
    YIELD_PREFIX,
};

use std::collections::HashMap;

use thiserror::Error;

/// Errors that can occur across the whole compile pipeline
#[derive(Debug, Error)]
pub enum CompileError {
    /// Error while extracting directives from one file
    #[error("parse error in '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },

    /// Error while resolving an entry point
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Extract a set of in-memory sources and compose one entry point.
///
/// This is the main one-shot entry point for the library; use [`Engine`] to
/// load a directory and keep the composed artifacts around.
pub fn compose_sources<'a, I>(sources: I, entry: &str) -> Result<String, CompileError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut files = HashMap::new();
    for (name, raw) in sources {
        let file = extract(name, raw).map_err(|source| CompileError::Parse {
            name: name.to_string(),
            source,
        })?;
        files.insert(file.name.clone(), file);
    }
    Ok(compose(&files, entry)?)
}
