//! Engine - the compiler driver
//!
//! Owns the parsed files table and the composed artifacts. The engine walks a
//! template directory, extracts every file into a [`ParsedFile`], then
//! composes every loaded file as an entry point, each with a fresh
//! [`CompileContext`](crate::CompileContext). A failing entry point is
//! reported without affecting the others.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::EngineConfig;
use crate::error::ParseError;
use crate::extract::{extract, ParsedFile};
use crate::name::normalize;
use crate::resolver::{compose, ResolveError};

/// I/O failure while walking or reading the template directory
#[derive(Debug, Error)]
#[error("failed to read '{path}': {source}")]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// A file whose directives could not be extracted.
///
/// Carries the raw source so the caller can render the error with context
/// (see [`ParseError::format`]).
#[derive(Debug)]
pub struct ParseFailure {
    pub name: String,
    pub path: PathBuf,
    pub source: String,
    pub error: ParseError,
}

/// Holds loaded files and their composed artifacts
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
    files: HashMap<String, ParsedFile>,
    composed: HashMap<String, String>,
}

impl Engine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            files: HashMap::new(),
            composed: HashMap::new(),
        }
    }

    /// Recursively load all template files from a directory.
    ///
    /// Logical names are the extension-free paths relative to `dir`. I/O
    /// errors abort the walk; files that fail directive extraction are
    /// skipped and returned so the caller can surface them.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<ParseFailure>, LoadError> {
        let mut failures = Vec::new();
        self.walk(dir, dir, &mut failures)?;
        Ok(failures)
    }

    fn walk(
        &mut self,
        root: &Path,
        dir: &Path,
        failures: &mut Vec<ParseFailure>,
    ) -> Result<(), LoadError> {
        let entries = fs::read_dir(dir).map_err(|source| LoadError {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| LoadError {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.walk(root, &path, failures)?;
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !self.config.matches(&file_name) {
                continue;
            }
            let raw = fs::read_to_string(&path).map_err(|source| LoadError {
                path: path.clone(),
                source,
            })?;
            let name = logical_name(root, &path);
            match extract(&name, &raw) {
                Ok(file) => {
                    self.files.insert(file.name.clone(), file);
                }
                Err(error) => failures.push(ParseFailure {
                    name,
                    path,
                    source: raw,
                    error,
                }),
            }
        }
        Ok(())
    }

    /// Add a single in-memory template (mainly for tests and embedding)
    pub fn add_raw(&mut self, name: &str, raw: &str) -> Result<(), ParseError> {
        let file = extract(name, raw)?;
        self.files.insert(file.name.clone(), file);
        Ok(())
    }

    /// Compose every loaded file as an entry point, each with a fresh
    /// context. Successes are stored; failures are returned with the entry
    /// name they belong to, leaving other entries usable.
    pub fn compose_all(&mut self) -> Vec<(String, ResolveError)> {
        let mut failures = Vec::new();
        let mut names: Vec<String> = self.files.keys().cloned().collect();
        names.sort();
        for name in names {
            match compose(&self.files, &name) {
                Ok(text) => {
                    self.composed.insert(name, text);
                }
                Err(err) => failures.push((name, err)),
            }
        }
        failures
    }

    /// The composed artifact for an entry point, if composition succeeded
    pub fn composed(&self, name: &str) -> Option<&str> {
        self.composed.get(&normalize(name)).map(String::as_str)
    }

    /// All successfully composed entry points, sorted
    pub fn entries(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.composed.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    /// The parsed files table
    pub fn files(&self) -> &HashMap<String, ParsedFile> {
        &self.files
    }
}

/// Logical name from a filesystem path, relative to the loader root
fn logical_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    normalize(&joined)
}
