//! Per-compilation shared state

use std::collections::{HashMap, HashSet};

use crate::extract::ParsedFile;

/// Reserved prefix for yield/section block names in the composed output
pub const YIELD_PREFIX: &str = "__yield_";
/// Reserved prefix for stack drain block names
pub const STACK_PREFIX: &str = "__stack_";
/// Reserved prefix for include wrapper block names
pub const PARTIAL_PREFIX: &str = "__partial_";

/// Information recorded for a registered yield
#[derive(Debug, Clone)]
pub struct YieldInfo {
    /// File that declared the yield
    pub file_name: String,
    /// Default content emitted when no section fills the yield
    pub default: String,
}

/// The mutable state shared across one entry point's recursive resolution.
///
/// One context is constructed immediately before resolving one entry point
/// and discarded afterwards. It must never be reused for another entry point
/// or shared across concurrent resolutions; the `files` table it borrows is
/// read-only and may be shared freely.
#[derive(Debug)]
pub struct CompileContext<'a> {
    /// Logical name -> parsed file, shared input
    pub files: &'a HashMap<String, ParsedFile>,
    /// Yield name -> owning file and default content. A name may be
    /// registered at most once across the whole resolution.
    pub yields: HashMap<String, YieldInfo>,
    /// Section names whose authoritative definition was already emitted.
    /// The file nearest to the entry point wins; ancestors are skipped.
    pub filled_sections: HashSet<String>,
    /// Partial names whose wrapper definition was already emitted, so a
    /// partial included twice produces one definition.
    pub filled_includes: HashSet<String>,
    /// Stack name -> file that declared the drain point
    pub stacks: HashMap<String, String>,
    /// Stack name -> pending fragments in visit order. Children are visited
    /// before ancestors, so draining front to back puts fragments pushed
    /// nearest to the entry point first.
    pub push_stacks: HashMap<String, Vec<String>>,
    /// Files currently on the recursion path, for cycle detection
    resolving: Vec<String>,
}

impl<'a> CompileContext<'a> {
    /// Create a fresh context over a shared files table
    pub fn new(files: &'a HashMap<String, ParsedFile>) -> Self {
        Self {
            files,
            yields: HashMap::new(),
            filled_sections: HashSet::new(),
            filled_includes: HashSet::new(),
            stacks: HashMap::new(),
            push_stacks: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    /// Check whether a file is already on the recursion path
    pub fn is_resolving(&self, name: &str) -> bool {
        self.resolving.iter().any(|n| n == name)
    }

    /// Mark a file as being resolved
    pub fn start_resolving(&mut self, name: &str) {
        self.resolving.push(name.to_string());
    }

    /// Mark a file as done resolving
    pub fn done_resolving(&mut self, name: &str) {
        if self.resolving.last().map(String::as_str) == Some(name) {
            self.resolving.pop();
        }
    }

    /// The recursion path plus the offending file, for cycle error messages
    pub fn chain_with(&self, name: &str) -> String {
        let mut chain = self.resolving.join(" -> ");
        if !chain.is_empty() {
            chain.push_str(" -> ");
        }
        chain.push_str(name);
        chain
    }
}
