//! Resolver - flattens an extends/include tree into one composed text
//!
//! Given a [`ParsedFile`] and a fresh [`CompileContext`], [`resolve`] walks
//! the extends chain and the include graph, merging every visited file's
//! directive state into the context and emitting block definitions in the
//! downstream engine's syntax. [`compose`] is the entry-point driver: it runs
//! [`resolve`], then synthesizes default definitions for unfilled yields and
//! verifies that no push landed in a stack nobody declares.

mod context;

pub use context::{
    CompileContext, YieldInfo, PARTIAL_PREFIX, STACK_PREFIX, YIELD_PREFIX,
};

use std::collections::HashMap;

use thiserror::Error;

use crate::extract::ParsedFile;
use crate::name::normalize;

/// Errors that can occur while resolving an entry point.
///
/// These are deterministic compile-time failures requiring a source fix; an
/// error aborts the current entry point only, other entry points are
/// unaffected.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// `@extends` target absent from the files table
    #[error("extends target not found: '{name}' (extended by '{referenced_by}')")]
    MissingExtendsTarget { name: String, referenced_by: String },

    /// `@include` target absent from the files table
    #[error("include target not found: '{name}' (included by '{referenced_by}')")]
    MissingIncludeTarget { name: String, referenced_by: String },

    /// Same yield name declared by two different files within one resolution
    #[error("yield '{name}' already declared: declared by '{file}' and '{prior_file}'")]
    DuplicateYieldDeclaration {
        name: String,
        file: String,
        prior_file: String,
    },

    /// Same stack name declared by two different files within one resolution
    #[error("stack '{name}' already declared: declared by '{file}' and '{prior_file}'")]
    DuplicateStackDeclaration {
        name: String,
        file: String,
        prior_file: String,
    },

    /// Content pushed to a stack name no visited file declares via `@stack`
    #[error("content pushed to undeclared stack '{name}'")]
    OrphanPushStack { name: String },

    /// Circular extends/include chain
    #[error("circular template reference detected: {chain}")]
    CircularReference { chain: String },

    /// Entry point name absent from the files table
    #[error("entry point not found: '{name}'")]
    UnknownEntryPoint { name: String },
}

/// Emit one block definition in the engine's primitive syntax
fn define(name: &str, body: &str) -> String {
    format!("{{{{ define \"{}\" }}}}{}{{{{ end }}}}", name, body)
}

/// Resolve one file against a shared context, producing its composed text.
///
/// Invoked once per entry point on the root [`ParsedFile`] with a fresh
/// context, then recursively on ancestors and includes with the same context.
pub fn resolve(file: &ParsedFile, ctx: &mut CompileContext) -> Result<String, ResolveError> {
    if ctx.is_resolving(&file.name) {
        return Err(ResolveError::CircularReference {
            chain: ctx.chain_with(&file.name),
        });
    }
    ctx.start_resolving(&file.name);

    let mut out = String::new();

    // 1. Register this file's pushes. Children are visited before ancestors,
    // so plain append gives the required drain order (child fragments first).
    for (stack_name, fragments) in &file.push_stacks {
        ctx.push_stacks
            .entry(stack_name.clone())
            .or_default()
            .extend(fragments.iter().cloned());
    }

    // 2. Emit stack drains, consuming the pending fragments.
    for stack_name in &file.stacks {
        if let Some(prior) = ctx.stacks.get(stack_name) {
            if prior != &file.name {
                return Err(ResolveError::DuplicateStackDeclaration {
                    name: stack_name.clone(),
                    file: file.name.clone(),
                    prior_file: prior.clone(),
                });
            }
            // Re-visit of the same file: the earlier drain stands.
            continue;
        }
        ctx.stacks.insert(stack_name.clone(), file.name.clone());
        let drained = ctx.push_stacks.remove(stack_name).unwrap_or_default();
        out.push_str(&define(
            &format!("{}{}", STACK_PREFIX, stack_name),
            &drained.join("\n"),
        ));
    }

    // 3. Emit sections. First writer (the file nearest the entry point) wins;
    // an ancestor's same-named section is skipped silently.
    let mut section_names: Vec<&String> = file.sections.keys().collect();
    section_names.sort();
    for section_name in section_names {
        if ctx.filled_sections.contains(section_name) {
            continue;
        }
        out.push_str(&define(
            &format!("{}{}", YIELD_PREFIX, section_name),
            &file.sections[section_name],
        ));
        ctx.filled_sections.insert(section_name.clone());
    }

    // 4. Register yields. A second registration by a different file is an
    // error naming both files; a re-visit of the same file is a no-op.
    let mut yield_names: Vec<&String> = file.yields.keys().collect();
    yield_names.sort();
    for yield_name in yield_names {
        if let Some(info) = ctx.yields.get(yield_name) {
            if info.file_name != file.name {
                return Err(ResolveError::DuplicateYieldDeclaration {
                    name: yield_name.clone(),
                    file: file.name.clone(),
                    prior_file: info.file_name.clone(),
                });
            }
            continue;
        }
        ctx.yields.insert(
            yield_name.clone(),
            YieldInfo {
                file_name: file.name.clone(),
                default: file.yields[yield_name].clone(),
            },
        );
    }

    // 5. Recurse into the parent. Its block definitions (and, if it is a
    // root, its standalone body) are inherited.
    if let Some(parent_name) = &file.extends {
        let parent =
            ctx.files
                .get(parent_name)
                .ok_or_else(|| ResolveError::MissingExtendsTarget {
                    name: parent_name.clone(),
                    referenced_by: file.name.clone(),
                })?;
        out.push_str(&resolve(parent, ctx)?);
    }

    // 6. Recurse into includes, in order. Each include is fully resolved as
    // though it were its own entry point sharing the same context, then
    // wrapped as a partial definition. A partial already emitted is skipped.
    for include_name in &file.includes {
        if ctx.filled_includes.contains(include_name) {
            continue;
        }
        let partial =
            ctx.files
                .get(include_name)
                .ok_or_else(|| ResolveError::MissingIncludeTarget {
                    name: include_name.clone(),
                    referenced_by: file.name.clone(),
                })?;
        let inner = resolve(partial, ctx)?;
        ctx.filled_includes.insert(include_name.clone());
        out.push_str(&define(
            &format!("{}{}", PARTIAL_PREFIX, include_name),
            &inner,
        ));
    }

    // 7. Only a root contributes its own body.
    if file.extends.is_none() {
        out.push_str(&file.standalone_body);
    }

    ctx.done_resolving(&file.name);
    Ok(out)
}

/// Resolve one entry point to its final, self-contained composed text.
///
/// Builds a fresh context, resolves the entry file, appends a synthesized
/// default definition for every registered yield no section filled, and
/// verifies every pushed-to stack was declared somewhere.
pub fn compose(
    files: &HashMap<String, ParsedFile>,
    entry: &str,
) -> Result<String, ResolveError> {
    let entry = normalize(entry);
    let file = files
        .get(&entry)
        .ok_or_else(|| ResolveError::UnknownEntryPoint { name: entry.clone() })?;

    let mut ctx = CompileContext::new(files);
    let mut out = resolve(file, &mut ctx)?;

    // Every reference in the composed text must have a matching definition,
    // so unfilled yields fall back to their recorded default. Sorted for
    // deterministic output.
    let mut unfilled: Vec<&String> = ctx
        .yields
        .keys()
        .filter(|name| !ctx.filled_sections.contains(*name))
        .collect();
    unfilled.sort();
    for name in unfilled {
        out.push_str(&define(
            &format!("{}{}", YIELD_PREFIX, name),
            &ctx.yields[name].default,
        ));
    }

    // Fragments still pending for a stack nobody declared would be lost.
    let mut orphaned: Vec<&String> = ctx
        .push_stacks
        .keys()
        .filter(|name| !ctx.stacks.contains_key(*name))
        .collect();
    orphaned.sort();
    if let Some(name) = orphaned.first() {
        return Err(ResolveError::OrphanPushStack {
            name: (*name).clone(),
        });
    }

    Ok(out)
}
