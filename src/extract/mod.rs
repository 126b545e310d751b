//! Directive extraction
//!
//! Turns one file's raw text into a [`ParsedFile`]: the structured record of
//! its directives plus the residual body with every directive removed or
//! rewritten to the downstream engine's block-reference syntax.
//!
//! Extraction is a single pass over the token stream, but directives behave
//! as if processed by category in a fixed order: extends first, then
//! yield/stack/include rewrites, then section spans, then push spans. The
//! observable consequences: a `@yield` inside a section body is registered
//! globally while its rewritten form stays in the section content, a
//! `@section` inside a `@push` block is extracted out of the push content,
//! and a `@push` inside a section stays literal text.

pub mod lexer;

use std::collections::HashMap;

use logos::Logos;

use crate::error::{BlockKind, ParseError, Span};
use crate::name::normalize;
use crate::resolver::{PARTIAL_PREFIX, STACK_PREFIX, YIELD_PREFIX};
use lexer::{directive_inner, split_args, unquote, Token};

/// One source file's structured directive content.
///
/// Created once per logical file at load time and immutable afterwards; the
/// resolver reads it, potentially many times across different entry points.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Logical identifier (normalized relative path, extension-free)
    pub name: String,
    /// Logical name of the single parent file, if any
    pub extends: Option<String>,
    /// Partials referenced by `@include`, in source order (duplicates allowed)
    pub includes: Vec<String>,
    /// Section name -> literal content
    pub sections: HashMap<String, String>,
    /// Yield name -> default content (empty string when no default given)
    pub yields: HashMap<String, String>,
    /// Stack names this file declares a drain point for, in source order
    pub stacks: Vec<String>,
    /// Stack name -> fragments pushed in this file, in source order
    pub push_stacks: HashMap<String, Vec<String>>,
    /// Residual text after all directives are stripped or rewritten.
    /// Only meaningful for a file that does not extend anything.
    pub standalone_body: String,
}

/// A `@section`/`@push` block whose end marker has not been seen yet
struct OpenBlock {
    kind: BlockKind,
    name: String,
    span: Span,
    buf: String,
}

/// The buffer that plain text and rewrites currently flow into: the
/// innermost open block, or the residual body.
fn sink<'a>(blocks: &'a mut [OpenBlock], body: &'a mut String) -> &'a mut String {
    match blocks.last_mut() {
        Some(block) => &mut block.buf,
        None => body,
    }
}

/// Extract all directives from `raw`, producing a [`ParsedFile`] named after
/// the normalized `name`.
pub fn extract(name: &str, raw: &str) -> Result<ParsedFile, ParseError> {
    let mut file = ParsedFile {
        name: normalize(name),
        ..Default::default()
    };
    let mut body = String::new();
    let mut blocks: Vec<OpenBlock> = Vec::new();

    let mut lex = Token::lexer(raw);
    while let Some(token) = lex.next() {
        let span = lex.span();
        let slice = lex.slice();
        match token {
            Ok(Token::Extends) if file.extends.is_none() => {
                let (target, _) = split_args(directive_inner(slice));
                file.extends = Some(normalize(target));
            }
            // Only the first @extends counts; later ones stay in the text.
            Ok(Token::Extends) => sink(&mut blocks, &mut body).push_str(slice),

            Ok(Token::Yield) => {
                let (name_arg, default) = split_args(directive_inner(slice));
                let yield_name = normalize(name_arg);
                let default = default.map(|d| unquote(d).to_string()).unwrap_or_default();
                sink(&mut blocks, &mut body).push_str(&format!(
                    "{{{{ template \"{}{}\" . }}}}",
                    YIELD_PREFIX, yield_name
                ));
                file.yields.insert(yield_name, default);
            }

            Ok(Token::StackDrain) => {
                let (name_arg, _) = split_args(directive_inner(slice));
                let stack_name = normalize(name_arg);
                sink(&mut blocks, &mut body).push_str(&format!(
                    "{{{{ template \"{}{}\" . }}}}",
                    STACK_PREFIX, stack_name
                ));
                if !file.stacks.contains(&stack_name) {
                    file.stacks.push(stack_name);
                }
            }

            Ok(Token::Include) => {
                let (target, data) = split_args(directive_inner(slice));
                let include_name = normalize(target);
                // Data expressions pass through verbatim; the engine's own
                // evaluator deals with them. Bare expressions only.
                let data = data.map(str::trim).filter(|d| !d.is_empty()).unwrap_or(".");
                sink(&mut blocks, &mut body).push_str(&format!(
                    "{{{{ template \"{}{}\" {} }}}}",
                    PARTIAL_PREFIX, include_name, data
                ));
                file.includes.push(include_name);
            }

            Ok(Token::SectionOpen) => {
                if blocks.iter().any(|b| b.kind == BlockKind::Section) {
                    // A second opener inside a section is plain content.
                    sink(&mut blocks, &mut body).push_str(slice);
                    continue;
                }
                let (name_arg, inline) = split_args(directive_inner(slice));
                let section_name = normalize(name_arg);
                match inline {
                    Some(inline) => {
                        // @section('name', 'content') shorthand
                        file.sections
                            .insert(section_name, unquote(inline).to_string());
                    }
                    None => blocks.push(OpenBlock {
                        kind: BlockKind::Section,
                        name: section_name,
                        span,
                        buf: String::new(),
                    }),
                }
            }

            Ok(Token::EndSection) => {
                if matches!(blocks.last(), Some(b) if b.kind == BlockKind::Section) {
                    if let Some(block) = blocks.pop() {
                        file.sections
                            .insert(block.name, block.buf.trim().to_string());
                    }
                } else {
                    // Stray end marker stays in the text.
                    sink(&mut blocks, &mut body).push_str(slice);
                }
            }

            Ok(Token::PushOpen) => {
                if !blocks.is_empty() {
                    // Push spans are extracted after section spans, so an
                    // opener inside any block is plain content.
                    sink(&mut blocks, &mut body).push_str(slice);
                    continue;
                }
                let (name_arg, _) = split_args(directive_inner(slice));
                blocks.push(OpenBlock {
                    kind: BlockKind::Push,
                    name: normalize(name_arg),
                    span,
                    buf: String::new(),
                });
            }

            Ok(Token::EndPush) => {
                if matches!(blocks.last(), Some(b) if b.kind == BlockKind::Push) {
                    if let Some(block) = blocks.pop() {
                        file.push_stacks
                            .entry(block.name)
                            .or_default()
                            .push(block.buf.trim().to_string());
                    }
                } else {
                    sink(&mut blocks, &mut body).push_str(slice);
                }
            }

            Ok(Token::Text) | Ok(Token::At) | Err(()) => {
                sink(&mut blocks, &mut body).push_str(slice);
            }
        }
    }

    if let Some(block) = blocks.pop() {
        return Err(ParseError::UnterminatedBlock {
            kind: block.kind,
            name: block.name,
            span: block.span,
        });
    }

    file.standalone_body = body.trim().to_string();
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_extends() {
        let file = extract("pages/home", "@extends('layouts/app.blade')\nbody").unwrap();
        assert_eq!(file.extends.as_deref(), Some("layouts/app"));
        assert_eq!(file.standalone_body, "body");
    }

    #[test]
    fn test_second_extends_stays_literal() {
        let file = extract("a", "@extends('x')@extends('y')").unwrap();
        assert_eq!(file.extends.as_deref(), Some("x"));
        assert_eq!(file.standalone_body, "@extends('y')");
    }

    #[test]
    fn test_extract_yield_with_default() {
        let file = extract("layout", "<title>@yield('title', 'Untitled')</title>").unwrap();
        assert_eq!(file.yields.get("title").map(String::as_str), Some("Untitled"));
        assert_eq!(
            file.standalone_body,
            "<title>{{ template \"__yield_title\" . }}</title>"
        );
    }

    #[test]
    fn test_extract_yield_without_default() {
        let file = extract("layout", "@yield('content')").unwrap();
        assert_eq!(file.yields.get("content").map(String::as_str), Some(""));
    }

    #[test]
    fn test_extract_block_section() {
        let file = extract("page", "@section('content')\n  <p>Hi</p>\n@endsection").unwrap();
        assert_eq!(file.sections.get("content").map(String::as_str), Some("<p>Hi</p>"));
        assert_eq!(file.standalone_body, "");
    }

    #[test]
    fn test_extract_inline_section() {
        let file = extract("page", "@section('title', 'Home')").unwrap();
        assert_eq!(file.sections.get("title").map(String::as_str), Some("Home"));
    }

    #[test]
    fn test_unterminated_section_is_an_error() {
        let err = extract("page", "@section('content') oops").unwrap_err();
        match err {
            ParseError::UnterminatedBlock { kind, name, .. } => {
                assert_eq!(kind, BlockKind::Section);
                assert_eq!(name, "content");
            }
        }
    }

    #[test]
    fn test_unterminated_push_is_an_error() {
        let err = extract("page", "@push('scripts') <script></script>").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnterminatedBlock {
                kind: BlockKind::Push,
                ..
            }
        ));
    }

    #[test]
    fn test_extract_include_with_default_data() {
        let file = extract("page", "@include('partials/nav')").unwrap();
        assert_eq!(file.includes, vec!["partials/nav"]);
        assert_eq!(
            file.standalone_body,
            "{{ template \"__partial_partials/nav\" . }}"
        );
    }

    #[test]
    fn test_extract_include_with_data_expression() {
        let file = extract("page", "@include('card', .user)").unwrap();
        assert_eq!(file.standalone_body, "{{ template \"__partial_card\" .user }}");
    }

    #[test]
    fn test_duplicate_includes_preserved_in_order() {
        let file = extract("page", "@include('a')@include('b')@include('a')").unwrap();
        assert_eq!(file.includes, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_extract_stack_and_push() {
        let raw = "@stack('scripts')\n@push('scripts')\n<script>1</script>\n@endpush\n@push('scripts')\n<script>2</script>\n@endpush";
        let file = extract("layout", raw).unwrap();
        assert_eq!(file.stacks, vec!["scripts"]);
        assert_eq!(
            file.push_stacks.get("scripts").map(Vec::as_slice),
            Some(&["<script>1</script>".to_string(), "<script>2</script>".to_string()][..])
        );
        assert_eq!(file.standalone_body, "{{ template \"__stack_scripts\" . }}");
    }

    #[test]
    fn test_yield_inside_section_is_registered_globally() {
        let file = extract(
            "page",
            "@section('content')before @yield('inner', 'x') after@endsection",
        )
        .unwrap();
        assert_eq!(file.yields.get("inner").map(String::as_str), Some("x"));
        assert_eq!(
            file.sections.get("content").map(String::as_str),
            Some("before {{ template \"__yield_inner\" . }} after")
        );
    }

    #[test]
    fn test_stray_end_markers_stay_literal() {
        let file = extract("page", "text @endsection more @endpush").unwrap();
        assert_eq!(file.standalone_body, "text @endsection more @endpush");
    }

    #[test]
    fn test_lone_at_survives() {
        let file = extract("page", "contact a@b.com").unwrap();
        assert_eq!(file.standalone_body, "contact a@b.com");
    }
}
