//! Lexer for Blade-style directives using logos
//!
//! Template source is mostly free text, so the token set is small: one token
//! per directive (the whole `@name(...)` occurrence, arguments included), the
//! two block end markers, and a residual text token. Whitespace is never
//! skipped; everything that is not a directive must survive into the
//! composed output byte-for-byte.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"@extends\([^)]*\)")]
    Extends,

    #[regex(r"@section\([^)]*\)")]
    SectionOpen,

    #[token("@endsection")]
    EndSection,

    #[regex(r"@yield\([^)]*\)")]
    Yield,

    #[regex(r"@stack\([^)]*\)")]
    StackDrain,

    #[regex(r"@push\([^)]*\)")]
    PushOpen,

    #[token("@endpush")]
    EndPush,

    #[regex(r"@include\([^)]*\)")]
    Include,

    /// Any run of text not containing `@`
    #[regex(r"[^@]+")]
    Text,

    /// A lone `@` that does not start a directive (e.g. an email address)
    #[token("@")]
    At,
}

/// Split a directive's argument list into (name, optional second argument).
///
/// `inner` is the text between the parentheses. The split happens at the
/// first comma outside of quotes; quoting of the individual arguments is left
/// to the caller (the name goes through `normalize`, defaults are unquoted,
/// include data expressions are passed through verbatim).
pub fn split_args(inner: &str) -> (&str, Option<&str>) {
    let mut quote: Option<char> = None;
    for (i, c) in inner.char_indices() {
        match c {
            '\'' | '"' => match quote {
                Some(q) if q == c => quote = None,
                Some(_) => {}
                None => quote = Some(c),
            },
            ',' if quote.is_none() => {
                return (&inner[..i], Some(&inner[i + 1..]));
            }
            _ => {}
        }
    }
    (inner, None)
}

/// Strip surrounding quotes from a literal argument (yield defaults, inline
/// section content). Unlike `normalize`, the content itself is untouched.
pub fn unquote(arg: &str) -> &str {
    let arg = arg.trim();
    if arg.len() >= 2 {
        let bytes = arg.as_bytes();
        if (bytes[0] == b'\'' && bytes[arg.len() - 1] == b'\'')
            || (bytes[0] == b'"' && bytes[arg.len() - 1] == b'"')
        {
            return &arg[1..arg.len() - 1];
        }
    }
    arg
}

/// The text between the parentheses of a directive token's slice.
pub fn directive_inner(slice: &str) -> &str {
    match (slice.find('('), slice.rfind(')')) {
        (Some(open), Some(close)) if open + 1 <= close => &slice[open + 1..close],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn tokens(source: &str) -> Vec<Token> {
        Token::lexer(source)
            .map(|t| t.expect("lexer should not fail"))
            .collect()
    }

    #[test]
    fn test_plain_text_is_one_token() {
        assert_eq!(tokens("<p>hello world</p>"), vec![Token::Text]);
    }

    #[test]
    fn test_directive_tokens() {
        let toks = tokens("@extends('base')@yield('title', 'Home')@stack('js')");
        assert_eq!(toks, vec![Token::Extends, Token::Yield, Token::StackDrain]);
    }

    #[test]
    fn test_block_markers() {
        let toks = tokens("@section('a') x @endsection @push('b') y @endpush");
        assert_eq!(
            toks,
            vec![
                Token::SectionOpen,
                Token::Text,
                Token::EndSection,
                Token::Text,
                Token::PushOpen,
                Token::Text,
                Token::EndPush,
            ]
        );
    }

    #[test]
    fn test_lone_at_is_not_a_directive() {
        let toks = tokens("mail me at a@b.com");
        assert_eq!(toks, vec![Token::Text, Token::At, Token::Text]);
    }

    #[test]
    fn test_split_args_respects_quotes() {
        assert_eq!(split_args("'name'"), ("'name'", None));
        assert_eq!(split_args("'name', 'a, b'"), ("'name'", Some(" 'a, b'")));
        assert_eq!(split_args("'p', .user"), ("'p'", Some(" .user")));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(" 'hello' "), "hello");
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("bare"), "bare");
        assert_eq!(unquote("'unterminated"), "'unterminated");
    }

    #[test]
    fn test_directive_inner() {
        assert_eq!(directive_inner("@yield('a', 'b')"), "'a', 'b'");
        assert_eq!(directive_inner("@stack()"), "");
    }
}
