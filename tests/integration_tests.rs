//! Integration tests for the directory loader and compiler driver

use std::path::Path;

use blade_compose::Engine;

fn demos_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/demos"))
}

fn loaded_engine() -> Engine {
    let mut engine = Engine::new();
    let parse_failures = engine.load_dir(demos_dir()).expect("demos dir should load");
    assert!(parse_failures.is_empty(), "unexpected parse failures: {:?}", parse_failures);
    let compose_failures = engine.compose_all();
    assert!(
        compose_failures.is_empty(),
        "unexpected compose failures: {:?}",
        compose_failures
    );
    engine
}

#[test]
fn test_loads_and_composes_every_demo_entry() {
    let engine = loaded_engine();
    assert_eq!(
        engine.entries(),
        vec!["layouts/app", "pages/about", "pages/home", "partials/nav"]
    );
}

#[test]
fn test_home_page_composition() {
    let engine = loaded_engine();
    let out = engine.composed("pages/home").expect("home should compose");

    // Child sections fill the layout's yields.
    assert!(out.contains(r#"{{ define "__yield_title" }}Home{{ end }}"#));
    assert!(out.contains(r#"{{ define "__yield_content" }}<h1>Welcome</h1>{{ end }}"#));

    // Pushed fragments drained at the layout's stack declarations.
    assert!(out.contains(r#"{{ define "__stack_styles" }}<link rel="stylesheet" href="/home.css">{{ end }}"#));
    assert!(out.contains(r#"{{ define "__stack_scripts" }}<script src="/home.js"></script>{{ end }}"#));

    // The included partial becomes a self-contained definition.
    assert!(out.contains(r#"{{ define "__partial_partials/nav" }}"#));
    assert!(out.contains(r#"{{ template "__partial_partials/nav" . }}"#));

    // Every directive was stripped or rewritten.
    for directive in ["@extends", "@section", "@yield", "@include", "@stack", "@push"] {
        assert!(!out.contains(directive), "directive {} leaked into output", directive);
    }
}

#[test]
fn test_about_page_falls_back_to_default_title() {
    let engine = loaded_engine();
    let out = engine.composed("pages/about").expect("about should compose");
    assert!(out.contains(r#"{{ define "__yield_title" }}Blade Compose{{ end }}"#));
    assert!(out.contains(r#"{{ define "__yield_content" }}"#));
}

#[test]
fn test_layout_composes_standalone() {
    let engine = loaded_engine();
    let out = engine.composed("layouts/app").expect("layout should compose");

    // With no child, the stacks drain empty and yields use their defaults.
    assert!(out.contains(r#"{{ define "__stack_styles" }}{{ end }}"#));
    assert!(out.contains(r#"{{ define "__stack_scripts" }}{{ end }}"#));
    assert!(out.contains(r#"{{ define "__yield_title" }}Blade Compose{{ end }}"#));
}

#[test]
fn test_entry_lookup_normalizes_names() {
    let engine = loaded_engine();
    assert!(engine.composed("pages/home.blade").is_some());
    assert!(engine.composed("'pages/home'").is_some());
    assert!(engine.composed("pages/ghost").is_none());
}
