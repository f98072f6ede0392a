//! Routing table resolution behavior.

use std::sync::Arc;

use gantry::handler::Handler;
use gantry::routing::{Resolution, RoutingTable};
use http::Method;

struct Nop;
impl Handler for Nop {}

fn add(table: &mut RoutingTable, pattern: &str, name: &str) {
    table
        .add_rule(pattern, name, Arc::new(|| Box::new(Nop) as Box<dyn Handler>))
        .unwrap();
}

fn resolved_name<'a>(table: &'a RoutingTable, path: &str) -> Option<(&'a str, Vec<(String, String)>)> {
    match table.resolve(path, &Method::GET) {
        Resolution::Handler { rule, captures } => Some((rule.handler_name(), captures)),
        _ => None,
    }
}

#[test]
fn exact_rules_are_tried_before_pattern_rules() {
    let mut table = RoutingTable::new();
    // Pattern registered first; the exact rule must still win.
    add(&mut table, "/page/:name([a-z]+)", "PatternHandler");
    add(&mut table, "/page/about", "ExactHandler");

    let (name, captures) = resolved_name(&table, "/page/about").unwrap();
    assert_eq!(name, "ExactHandler");
    assert!(captures.is_empty());

    let (name, _) = resolved_name(&table, "/page/contact").unwrap();
    assert_eq!(name, "PatternHandler");
}

#[test]
fn pattern_match_must_span_the_whole_path() {
    let mut table = RoutingTable::new();
    add(&mut table, "/user/:id([0-9]+)", "UserHandler");

    let (name, captures) = resolved_name(&table, "/user/42").unwrap();
    assert_eq!(name, "UserHandler");
    assert_eq!(captures, vec![("id".to_string(), "42".to_string())]);

    assert!(resolved_name(&table, "/user/42/extra").is_none());
    assert!(resolved_name(&table, "/user/abc").is_none());
}

#[test]
fn first_matching_pattern_wins_in_registration_order() {
    let mut table = RoutingTable::new();
    add(&mut table, "/item/:id([0-9]+)", "First");
    add(&mut table, "/item/:id([0-9a-z]+)", "Second");

    let (name, _) = resolved_name(&table, "/item/42").unwrap();
    assert_eq!(name, "First");
    let (name, _) = resolved_name(&table, "/item/4a").unwrap();
    assert_eq!(name, "Second");
}

#[test]
fn exact_match_tolerates_one_trailing_slash() {
    let mut table = RoutingTable::new();
    add(&mut table, "/about", "About");
    assert!(resolved_name(&table, "/about").is_some());
    assert!(resolved_name(&table, "/about/").is_some());
    assert!(resolved_name(&table, "/about//").is_none());
}

#[test]
fn multiple_parameters_capture_in_declaration_order() {
    let mut table = RoutingTable::new();
    add(&mut table, "/blog/:year([0-9]{4})/:slug([a-z-]+)", "Blog");

    let (_, captures) = resolved_name(&table, "/blog/2024/hello-world").unwrap();
    assert_eq!(
        captures,
        vec![
            ("year".to_string(), "2024".to_string()),
            ("slug".to_string(), "hello-world".to_string()),
        ]
    );
}

#[test]
fn static_prefix_short_circuits_for_get_and_head_only() {
    let mut table = RoutingTable::new();
    table.set_static_path("/assets", "/srv/assets");
    add(&mut table, "/assets/app.css", "ShadowedHandler");

    assert!(matches!(
        table.resolve("/assets/app.css", &Method::GET),
        Resolution::StaticFile(path) if path == std::path::Path::new("/srv/assets/app.css")
    ));
    assert!(matches!(
        table.resolve("/assets/app.css", &Method::HEAD),
        Resolution::StaticFile(_)
    ));
    // POST bypasses static serving and falls through to the rules.
    assert!(matches!(
        table.resolve("/assets/app.css", &Method::POST),
        Resolution::Handler { .. }
    ));
}

#[test]
fn longest_static_prefix_wins() {
    let mut table = RoutingTable::new();
    table.set_static_path("/static", "/srv/a");
    table.set_static_path("/static/img", "/srv/b");

    assert!(matches!(
        table.resolve("/static/img/logo.png", &Method::GET),
        Resolution::StaticFile(path) if path == std::path::Path::new("/srv/b/logo.png")
    ));
    assert!(matches!(
        table.resolve("/static/app.js", &Method::GET),
        Resolution::StaticFile(path) if path == std::path::Path::new("/srv/a/app.js")
    ));
}

#[test]
fn traversal_segments_never_resolve_to_files() {
    let mut table = RoutingTable::new();
    table.set_static_path("/static", "/srv/a");
    assert!(matches!(
        table.resolve("/static/../etc/passwd", &Method::GET),
        Resolution::NotFound
    ));
}

#[test]
fn unroutable_path_is_not_found() {
    let table = RoutingTable::new();
    assert!(matches!(
        table.resolve("/nowhere", &Method::GET),
        Resolution::NotFound
    ));
}
