use super::glob::*;

#[test]
fn test_any_matches_everything() {
    assert!(Any.matches("/"));
    assert!(Any.matches("/a/b/c"));
}

#[test]
fn test_closure_matcher() {
    let under_svc = |path: &str| path.starts_with("/svc/");
    assert!(under_svc.matches("/svc/a"));
    assert!(!under_svc.matches("/other"));
}

#[test]
fn test_literal_glob_matches_one_path() {
    let g = Glob::compile("/a/b").unwrap();
    assert!(g.matches("/a/b"));
    assert!(!g.matches("/a"));
    assert!(!g.matches("/a/b/c"));
    assert!(!g.matches("/a/c"));
}

#[test]
fn test_star_stays_within_a_segment() {
    let g = Glob::compile("/a/*").unwrap();
    assert!(g.matches("/a/b"));
    assert!(g.matches("/a/long-name.txt"));
    assert!(!g.matches("/a/b/c"));
}

#[test]
fn test_double_star_crosses_segments() {
    let g = Glob::compile("/a/**").unwrap();
    assert!(g.matches("/a/b"));
    assert!(g.matches("/a/b/c/d"));
    assert!(!g.matches("/x/b"));
}

#[test]
fn test_compile_rejects_malformed() {
    assert!(Glob::compile("/a/[").is_err());
}
