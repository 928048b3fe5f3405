//! Compressed prefix tree mapping route patterns to values.
//!
//! # Responsibilities
//! - Insert patterns, splitting edges at the longest common prefix
//! - Resolve a request path to a value, capturing `:name` and `*name` parameters
//! - Reject a second registration at an occupied terminal position
//!
//! # Design Decisions
//! - Built once at startup; `find` takes `&self` and only writes to the caller's map
//! - A token (`:name`, `*name`) is never split; it is compared as one unit
//! - Candidate children are tried in priority order with backtracking, so a
//!   failed literal branch falls back to a parameter or wildcard sibling
//! - Trailing-slash tolerance: `/search` and `/search/` resolve to each other

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::routing::node::{Node, PARAM, WILDCARD};
use crate::routing::params::Params;

/// Errors raised while inserting into a [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The path to insert was empty.
    #[error("cannot insert an empty path")]
    EmptyPath,

    /// A value is already registered at this exact position.
    #[error("duplicate route '{0}'")]
    Duplicate(String),
}

/// A captured parameter: name borrowed from the tree, value from the path.
type Capture<'t, 'p> = (&'t str, Cow<'p, str>);

/// A radix tree of route patterns.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self {
            root: Node::new("", None),
            len: 0,
        }
    }

    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Number of values stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `value` under `path`.
    pub fn add(&mut self, path: &str, value: T) -> Result<(), TreeError> {
        if path.is_empty() {
            return Err(TreeError::EmptyPath);
        }
        insert(&mut self.root, path, value, path)?;
        self.len += 1;
        Ok(())
    }

    /// Resolve `path`, writing captured parameters into `params`.
    ///
    /// Returns `None` when no pattern matches; `params` is left untouched in
    /// that case.
    pub fn find(&self, path: &str, params: &mut Params) -> Option<&T> {
        let mut captures = Vec::new();
        let value = lookup(&self.root, path, &mut captures)?;
        for (name, capture) in captures {
            params.insert(name, capture);
        }
        Some(value)
    }
}

fn insert<T>(node: &mut Node<T>, path: &str, value: T, pattern: &str) -> Result<(), TreeError> {
    let matched = common_prefix(path, node.label());
    let label_len = node.label().len();

    if node.label().is_empty() || matched == 0 || (matched < path.len() && matched >= label_len) {
        let rest = &path[matched..];
        let existing = node
            .children()
            .iter()
            .position(|child| common_prefix(rest, child.label()) > 0);

        match existing {
            Some(index) => {
                insert(&mut node.children_mut()[index], rest, value, pattern)?;
                node.sort();
            }
            None => node.push_child(Node::new(rest, Some(value))),
        }
        return Ok(());
    }

    if matched == path.len() && matched == label_len {
        // A split node without a value can still take one.
        if node.value().is_some() {
            return Err(TreeError::Duplicate(pattern.to_string()));
        }
        node.set_value(Some(value));
        return Ok(());
    }

    debug_assert!(matched > 0 && matched < label_len);

    let suffix = node.label()[matched..].to_string();
    let mut tail = Node::new(suffix, node.take_value());
    *tail.children_mut() = node.take_children();

    node.set_label(&path[..matched]);
    node.push_child(tail);

    if matched < path.len() {
        node.push_child(Node::new(&path[matched..], Some(value)));
    } else {
        node.set_value(Some(value));
    }
    Ok(())
}

fn lookup<'t, 'p, T>(
    node: &'t Node<T>,
    path: &'p str,
    captures: &mut Vec<Capture<'t, 'p>>,
) -> Option<&'t T> {
    let label = node.label();
    let (key, req) = (label.as_bytes(), path.as_bytes());
    let (mut k, mut p) = (0, 0);

    while k < key.len() {
        match key[k] {
            WILDCARD => {
                let rest = &path[p..];
                let value = if rest.is_empty() {
                    Cow::Borrowed("/")
                } else if rest.starts_with('/') {
                    Cow::Borrowed(rest)
                } else {
                    Cow::Owned(format!("/{rest}"))
                };
                captures.push((&label[k + 1..], value));
                // wildcard is always terminal
                return node.value();
            }
            PARAM => {
                let key_end = token_end(key, k);
                let path_end = token_end(req, p);
                if path_end == p {
                    return None;
                }
                captures.push((&label[k + 1..key_end], Cow::Borrowed(&path[p..path_end])));
                k = key_end;
                p = path_end;
            }
            c if p < req.len() && req[p] == c => {
                k += 1;
                p += 1;
            }
            _ => break,
        }
    }

    if k < key.len() {
        // Only a missing trailing slash may be left over.
        return if p == req.len() && &key[k..] == b"/" {
            node.value()
        } else {
            None
        };
    }

    let rest = &path[p..];
    if rest.is_empty() {
        if node.value().is_some() {
            return node.value();
        }
        if path == "/" && label == "/" {
            // `/` itself may still be claimed by a wildcard child
            return search_children(node, "/", captures);
        }
        return None;
    }

    if let Some(found) = search_children(node, rest, captures) {
        return Some(found);
    }
    if rest == "/" && !label.is_empty() {
        return node.value();
    }
    None
}

fn search_children<'t, 'p, T>(
    node: &'t Node<T>,
    path: &'p str,
    captures: &mut Vec<Capture<'t, 'p>>,
) -> Option<&'t T> {
    let first = path.chars().next()?;

    for child in node.children() {
        if child.is_dynamic() || child.label().starts_with(first) {
            let mark = captures.len();
            if let Some(found) = lookup(child, path, captures) {
                return Some(found);
            }
            captures.truncate(mark);
        }
    }
    None
}

/// Length of the shared prefix of `a` and `b`, in bytes.
///
/// Tokens are compared whole, and the result always lies on a char boundary.
fn common_prefix(a: &str, b: &str) -> usize {
    let (x, y) = (a.as_bytes(), b.as_bytes());
    let mut i = 0;

    while i < x.len() && i < y.len() && x[i] == y[i] {
        if x[i] == PARAM || x[i] == WILDCARD {
            let end = token_end(x, i);
            if end != token_end(y, i) || x[i..end] != y[i..end] {
                break;
            }
            i = end;
        } else {
            i += 1;
        }
    }

    while !a.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Index of the `/` ending the segment that starts at `start`, or the length.
fn token_end(s: &[u8], start: usize) -> usize {
    s[start..]
        .iter()
        .position(|&b| b == b'/')
        .map_or(s.len(), |offset| start + offset)
}

impl<T> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &self.root, 0)
    }
}

fn write_node<T>(f: &mut fmt::Formatter<'_>, node: &Node<T>, depth: usize) -> fmt::Result {
    let label = if node.label().is_empty() { "<root>" } else { node.label() };
    let marker = if node.value().is_some() { " *" } else { "" };
    writeln!(
        f,
        "{:indent$}{label} (priority {}){marker}",
        "",
        node.priority(),
        indent = depth * 2
    )?;
    for child in node.children() {
        write_node(f, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET: &[&str] = &[
        "/",
        "/cmd/:tool/:sub",
        "/cmd/:tool/",
        "/src/*filepath",
        "/search/",
        "/search/:query",
        "/user_:name",
        "/user_:name/about",
        "/files/:dir/*filepath",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/info/:user/public",
        "/info/:user/project/:project",
    ];

    fn build(patterns: &[&'static str]) -> Tree<&'static str> {
        let mut tree = Tree::new();
        for pattern in patterns {
            tree.add(pattern, *pattern).unwrap();
        }
        tree
    }

    fn check(tree: &Tree<&'static str>, path: &str, route: Option<&str>, expected: &[(&str, &str)]) {
        let mut params = Params::new();
        let found = tree.find(path, &mut params).copied();
        assert_eq!(found, route, "route for {path}\n{tree}");
        let expected: Params = expected.iter().copied().collect();
        assert_eq!(params, expected, "params for {path}");
    }

    #[test]
    fn test_set() {
        let tree = build(SET);
        assert_eq!(tree.len(), SET.len());

        check(&tree, "/", Some("/"), &[]);
        check(&tree, "/cmd/test/", Some("/cmd/:tool/"), &[("tool", "test")]);
        check(&tree, "/cmd/test", Some("/cmd/:tool/"), &[("tool", "test")]);
        check(&tree, "/cmd/test/3", Some("/cmd/:tool/:sub"), &[("tool", "test"), ("sub", "3")]);
        check(&tree, "/src/", Some("/src/*filepath"), &[("filepath", "/")]);
        check(&tree, "/src/some/file.png", Some("/src/*filepath"), &[("filepath", "/some/file.png")]);
        check(&tree, "/search/", Some("/search/"), &[]);
        check(
            &tree,
            "/search/someth!ng+in+ünìcodé",
            Some("/search/:query"),
            &[("query", "someth!ng+in+ünìcodé")],
        );
        check(
            &tree,
            "/search/someth!ng+in+ünìcodé/",
            Some("/search/:query"),
            &[("query", "someth!ng+in+ünìcodé")],
        );
        check(&tree, "/user_gopher", Some("/user_:name"), &[("name", "gopher")]);
        check(&tree, "/user_gopher/about", Some("/user_:name/about"), &[("name", "gopher")]);
        check(
            &tree,
            "/files/js/inc/framework.js",
            Some("/files/:dir/*filepath"),
            &[("dir", "js"), ("filepath", "/inc/framework.js")],
        );
        check(&tree, "/doc/", Some("/doc/"), &[]);
        check(&tree, "/doc/go1.html", Some("/doc/go1.html"), &[]);
        check(&tree, "/doc/go_faq.html", Some("/doc/go_faq.html"), &[]);
        check(&tree, "/info/gordon/public", Some("/info/:user/public"), &[("user", "gordon")]);
        check(
            &tree,
            "/info/gordon/project/java",
            Some("/info/:user/project/:project"),
            &[("user", "gordon"), ("project", "java")],
        );
    }

    #[test]
    fn test_misses_leave_params_empty() {
        let tree = build(SET);

        check(&tree, "/cmd/", None, &[]);
        check(&tree, "/doc/go2.html", None, &[]);
        check(&tree, "/info/gordon/private", None, &[]);
        check(&tree, "/nope", None, &[]);
        check(&tree, "", None, &[]);
    }

    #[test]
    fn test_root_falls_through_to_wildcard() {
        let tree = build(&["/dir1/*filepath1", "/dir2/*filepath2", "/*filepath3"]);

        check(&tree, "/", Some("/*filepath3"), &[("filepath3", "/")]);
        check(&tree, "/dir1/a", Some("/dir1/*filepath1"), &[("filepath1", "/a")]);
        check(&tree, "/dir2/", Some("/dir2/*filepath2"), &[("filepath2", "/")]);
    }

    #[test]
    fn test_trailing_slash_tolerance() {
        check(&build(&["/search/"]), "/search", Some("/search/"), &[]);
        check(&build(&["/search"]), "/search/", Some("/search"), &[]);
    }

    #[test]
    fn test_trailing_slash_prefers_exact_child() {
        let tree = build(&["/search", "/search/"]);

        check(&tree, "/search", Some("/search"), &[]);
        check(&tree, "/search/", Some("/search/"), &[]);
    }

    #[test]
    fn test_static_beats_wildcard_in_either_order() {
        for patterns in [["/dir/*filepath", "/*filepath"], ["/*filepath", "/dir/*filepath"]] {
            let tree = build(&patterns);
            check(&tree, "/dir/file1", Some("/dir/*filepath"), &[("filepath", "/file1")]);
            check(&tree, "/file1", Some("/*filepath"), &[("filepath", "/file1")]);
        }
    }

    #[test]
    fn test_backtracks_from_failed_literal_branch() {
        let tree = build(&["/dir/*filepath", "/*filepath"]);

        check(&tree, "/dirx", Some("/*filepath"), &[("filepath", "/dirx")]);
    }

    #[test]
    fn test_backtracking_discards_failed_captures() {
        let tree = build(&["/users/:name", "/users/:nick/settings"]);

        check(&tree, "/users/bob", Some("/users/:name"), &[("name", "bob")]);
        check(&tree, "/users/bob/settings", Some("/users/:nick/settings"), &[("nick", "bob")]);
    }

    #[test]
    fn test_param_requires_non_empty_segment() {
        let tree = build(&["/users/:id"]);

        check(&tree, "/users/", None, &[]);
        check(&tree, "/users//x", None, &[]);
    }

    #[test]
    fn test_tokens_are_never_split() {
        let tree = build(&["/:id", "/:idx/edit"]);

        check(&tree, "/42", Some("/:id"), &[("id", "42")]);
        check(&tree, "/42/edit", Some("/:idx/edit"), &[("idx", "42")]);
        assert!(tree.root().children()[0].children().iter().any(|c| c.label() == ":id"));
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let tree = build(&["/é", "/è"]);

        check(&tree, "/é", Some("/é"), &[]);
        check(&tree, "/è", Some("/è"), &[]);
        check(&tree, "/e", None, &[]);
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut tree = build(&["/a/:id"]);

        assert_eq!(tree.add("/a/:id", "again"), Err(TreeError::Duplicate("/a/:id".into())));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_valueless_split_node_accepts_value() {
        let mut tree = build(&["/dir1/x", "/dir2/y"]);

        tree.add("/dir", "/dir").unwrap();
        check(&tree, "/dir", Some("/dir"), &[]);
        check(&tree, "/dir1/x", Some("/dir1/x"), &[]);
        assert_eq!(tree.add("/dir", "again"), Err(TreeError::Duplicate("/dir".into())));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let mut tree: Tree<()> = Tree::new();
        assert_eq!(tree.add("", ()), Err(TreeError::EmptyPath));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_find_is_idempotent() {
        let tree = build(SET);

        let mut first = Params::new();
        let a = tree.find("/info/gordon/project/java", &mut first).copied();
        for _ in 0..3 {
            let mut again = Params::new();
            assert_eq!(tree.find("/info/gordon/project/java", &mut again).copied(), a);
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_display_lists_every_edge() {
        let tree = build(&["/cmd/:tool/:sub", "/cmd/:tool/"]);
        let dump = tree.to_string();

        assert!(dump.starts_with("<root>"));
        assert!(dump.contains("/cmd/:tool/ (priority 6) *"));
        assert!(dump.contains(":sub (priority 1) *"));
    }
}
