//! Logging and debugging facilities for Trellis.
//!
//! This module provides:
//! - `tracing` targets for every toolkit subsystem
//! - Tree visualization for widget hierarchies
//! - A performance span guard for profiling
//!
//! # Tracing Integration
//!
//! Trellis emits its diagnostics through the `tracing` crate. Install a
//! subscriber in the application to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis::dispatch=trace,trellis::redraw=debug")
//!     .init();
//! ```

use std::fmt::Write as FmtWrite;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Widget tree mutations (add, release, destroy, layering).
    pub const TREE: &str = "trellis::tree";
    /// Event queue and merging.
    pub const QUEUE: &str = "trellis::queue";
    /// Event dispatch to capability handlers.
    pub const DISPATCH: &str = "trellis::dispatch";
    /// Device grab stack.
    pub const GRAB: &str = "trellis::grab";
    /// Pointer focus timing.
    pub const FOCUS: &str = "trellis::focus";
    /// Offscreen drawing and composition.
    pub const REDRAW: &str = "trellis::redraw";
    /// Raster surfaces and image loading.
    pub const RENDER: &str = "trellis::render";
    /// Host event translation and host view calls.
    pub const HOST: &str = "trellis::host";
    /// Style and theme lookup.
    pub const STYLE: &str = "trellis::style";
    /// URID minting.
    pub const URID: &str = "trellis::urid";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options using plain ASCII branches.
    pub fn ascii() -> Self {
        Self {
            style: TreeStyle::Ascii,
            ..Default::default()
        }
    }

    /// Limit the traversal depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// Format a tree rooted at `root`.
///
/// `label` renders one node on a single line and `children` lists a node's
/// children in display order. The caller owns the tree representation, so the
/// same formatter serves widget arenas and test fixtures alike.
///
/// ```
/// use trellis_core::logging::{format_tree, TreeFormatOptions};
///
/// let children = |n: &u32| if *n == 0 { vec![1, 2] } else { vec![] };
/// let out = format_tree(&0, &TreeFormatOptions::ascii(), &|n: &u32| format!("node{n}"), &children);
/// assert_eq!(out, "node0\n+-- node1\n    node2\n");
/// ```
pub fn format_tree<N>(
    root: &N,
    options: &TreeFormatOptions,
    label: &dyn Fn(&N) -> String,
    children: &dyn Fn(&N) -> Vec<N>,
) -> String {
    let mut output = String::new();
    format_subtree_into(root, 0, true, options, label, children, &mut output);
    output
}

fn format_subtree_into<N>(
    node: &N,
    depth: usize,
    is_last: bool,
    options: &TreeFormatOptions,
    label: &dyn Fn(&N) -> String,
    children: &dyn Fn(&N) -> Vec<N>,
    output: &mut String,
) {
    if options.max_depth.is_some_and(|max| depth > max) {
        return;
    }

    output.push_str(&build_prefix(options, depth, is_last));
    let _ = writeln!(output, "{}", label(node));

    let kids = children(node);
    let count = kids.len();
    for (i, child) in kids.iter().enumerate() {
        format_subtree_into(child, depth + 1, i + 1 == count, options, label, children, output);
    }
}

fn build_prefix(options: &TreeFormatOptions, depth: usize, is_last: bool) -> String {
    if depth == 0 {
        return String::new();
    }

    let (branch, corner, last) = match options.style {
        TreeStyle::Ascii => ("|", "+--", "   "),
        TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
        TreeStyle::Compact => ("", "-", "-"),
    };

    let mut prefix = String::new();
    for _ in 0..(depth - 1) {
        prefix.push_str(branch);
        for _ in 0..options.indent_size {
            prefix.push(' ');
        }
    }
    prefix.push_str(if is_last { last } else { corner });
    prefix.push(' ');
    prefix
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure the duration of redraw and dispatch passes.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn children(n: &u32) -> Vec<u32> {
        match n {
            0 => vec![1, 2],
            1 => vec![3],
            _ => vec![],
        }
    }

    #[test]
    fn test_unicode_tree() {
        let out = format_tree(
            &0,
            &TreeFormatOptions::default(),
            &|n: &u32| format!("w{n}"),
            &children,
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "w0");
        assert!(lines[1].starts_with('\u{251c}'));
        assert!(lines[1].ends_with("w1"));
        assert!(lines[3].starts_with('\u{2514}'));
    }

    #[test]
    fn test_max_depth() {
        let out = format_tree(
            &0,
            &TreeFormatOptions::ascii().with_max_depth(1),
            &|n: &u32| format!("w{n}"),
            &children,
        );
        assert!(!out.contains("w3"));
        assert!(out.contains("w2"));
    }

    #[test]
    fn test_perf_span_is_current_until_dropped() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("trellis::perf=info"))
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let span = PerfSpan::new("redraw");
            let current = tracing::Span::current();
            assert_eq!(current.metadata().map(|m| m.name()), Some("perf"));
            drop(span);
            assert!(tracing::Span::current().is_none());
        });
    }
}
