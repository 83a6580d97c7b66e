//! Capture and match resolution.
//!
//! Narrows a query's output to the nodes bound to one capture name,
//! optionally restricted to a single pattern alternative.

use super::{Capture, CompiledQuery, DEFAULT_CAPTURE, PatternSelector, QueryMatch};

/// Runs `query` against `root` and returns the nodes bound to `capture`
/// (default `target`).
///
/// With [`PatternSelector::AllPatterns`] the flat capture list is filtered
/// by name. With [`PatternSelector::Pattern`] only matches of that pattern
/// contribute, in match order then capture order. A capture name the query
/// never declares, or a pattern index past the last pattern, resolves to no
/// nodes without running the query.
pub fn resolve<N, Q>(query: &Q, root: N, capture: Option<&str>, selector: PatternSelector) -> Vec<N>
where
    N: Copy,
    Q: CompiledQuery<N> + ?Sized,
{
    let name = capture.unwrap_or(DEFAULT_CAPTURE);
    if !query.declares_capture(name) {
        tracing::debug!(capture = name, "query declares no such capture");
        return Vec::new();
    }

    match selector {
        PatternSelector::AllPatterns => select_captures(&query.captures(root), name),
        PatternSelector::Pattern(index) if index >= query.pattern_count() => {
            tracing::debug!(
                pattern = index,
                patterns = query.pattern_count(),
                "query has no such pattern"
            );
            Vec::new()
        }
        PatternSelector::Pattern(index) => select_matches(&query.matches(root), name, index),
    }
}

pub fn select_captures<N: Copy>(captures: &[Capture<'_, N>], name: &str) -> Vec<N> {
    captures
        .iter()
        .filter(|capture| capture.name == name)
        .map(|capture| capture.node)
        .collect()
}

pub fn select_matches<N: Copy>(
    matches: &[QueryMatch<'_, N>],
    name: &str,
    pattern_index: usize,
) -> Vec<N> {
    matches
        .iter()
        .filter(|m| m.pattern_index == pattern_index)
        .flat_map(|m| m.captures.iter())
        .filter(|capture| capture.name == name)
        .map(|capture| capture.node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::language::SupportedLanguage;
    use crate::parser::ParsedFile;
    use crate::query::RuleQuery;

    /// Canned query output over plain `&str` nodes.
    struct FakeQuery {
        names: Vec<&'static str>,
        matches: Vec<(usize, Vec<(&'static str, &'static str)>)>,
        runs: Cell<usize>,
    }

    impl CompiledQuery<&'static str> for FakeQuery {
        fn pattern_count(&self) -> usize {
            self.matches.iter().map(|(p, _)| p + 1).max().unwrap_or(0)
        }

        fn declares_capture(&self, name: &str) -> bool {
            self.names.iter().any(|n| *n == name)
        }

        fn matches(&self, _root: &'static str) -> Vec<QueryMatch<'_, &'static str>> {
            self.runs.set(self.runs.get() + 1);
            self.matches
                .iter()
                .map(|(pattern_index, caps)| QueryMatch {
                    pattern_index: *pattern_index,
                    captures: caps
                        .iter()
                        .map(|(name, node)| Capture {
                            name: *name,
                            node: *node,
                        })
                        .collect(),
                })
                .collect()
        }

        fn captures(&self, root: &'static str) -> Vec<Capture<'_, &'static str>> {
            self.matches(root)
                .into_iter()
                .flat_map(|m| m.captures)
                .collect()
        }
    }

    fn two_pattern_query() -> FakeQuery {
        FakeQuery {
            names: vec!["target", "other"],
            matches: vec![
                (0, vec![("target", "a"), ("other", "b")]),
                (1, vec![("target", "c")]),
                (0, vec![("target", "d"), ("target", "e")]),
                (1, vec![("other", "f"), ("target", "g")]),
            ],
            runs: Cell::new(0),
        }
    }

    #[test]
    fn all_patterns_filters_flat_captures_by_name() {
        let query = two_pattern_query();

        let nodes = resolve(&query, "root", None, PatternSelector::AllPatterns);

        assert_eq!(nodes, vec!["a", "c", "d", "e", "g"]);
    }

    #[test]
    fn pattern_selector_keeps_only_that_pattern_in_match_then_capture_order() {
        let query = two_pattern_query();

        let first = resolve(&query, "root", Some("target"), PatternSelector::Pattern(0));
        let second = resolve(&query, "root", Some("target"), PatternSelector::Pattern(1));

        assert_eq!(first, vec!["a", "d", "e"]);
        assert_eq!(second, vec!["c", "g"]);
    }

    #[test]
    fn explicit_capture_name_is_honoured() {
        let query = two_pattern_query();

        let nodes = resolve(&query, "root", Some("other"), PatternSelector::AllPatterns);

        assert_eq!(nodes, vec!["b", "f"]);
    }

    #[test]
    fn undeclared_capture_resolves_to_nothing_for_any_selector() {
        let query = two_pattern_query();

        for selector in [
            PatternSelector::AllPatterns,
            PatternSelector::Pattern(0),
            PatternSelector::Pattern(1),
        ] {
            assert!(resolve(&query, "root", Some("missing"), selector).is_empty());
        }
    }

    #[test]
    fn unknown_pattern_index_resolves_to_nothing_without_running() {
        let query = two_pattern_query();

        assert!(resolve(&query, "root", None, PatternSelector::Pattern(7)).is_empty());
        assert_eq!(query.runs.get(), 0);

        resolve(&query, "root", None, PatternSelector::Pattern(1));
        assert_eq!(query.runs.get(), 1);
    }

    #[test]
    fn repeated_capture_names_within_a_match_are_all_kept() {
        let matches = vec![QueryMatch {
            pattern_index: 0,
            captures: vec![
                Capture { name: "target", node: 1 },
                Capture { name: "skip", node: 2 },
                Capture { name: "target", node: 3 },
            ],
        }];

        assert_eq!(select_matches(&matches, "target", 0), vec![1, 3]);
    }

    #[test]
    fn single_pattern_query_agrees_across_selectors() {
        let file = ParsedFile::from_source("t.py", "x = y + z\nprint(x)\n").unwrap();
        let query = RuleQuery::new(SupportedLanguage::Python, "(identifier) @target").unwrap();

        let all = resolve(&query, file.root(), None, PatternSelector::AllPatterns);
        let first = resolve(
            &query,
            file.root(),
            Some("target"),
            PatternSelector::Pattern(0),
        );

        assert_eq!(all, first);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn multi_pattern_tree_sitter_query_separates_alternatives() {
        let file = ParsedFile::from_source("t.py", "a = 1\nb = 'two'\nc = 3\n").unwrap();
        let query =
            RuleQuery::new(SupportedLanguage::Python, "(integer) @target\n(string) @target")
                .unwrap();

        let integers: Vec<_> = resolve(&query, file.root(), None, PatternSelector::Pattern(0))
            .iter()
            .map(|n| n.text())
            .collect();
        let strings: Vec<_> = resolve(&query, file.root(), None, PatternSelector::Pattern(1))
            .iter()
            .map(|n| n.text())
            .collect();

        assert_eq!(integers, vec!["1", "3"]);
        assert_eq!(strings, vec!["'two'"]);
    }
}
