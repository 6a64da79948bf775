//! Read-only scans over a [`StyleAst`].

use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::ast::collapse_whitespace;
use crate::policy::is_excluded_selector;
use crate::StyleAst;

impl StyleTree {
    /// Returns `true` if `rule` is a keyframe stop (`from`, `to`, `50%`)
    /// inside an `@keyframes` block, vendor-prefixed or not.
    pub fn is_keyframe_rule(&self, rule: NodeId) -> bool {
        self.enclosing_at_rule(rule)
            .and_then(|at_rule| self.kind(at_rule).at_rule_name())
            .is_some_and(|name| name.to_ascii_lowercase().ends_with("keyframes"))
    }
}

impl StyleAst {
    /// Number of style rules in the tree. At-rules are not counted, rules
    /// nested inside them are.
    pub fn rule_count(&self) -> usize {
        self.tree.rule_ids().count()
    }

    /// Calls `callback` with the normalized text of every selector, in
    /// document order.
    ///
    /// Keyframe stops and selectors that only style user selections
    /// (`::selection`) are skipped.
    pub fn for_each_selector(&self, mut callback: impl FnMut(&str)) {
        for rule in self.tree.rule_ids() {
            if self.tree.is_keyframe_rule(rule) {
                continue;
            }
            for selector in self.tree.selectors(rule) {
                if let NodeKind::Selector { text } = self.tree.kind(selector)
                    && !is_excluded_selector(text)
                {
                    callback(text);
                }
            }
        }
    }

    /// Collects [`for_each_selector`](Self::for_each_selector) into a
    /// vector. Duplicates are kept.
    pub fn selectors(&self) -> Vec<String> {
        let mut selectors = Vec::new();
        self.for_each_selector(|text| selectors.push(text.to_string()));
        selectors
    }

    /// Reads `id` as a plain value.
    ///
    /// Strings and urls lose their quotes, identifiers and selectors read
    /// as their text, and a declaration or value consisting of a single
    /// component reads as that component. Anything else reads as its
    /// whitespace-collapsed CSS with surrounding quotes stripped.
    pub fn read_value(&self, id: NodeId) -> String {
        match self.tree.kind(id) {
            NodeKind::StringLit { value, .. } => value.clone(),
            NodeKind::Url { url, .. } => url.clone(),
            NodeKind::Ident { name } => name.clone(),
            NodeKind::Selector { text } | NodeKind::MediaQuery { text } => text.clone(),
            NodeKind::Declaration { .. } => match self.tree.value(id) {
                Some(value) => self.read_value(value),
                None => String::new(),
            },
            NodeKind::Value => {
                let significant: Vec<NodeId> = self
                    .tree
                    .children(id)
                    .iter()
                    .copied()
                    .filter(|child| {
                        !matches!(
                            self.tree.kind(*child),
                            NodeKind::Whitespace | NodeKind::Comment { .. },
                        )
                    })
                    .collect();
                match significant[..] {
                    [only] => self.read_value(only),
                    _ => self.css_text(id),
                }
            },
            _ => strip_quotes(&self.css_text(id)).to_string(),
        }
    }

    fn css_text(&self, id: NodeId) -> String {
        css_text(&self.tree, &self.css, id)
    }
}

/// The current CSS of `id` with comments removed and whitespace
/// collapsed.
pub(crate) fn css_text(tree: &StyleTree, css: &str, id: NodeId) -> String {
    collapse_whitespace(&tree.to_css(id, Some(css)))
}

/// Strips one pair of matching surrounding quotes.
pub(crate) fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2
            && let Some(inner) = text
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::strip_quotes;

    #[test]
    fn strips_matching_quotes_only() {
        assert_eq!(strip_quotes("\"Open Sans\""), "Open Sans");
        assert_eq!(strip_quotes("'a'"), "a");
        assert_eq!(strip_quotes("\"a'"), "\"a'");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("plain"), "plain");
    }
}
