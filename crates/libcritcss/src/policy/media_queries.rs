use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::ast::collapse_whitespace;
use crate::StyleAst;
use crate::VisitAction;

/// Returns `true` if a single media query can apply when rendering to a
/// screen.
///
/// Queries without a media type are useful, `screen` and `all` are useful
/// unless negated (`not screen and (color)` still matches some screens),
/// and every other type (`print`, `speech`, ...) is useful only when
/// negated. A leading `only` is ignored. Text that doesn't look like a
/// media query is treated as useful.
///
/// ```
/// use libcritcss::policy::is_useful_media_query_text;
///
/// assert!(is_useful_media_query_text("(min-width: 640px)"));
/// assert!(is_useful_media_query_text("only screen and (max-width: 10em)"));
/// assert!(is_useful_media_query_text("not print"));
/// assert!(!is_useful_media_query_text("print"));
/// assert!(!is_useful_media_query_text("print and (orientation: landscape)"));
/// assert!(!is_useful_media_query_text("not all"));
/// ```
pub fn is_useful_media_query_text(query: &str) -> bool {
    let query = collapse_whitespace(query).to_ascii_lowercase();
    let mut rest = query.as_str();

    let negated = take_keyword(&mut rest, "not");
    if !negated {
        take_keyword(&mut rest, "only");
    }
    let Some(media_type) = take_ident(&mut rest) else {
        return true;
    };
    let has_conditions = !rest.trim().is_empty();

    match media_type {
        "screen" | "all" => !negated || has_conditions,
        _ => negated,
    }
}

/// Consumes `keyword` (and the whitespace after it) if `rest` starts with
/// it as a whole word.
fn take_keyword(rest: &mut &str, keyword: &str) -> bool {
    let text = *rest;
    let Some(after) = text.strip_prefix(keyword) else {
        return false;
    };
    if !after.is_empty() && !after.starts_with(' ') {
        return false;
    }
    *rest = after.trim_start();
    true
}

fn take_ident<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let text: &'a str = *rest;
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let (ident, after) = text.split_at(end);
    *rest = after;
    Some(ident)
}

impl StyleTree {
    /// Returns `true` if `id` is relevant to screen rendering.
    ///
    /// `id` may be a `MediaQuery` node or an `@media` at-rule; an at-rule
    /// is useful when any query of its list is (or when the list is
    /// empty). Every other node is useful.
    pub fn is_useful_media_query(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::MediaQuery { text } => is_useful_media_query_text(text),
            NodeKind::AtRule { name } if name.eq_ignore_ascii_case("media") => {
                let queries: Vec<NodeId> = self
                    .prelude(id)
                    .map(|prelude| {
                        self.children(prelude)
                            .iter()
                            .copied()
                            .filter(|child| {
                                matches!(self.kind(*child), NodeKind::MediaQuery { .. })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                queries.is_empty()
                    || queries
                        .into_iter()
                        .any(|query| self.is_useful_media_query(query))
            },
            _ => true,
        }
    }
}

impl StyleAst {
    /// Removes `@media` rules that can't apply to a screen, such as
    /// `@media print`. Returns the number of removed at-rules.
    pub fn prune_media_queries(&mut self) -> usize {
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::AtRule { .. } if !tree.is_useful_media_query(id) => VisitAction::Remove,
                NodeKind::AtRule { .. } | NodeKind::Block { .. } | NodeKind::Rule => {
                    VisitAction::Continue
                },
                NodeKind::StyleSheet => VisitAction::Continue,
                _ => VisitAction::SkipChildren,
            }
        });
        tracing::debug!(
            removed = stats.removed,
            cascaded = stats.cascaded,
            "pruned media queries",
        );
        stats.removed
    }
}
