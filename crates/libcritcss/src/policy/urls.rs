use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::StyleAst;
use crate::VisitAction;
use url::Url;

impl StyleAst {
    /// Resolves every relative url against `base`, the url the stylesheet
    /// was loaded from.
    ///
    /// Covers `url(...)` values anywhere (including `@font-face` sources
    /// and `@import` preludes) and the string form of `@import`. Empty
    /// urls, `data:` urls, absolute urls and fragment-only references
    /// (`url(#gradient)`) are left as they are, and so is any url that
    /// can't be resolved. Returns the number of rewritten urls.
    ///
    /// ```
    /// use libcritcss::StyleAst;
    /// use url::Url;
    ///
    /// let mut ast = StyleAst::parse("a { background: url(../img/x.png) }").unwrap();
    /// let base = Url::parse("https://example.com/css/").unwrap();
    /// assert_eq!(ast.absolutify_urls(&base), 1);
    /// assert_eq!(ast.to_css(), "a{background:url(https://example.com/img/x.png)}");
    /// ```
    pub fn absolutify_urls(&mut self, base: &Url) -> usize {
        let mut rewritten = 0;
        let root = self.tree.root();
        self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            match tree.kind(id) {
                NodeKind::Url { url, quote } => {
                    let quote = *quote;
                    if let Some(absolute) = absolutify(base, url) {
                        tree.set_kind(id, NodeKind::Url { url: absolute, quote });
                        rewritten += 1;
                    }
                    VisitAction::SkipChildren
                },
                NodeKind::StringLit { value, quote } if is_import_target(tree, id) => {
                    let quote = *quote;
                    if let Some(absolute) = absolutify(base, value)
                        && !absolute.contains(quote)
                    {
                        tree.set_kind(id, NodeKind::StringLit { value: absolute, quote });
                        rewritten += 1;
                    }
                    VisitAction::SkipChildren
                },
                NodeKind::SelectorList => VisitAction::SkipChildren,
                _ => VisitAction::Continue,
            }
        });
        tracing::debug!(rewritten, base = %base, "absolutified urls");
        rewritten
    }
}

/// Returns the resolved form of `url`, or `None` if it should be left
/// unchanged.
fn absolutify(base: &Url, url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let is_data = trimmed
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"));
    if is_data || Url::parse(trimmed).is_ok() {
        return None;
    }
    match base.join(trimmed) {
        Ok(resolved) => Some(resolved.into()),
        Err(error) => {
            tracing::warn!(url = trimmed, %error, "leaving unresolvable url unchanged");
            None
        },
    }
}

/// `@import "theme.css";`
fn is_import_target(tree: &StyleTree, string: NodeId) -> bool {
    tree.parent(string)
        .filter(|parent| matches!(tree.kind(*parent), NodeKind::Prelude))
        .and_then(|prelude| tree.parent(prelude))
        .and_then(|at_rule| tree.kind(at_rule).at_rule_name())
        .is_some_and(|name| name.eq_ignore_ascii_case("import"))
}
