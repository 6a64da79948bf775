use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::ast::collapse_whitespace;
use crate::query::css_text;
use crate::query::strip_quotes;
use crate::StyleAst;
use crate::VisitAction;
use indexmap::IndexSet;

/// Normalizes a font family name for comparison: quotes stripped,
/// whitespace collapsed, lowercased.
///
/// ```
/// use libcritcss::policy::normalize_font_family;
///
/// assert_eq!(normalize_font_family(" \"Open  Sans\" "), "open sans");
/// assert_eq!(normalize_font_family("Roboto"), "roboto");
/// ```
pub fn normalize_font_family(name: &str) -> String {
    let collapsed = collapse_whitespace(name);
    collapse_whitespace(strip_quotes(&collapsed)).to_lowercase()
}

impl StyleAst {
    /// Returns every font family named by a `font-family` declaration or
    /// a `font` shorthand, normalized with [`normalize_font_family`].
    ///
    /// Declarations inside `@font-face` define families rather than use
    /// them and are not scanned.
    ///
    /// ```
    /// use libcritcss::StyleAst;
    ///
    /// let ast = StyleAst::parse(
    ///     "a { font-family: 'Open Sans', serif } b { font: bold 12px/1.5 Lato }",
    /// ).unwrap();
    /// let fonts: Vec<_> = ast.get_used_font_families().into_iter().collect();
    /// assert_eq!(fonts, ["open sans", "serif", "lato"]);
    /// ```
    pub fn get_used_font_families(&self) -> IndexSet<String> {
        let mut families = IndexSet::new();
        let declarations = self
            .tree
            .descendants(self.tree.root())
            .filter(|id| self.tree.kind(*id).is_declaration())
            .filter(|id| {
                !self
                    .tree
                    .ancestors(*id)
                    .any(|ancestor| is_font_face(&self.tree, ancestor))
            });

        for declaration in declarations {
            let Some(property) = self.tree.kind(declaration).property() else {
                continue;
            };
            let Some(value) = self.tree.value(declaration) else {
                continue;
            };
            let text = css_text(&self.tree, &self.css, value);
            if property.eq_ignore_ascii_case("font-family") {
                families.extend(split_family_list(&text));
            } else if property.eq_ignore_ascii_case("font") {
                families.extend(split_family_list(shorthand_family_list(&text)));
            }
        }
        families
    }

    /// Returns the families defined by `@font-face` rules, normalized.
    pub fn get_declared_font_families(&self) -> IndexSet<String> {
        self.tree
            .descendants(self.tree.root())
            .filter(|id| is_font_face(&self.tree, *id))
            .filter_map(|id| declared_family(&self.tree, &self.css, id))
            .collect()
    }

    /// Removes `@font-face` rules for families not in `font_whitelist`.
    ///
    /// Whitelist entries are normalized before comparison. `@font-face`
    /// rules without a `font-family` descriptor are kept. Returns the
    /// number of removed rules.
    pub fn prune_non_critical_fonts(&mut self, font_whitelist: &IndexSet<String>) -> usize {
        let whitelist: IndexSet<String> = font_whitelist
            .iter()
            .map(|family| normalize_font_family(family))
            .collect();

        let css: &str = &self.css;
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            if is_font_face(tree, id) {
                return match declared_family(tree, css, id) {
                    Some(family) if !whitelist.contains(&family) => VisitAction::Remove,
                    _ => VisitAction::SkipChildren,
                };
            }
            match tree.kind(id) {
                NodeKind::StyleSheet
                | NodeKind::Rule
                | NodeKind::AtRule { .. }
                | NodeKind::Block { .. } => VisitAction::Continue,
                _ => VisitAction::SkipChildren,
            }
        });
        tracing::debug!(
            removed = stats.removed,
            whitelist = whitelist.len(),
            "pruned non-critical fonts",
        );
        stats.removed
    }
}

fn is_font_face(tree: &StyleTree, id: NodeId) -> bool {
    tree.kind(id)
        .at_rule_name()
        .is_some_and(|name| name.eq_ignore_ascii_case("font-face"))
}

/// The normalized `font-family` descriptor of an `@font-face` rule.
fn declared_family(tree: &StyleTree, css: &str, font_face: NodeId) -> Option<String> {
    let block = tree.block(font_face)?;
    let declaration = tree.children(block).iter().copied().find(|child| {
        tree.kind(*child)
            .property()
            .is_some_and(|property| property.eq_ignore_ascii_case("font-family"))
    })?;
    let value = tree.value(declaration)?;
    let family = normalize_font_family(&css_text(tree, css, value));
    (!family.is_empty()).then_some(family)
}

/// Splits a comma-separated family list, respecting quotes.
fn split_family_list(list: &str) -> Vec<String> {
    let mut families = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    for c in list.chars() {
        match (quote, c) {
            (None, '"' | '\'') => {
                quote = Some(c);
                current.push(c);
            },
            (Some(open), _) if c == open => {
                quote = None;
                current.push(c);
            },
            (None, ',') => families.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    families.push(current);

    families
        .iter()
        .map(|family| normalize_font_family(family))
        .filter(|family| !family.is_empty())
        .collect()
}

/// Returns the family list at the end of a `font` shorthand value, which
/// follows the mandatory size (and optional `/line-height`).
fn shorthand_family_list(value: &str) -> &str {
    let words = split_words(value);
    let Some(size_index) = words.iter().position(|(_, word)| is_font_size(word)) else {
        return "";
    };

    let mut next = size_index + 1;
    let size_word = words[size_index].1;
    if !size_word.contains('/') {
        match words.get(next) {
            Some((_, "/")) => next += 2,
            Some((_, word)) if word.starts_with('/') => next += 1,
            _ => {},
        }
    }
    match words.get(next) {
        Some((offset, _)) => &value[*offset..],
        None => "",
    }
}

/// Splits at whitespace outside quotes and parentheses, returning each
/// word with its byte offset.
fn split_words(value: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    let mut depth = 0usize;
    let mut quote = None;
    for (index, c) in value.char_indices() {
        match (quote, c) {
            (Some(open), _) if c == open => quote = None,
            (Some(_), _) => {},
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c.is_whitespace() && depth == 0 => {
                if let Some(word_start) = start.take() {
                    words.push((word_start, &value[word_start..index]));
                }
                continue;
            },
            _ => {},
        }
        if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(word_start) = start {
        words.push((word_start, &value[word_start..]));
    }
    words
}

/// Sizes carry a unit (`12px`, `80%`); a bare number is a weight unless
/// a line height follows it.
fn is_font_size(word: &str) -> bool {
    let (size, has_line_height) = match word.split_once('/') {
        Some((size, _)) => (size, true),
        None => (word, false),
    };
    let size = size.to_ascii_lowercase();
    let unsigned = size.trim_start_matches(['+', '-']);
    if unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return has_line_height || !unsigned.chars().all(|c| c.is_ascii_digit() || c == '.');
    }
    matches!(
        size.as_str(),
        "xx-small"
            | "x-small"
            | "small"
            | "medium"
            | "large"
            | "x-large"
            | "xx-large"
            | "xxx-large"
            | "smaller"
            | "larger",
    ) || ["calc(", "min(", "max(", "clamp(", "var("]
        .iter()
        .any(|function| size.starts_with(function))
}

#[cfg(test)]
mod tests {
    use super::shorthand_family_list;
    use super::split_family_list;

    #[test]
    fn family_lists_split_outside_quotes() {
        assert_eq!(
            split_family_list("\"Foo, Bar\", 'Baz Qux',serif"),
            ["foo, bar", "baz qux", "serif"],
        );
        assert!(split_family_list(" , ").is_empty());
    }

    #[test]
    fn shorthand_family_follows_size() {
        assert_eq!(shorthand_family_list("12px Arial"), "Arial");
        assert_eq!(shorthand_family_list("700 12px Arial"), "Arial");
        assert_eq!(shorthand_family_list("italic bold 12px/30px Georgia, serif"), "Georgia, serif");
        assert_eq!(shorthand_family_list("1em / 1.2 \"Open Sans\""), "\"Open Sans\"");
        assert_eq!(shorthand_family_list("small-caps large Verdana"), "Verdana");
        assert_eq!(shorthand_family_list("calc(1em + 2px) Lato"), "Lato");
        assert_eq!(shorthand_family_list("caption"), "");
        assert_eq!(shorthand_family_list("12px"), "");
    }
}
