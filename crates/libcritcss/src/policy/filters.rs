use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;
use crate::query::css_text;
use crate::StyleAst;
use crate::VisitAction;
use regex::Regex;
use regex::RegexBuilder;

/// Decides whether a declaration survives
/// [`StyleAst::apply_filters`].
///
/// Implemented for any `Fn(&str, &str) -> bool` taking the property name
/// and the whitespace-collapsed value.
pub trait PropertyFilter {
    fn keep(&self, property: &str, value: &str) -> bool;
}

impl<F> PropertyFilter for F
where
    F: Fn(&str, &str) -> bool,
{
    fn keep(&self, property: &str, value: &str) -> bool {
        self(property, value)
    }
}

/// What an [`AtRuleFilter`] gets to see of an at-rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AtRuleDescriptor<'a> {
    /// Name without the `@`, as written.
    pub name: &'a str,
    /// Prelude with comments removed and whitespace collapsed. Empty when
    /// the at-rule has no prelude.
    pub prelude: &'a str,
    /// `false` for statement at-rules such as `@import url(a.css);`.
    pub has_block: bool,
}

/// Decides whether an at-rule (and everything inside it) survives
/// [`StyleAst::apply_filters`].
///
/// Implemented for any `Fn(&AtRuleDescriptor<'_>) -> bool`.
pub trait AtRuleFilter {
    fn keep(&self, at_rule: &AtRuleDescriptor<'_>) -> bool;
}

impl<F> AtRuleFilter for F
where
    F: Fn(&AtRuleDescriptor<'_>) -> bool,
{
    fn keep(&self, at_rule: &AtRuleDescriptor<'_>) -> bool {
        self(at_rule)
    }
}

/// A pair of optional filters applied together in one pass.
///
/// ```
/// use libcritcss::policy::AtRuleDescriptor;
/// use libcritcss::FilterSpec;
/// use libcritcss::StyleAst;
///
/// let mut ast = StyleAst::parse(
///     "@import url(x.css); a { color: red; float: left }",
/// ).unwrap();
/// let filters = FilterSpec::new()
///     .with_properties(|property: &str, _value: &str| property != "float")
///     .with_at_rules(|at_rule: &AtRuleDescriptor<'_>| at_rule.name != "import");
/// assert_eq!(ast.apply_filters(&filters), 2);
/// assert_eq!(ast.to_css(), "a{color: red}");
/// ```
#[derive(Default)]
pub struct FilterSpec {
    pub properties: Option<Box<dyn PropertyFilter + Send + Sync>>,
    pub at_rules: Option<Box<dyn AtRuleFilter + Send + Sync>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(mut self, filter: impl PropertyFilter + Send + Sync + 'static) -> Self {
        self.properties = Some(Box::new(filter));
        self
    }

    pub fn with_at_rules(mut self, filter: impl AtRuleFilter + Send + Sync + 'static) -> Self {
        self.at_rules = Some(Box::new(filter));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_none() && self.at_rules.is_none()
    }
}

impl std::fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterSpec")
            .field("properties", &self.properties.is_some())
            .field("at_rules", &self.at_rules.is_some())
            .finish()
    }
}

/// A [`PropertyFilter`] driven by `{pattern: exclude}` configuration.
///
/// Patterns are regular expressions matched case-insensitively against
/// the whole property name. The first matching pattern decides: `true`
/// drops the declaration, `false` keeps it. Properties matching no
/// pattern are kept.
///
/// ```
/// use libcritcss::policy::PropertyFilter;
/// use libcritcss::policy::PropertyPatternFilter;
///
/// let filter = PropertyPatternFilter::new([
///     ("-webkit-box-shadow", false),
///     ("-webkit-.*", true),
/// ]).unwrap();
/// assert!(filter.keep("-webkit-box-shadow", "none"));
/// assert!(!filter.keep("-WEBKIT-appearance", "none"));
/// assert!(filter.keep("color", "red"));
/// ```
#[derive(Clone, Debug)]
pub struct PropertyPatternFilter {
    patterns: Vec<(Regex, bool)>,
}

impl PropertyPatternFilter {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|(pattern, exclude)| {
                let regex = RegexBuilder::new(&format!("^(?:{})$", pattern.as_ref()))
                    .case_insensitive(true)
                    .build()?;
                Ok((regex, exclude))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { patterns })
    }

    /// Builds a filter that excludes every property matching any of
    /// `patterns`.
    pub fn excluding<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(patterns.into_iter().map(|pattern| (pattern, true)))
    }

    pub fn is_excluded(&self, property: &str) -> bool {
        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(property))
            .is_some_and(|(_, exclude)| *exclude)
    }
}

impl PropertyFilter for PropertyPatternFilter {
    fn keep(&self, property: &str, _value: &str) -> bool {
        !self.is_excluded(property)
    }
}

impl StyleAst {
    /// Removes declarations and at-rules rejected by `filters`, in a
    /// single pass. Returns the number of removed nodes (not counting
    /// rules removed because they became empty).
    pub fn apply_filters(&mut self, filters: &FilterSpec) -> usize {
        if filters.is_empty() {
            return 0;
        }
        self.run_filters(
            filters
                .properties
                .as_deref()
                .map(|filter| filter as &dyn PropertyFilter),
            filters
                .at_rules
                .as_deref()
                .map(|filter| filter as &dyn AtRuleFilter),
        )
    }

    /// Removes declarations rejected by `filter`.
    pub fn apply_properties_filter(&mut self, filter: impl PropertyFilter) -> usize {
        self.run_filters(Some(&filter), None)
    }

    /// Removes at-rules rejected by `filter`.
    pub fn apply_at_rules_filter(&mut self, filter: impl AtRuleFilter) -> usize {
        self.run_filters(None, Some(&filter))
    }

    fn run_filters(
        &mut self,
        properties: Option<&dyn PropertyFilter>,
        at_rules: Option<&dyn AtRuleFilter>,
    ) -> usize {
        let css: &str = &self.css;
        let root = self.tree.root();
        let stats = self.tree.walk(root, &mut |tree: &mut StyleTree, id: NodeId| {
            filter_node(tree, css, id, properties, at_rules)
        });
        tracing::debug!(
            removed = stats.removed,
            cascaded = stats.cascaded,
            "applied filters",
        );
        stats.removed
    }
}

fn filter_node(
    tree: &StyleTree,
    css: &str,
    id: NodeId,
    properties: Option<&dyn PropertyFilter>,
    at_rules: Option<&dyn AtRuleFilter>,
) -> VisitAction {
    match tree.kind(id) {
        NodeKind::Declaration { property, .. } => {
            if let Some(filter) = properties {
                let value = tree
                    .value(id)
                    .map(|value| css_text(tree, css, value))
                    .unwrap_or_default();
                if !filter.keep(property, &value) {
                    return VisitAction::Remove;
                }
            }
            VisitAction::SkipChildren
        },
        NodeKind::AtRule { name } => {
            if let Some(filter) = at_rules {
                let prelude = tree
                    .prelude(id)
                    .map(|prelude| css_text(tree, css, prelude))
                    .unwrap_or_default();
                let descriptor = AtRuleDescriptor {
                    name,
                    prelude: &prelude,
                    has_block: tree.block(id).is_some(),
                };
                if !filter.keep(&descriptor) {
                    return VisitAction::Remove;
                }
            }
            VisitAction::Continue
        },
        NodeKind::Prelude | NodeKind::SelectorList => VisitAction::SkipChildren,
        _ => VisitAction::Continue,
    }
}
