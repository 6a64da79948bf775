use indexmap::IndexSet;

pub const SITE_STYLESHEET: &str = include_str!("site.css");

/// Selectors of [`SITE_STYLESHEET`] that render above the fold.
pub const SITE_CRITICAL_SELECTORS: &[&str] = &[
    "html",
    "body",
    "a",
    ".site-header",
    ".site-header .logo",
    ".site-header nav>a",
    ".hero",
    ".hero h1",
];

pub fn site_critical_selectors() -> IndexSet<String> {
    SITE_CRITICAL_SELECTORS.iter().map(|s| s.to_string()).collect()
}

/// Builds a stylesheet of `rule_count` rules, every fifth of them wrapped
/// in an `@media` block and every seventh preceded by a comment.
pub fn synthetic_stylesheet(rule_count: usize) -> String {
    let mut css = String::from(":root { --space: 4px; --ink: #111; }\n");
    for i in 0..rule_count {
        if i % 7 == 0 {
            css.push_str(&format!("/* section {i} */\n"));
        }
        let rule = format!(
            ".c{i}, .c{i} > .child-{i}:hover {{\n  color: var(--ink);\n  \
             margin: calc(var(--space) * {i});\n  cursor: pointer;\n  \
             background: url(img/{i}.png) no-repeat;\n}}\n",
        );
        if i % 5 == 0 {
            let query = if i % 10 == 0 { "print" } else { "screen and (min-width: 600px)" };
            css.push_str(&format!("@media {query} {{\n{rule}}}\n"));
        } else {
            css.push_str(&rule);
        }
    }
    css
}

/// Every `step`-th first selector of [`synthetic_stylesheet`].
pub fn synthetic_critical_selectors(rule_count: usize, step: usize) -> IndexSet<String> {
    (0..rule_count).step_by(step).map(|i| format!(".c{i}")).collect()
}

/// A rule nested `depth` levels deep in `@supports` blocks.
pub fn deeply_nested_stylesheet(depth: usize) -> String {
    let mut css = String::new();
    for _ in 0..depth {
        css.push_str("@supports (display: grid) { ");
    }
    css.push_str(".deep { color: red }");
    for _ in 0..depth {
        css.push_str(" }");
    }
    css
}
