/// Whether a [`NodeKind::Block`] holds declarations or nested rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockContents {
    /// `a { color: red; margin: 0 }`, `@font-face { ... }`
    Declarations,
    /// `@media print { a { ... } b { ... } }`
    Rules,
}

/// The kind of a tree node, together with its semantic data.
///
/// Text-bearing kinds store raw source text (escapes are not decoded) so
/// that structural serialization reproduces the author's spelling.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The root of every tree. Children: rules, at-rules, comments and
    /// opaque `Raw` nodes.
    StyleSheet,

    /// A qualified (style) rule. Children: `SelectorList`, then `Block`.
    Rule,

    /// `@name prelude { ... }` or `@name prelude;`. Children: an optional
    /// `Prelude`, then an optional `Block`.
    AtRule {
        /// The name without the `@`, as written.
        name: String,
    },

    /// The prelude of an at-rule. Children: component values, or
    /// `MediaQuery` nodes for `@media`.
    Prelude,

    /// One comma-separated entry of an `@media` prelude.
    MediaQuery {
        /// Query text with comments removed and whitespace collapsed.
        text: String,
    },

    /// The comma-separated selectors of a rule. Children: `Selector`s.
    SelectorList,

    /// A single complex selector.
    Selector {
        /// Normalized selector text (see
        /// [`normalize_selector`](crate::ast::normalize_selector)). Used
        /// for critical-selector membership tests and for structural
        /// serialization.
        text: String,
    },

    /// `{ ... }` of a rule or at-rule.
    Block {
        contents: BlockContents,
    },

    /// `property: value [!important]`. Children: a single `Value`.
    Declaration {
        /// Property name as written.
        property: String,
        important: bool,
    },

    /// The value of a declaration. Children: component values.
    Value,

    /// An identifier component value.
    Ident {
        name: String,
    },

    /// A quoted string component value.
    StringLit {
        /// Raw string contents without the quotes.
        value: String,
        quote: char,
    },

    /// A `url(...)` reference, quoted or not.
    Url {
        /// The referenced url, raw and without quotes.
        url: String,
        /// The quote character for `url("...")` / `url('...')`.
        quote: Option<char>,
    },

    /// `name( ... )`. Children: component values.
    Function {
        name: String,
    },

    /// `( ... )`, `[ ... ]` or `{ ... }` inside a value or prelude.
    SimpleBlock {
        /// The opening character.
        open: char,
    },

    /// `,` inside a value or prelude.
    Comma,

    /// Whitespace inside a value, prelude or selector.
    Whitespace,

    /// A `/* ... */` comment.
    Comment {
        /// The comment including its delimiters.
        text: String,
    },

    /// Any other single token (numbers, hashes, delimiters, ...).
    Other {
        text: String,
    },

    /// Source text that could not be parsed into structure. Always
    /// serialized verbatim.
    Raw {
        text: String,
    },
}

impl NodeKind {
    /// Returns a short label for this kind (used in debug output).
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::StyleSheet => "StyleSheet",
            NodeKind::Rule => "Rule",
            NodeKind::AtRule { .. } => "AtRule",
            NodeKind::Prelude => "Prelude",
            NodeKind::MediaQuery { .. } => "MediaQuery",
            NodeKind::SelectorList => "SelectorList",
            NodeKind::Selector { .. } => "Selector",
            NodeKind::Block { .. } => "Block",
            NodeKind::Declaration { .. } => "Declaration",
            NodeKind::Value => "Value",
            NodeKind::Ident { .. } => "Ident",
            NodeKind::StringLit { .. } => "StringLit",
            NodeKind::Url { .. } => "Url",
            NodeKind::Function { .. } => "Function",
            NodeKind::SimpleBlock { .. } => "SimpleBlock",
            NodeKind::Comma => "Comma",
            NodeKind::Whitespace => "Whitespace",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::Other { .. } => "Other",
            NodeKind::Raw { .. } => "Raw",
        }
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, NodeKind::Rule)
    }

    pub fn is_at_rule(&self) -> bool {
        matches!(self, NodeKind::AtRule { .. })
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self, NodeKind::Declaration { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, NodeKind::Comment { .. })
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, NodeKind::Whitespace)
    }

    /// Returns the at-rule name if this is an `AtRule`.
    pub fn at_rule_name(&self) -> Option<&str> {
        match self {
            NodeKind::AtRule { name } => Some(name),
            _ => None,
        }
    }

    /// Returns the property name if this is a `Declaration`.
    pub fn property(&self) -> Option<&str> {
        match self {
            NodeKind::Declaration { property, .. } => Some(property),
            _ => None,
        }
    }
}
