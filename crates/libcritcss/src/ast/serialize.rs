use crate::ast::BlockContents;
use crate::ast::NodeId;
use crate::ast::NodeKind;
use crate::ast::StyleTree;

impl StyleTree {
    /// Appends the CSS text of `id` to `sink`.
    ///
    /// Pristine nodes are copied byte-for-byte from `source`; modified or
    /// synthesized nodes are rebuilt from their data and children. When
    /// `source` is `None` every node is rebuilt.
    pub fn append_css(&self, id: NodeId, sink: &mut String, source: Option<&str>) {
        let node = self.node(id);
        if !node.modified
            && let (Some(span), Some(src)) = (node.span, source)
            && let Some(text) = span.slice(src)
        {
            sink.push_str(text);
            return;
        }

        match &node.kind {
            NodeKind::StyleSheet | NodeKind::Rule => {
                self.append_children(id, sink, source);
            },
            NodeKind::Value => {
                // Removals can leave whitespace at either end.
                let children = &node.children;
                let is_ws = |child: &NodeId| self.kind(*child).is_whitespace();
                let start = children.iter().position(|c| !is_ws(c)).unwrap_or(children.len());
                let end = children.iter().rposition(|c| !is_ws(c)).map_or(start, |i| i + 1);
                for child in &children[start..end] {
                    self.append_css(*child, sink, source);
                }
            },
            NodeKind::AtRule { name } => {
                sink.push('@');
                sink.push_str(name);
                if let Some(prelude) = self.prelude(id) {
                    let mut prelude_text = String::new();
                    self.append_css(prelude, &mut prelude_text, source);
                    if !prelude_text.is_empty() {
                        sink.push(' ');
                        sink.push_str(&prelude_text);
                    }
                }
                match self.block(id) {
                    Some(block) => self.append_css(block, sink, source),
                    None => sink.push(';'),
                }
            },
            NodeKind::Prelude => {
                let is_media_list = node
                    .children
                    .iter()
                    .any(|child| matches!(self.kind(*child), NodeKind::MediaQuery { .. }));
                if is_media_list {
                    self.append_joined(&node.children, ",", sink, source);
                } else {
                    self.append_children(id, sink, source);
                }
            },
            NodeKind::SelectorList => {
                self.append_joined(&node.children, ",", sink, source);
            },
            NodeKind::MediaQuery { text } | NodeKind::Selector { text } => {
                sink.push_str(text);
            },
            NodeKind::Block { contents } => {
                sink.push('{');
                let mut needs_separator = false;
                for child in &node.children {
                    if self.kind(*child).is_comment() {
                        self.append_css(*child, sink, source);
                        continue;
                    }
                    if needs_separator {
                        sink.push(';');
                    }
                    self.append_css(*child, sink, source);
                    needs_separator = *contents == BlockContents::Declarations
                        && matches!(
                            self.kind(*child),
                            NodeKind::Declaration { .. } | NodeKind::Raw { .. },
                        );
                }
                sink.push('}');
            },
            NodeKind::Declaration { property, important } => {
                sink.push_str(property);
                sink.push(':');
                if let Some(value) = self.value(id) {
                    self.append_css(value, sink, source);
                }
                if *important {
                    sink.push_str("!important");
                }
            },
            NodeKind::Ident { name } => sink.push_str(name),
            NodeKind::StringLit { value, quote } => {
                sink.push(*quote);
                sink.push_str(value);
                sink.push(*quote);
            },
            NodeKind::Url { url, quote } => {
                sink.push_str("url(");
                match quote {
                    Some(q) => {
                        sink.push(*q);
                        sink.push_str(url);
                        sink.push(*q);
                    },
                    None if needs_quoting(url) => {
                        sink.push('"');
                        sink.push_str(&url.replace('"', "\\\""));
                        sink.push('"');
                    },
                    None => sink.push_str(url),
                }
                sink.push(')');
            },
            NodeKind::Function { name } => {
                sink.push_str(name);
                sink.push('(');
                self.append_children(id, sink, source);
                sink.push(')');
            },
            NodeKind::SimpleBlock { open } => {
                sink.push(*open);
                self.append_children(id, sink, source);
                sink.push(match open {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                });
            },
            NodeKind::Comma => sink.push(','),
            NodeKind::Whitespace => sink.push(' '),
            NodeKind::Comment { text }
            | NodeKind::Other { text }
            | NodeKind::Raw { text } => sink.push_str(text),
        }
    }

    /// Returns the CSS text of `id`. See [`append_css`](Self::append_css).
    pub fn to_css(&self, id: NodeId, source: Option<&str>) -> String {
        let mut sink = String::new();
        self.append_css(id, &mut sink, source);
        sink
    }

    fn append_children(&self, id: NodeId, sink: &mut String, source: Option<&str>) {
        for child in self.children(id) {
            self.append_css(*child, sink, source);
        }
    }

    fn append_joined(
        &self,
        ids: &[NodeId],
        separator: &str,
        sink: &mut String,
        source: Option<&str>,
    ) {
        for (index, child) in ids.iter().enumerate() {
            if index > 0 {
                sink.push_str(separator);
            }
            self.append_css(*child, sink, source);
        }
    }
}

/// Returns `true` if an unquoted url would not survive being written back
/// as `url(...)`.
fn needs_quoting(url: &str) -> bool {
    url.chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')'))
}
