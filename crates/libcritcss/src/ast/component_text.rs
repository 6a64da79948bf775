/// Normalizes selector text for comparison with critical selectors.
///
/// Comments are removed, whitespace runs collapse to a single space, no
/// whitespace is kept around the `>`, `+` and `~` combinators at the top
/// level, and the result is trimmed. Strings, escapes and the contents of
/// brackets are otherwise preserved as written.
///
/// ```
/// use libcritcss::ast::normalize_selector;
///
/// assert_eq!(normalize_selector("  ul  >  li  /* x */ a "), "ul>li a");
/// assert_eq!(normalize_selector("a[title=\"x  y\"]"), "a[title=\"x  y\"]");
/// ```
pub fn normalize_selector(raw: &str) -> String {
    normalize(raw, true)
}

/// Replaces comments in `raw` with whitespace, collapses whitespace runs
/// to a single space and trims the result. Strings are preserved.
pub fn collapse_whitespace(raw: &str) -> String {
    normalize(raw, false)
}

struct Normalizer {
    out: String,
    pending_space: bool,
    after_combinator: bool,
}

impl Normalizer {
    fn flush(&mut self) {
        if self.pending_space && !self.out.is_empty() && !self.after_combinator {
            self.out.push(' ');
        }
        self.pending_space = false;
        self.after_combinator = false;
    }
}

fn normalize(raw: &str, tighten_combinators: bool) -> String {
    let mut state = Normalizer {
        out: String::with_capacity(raw.len()),
        pending_space: false,
        after_combinator: false,
    };
    let mut depth = 0usize;
    let mut chars = raw.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '/' if raw[index + 1..].starts_with('*') => {
                let body_start = index + 2;
                let end = raw[body_start..]
                    .find("*/")
                    .map_or(raw.len(), |rel| body_start + rel + 2);
                while chars.peek().is_some_and(|(next, _)| *next < end) {
                    chars.next();
                }
                // Outside selectors a comment separates tokens: `screen/**/and`
                // is two words. In a selector `.a/**/.b` is the compound `.a.b`.
                if !tighten_combinators {
                    state.pending_space = true;
                }
            },
            c if c.is_ascii_whitespace() => state.pending_space = true,
            '"' | '\'' => {
                state.flush();
                state.out.push(c);
                while let Some((_, inner)) = chars.next() {
                    state.out.push(inner);
                    if inner == '\\' {
                        if let Some((_, escaped)) = chars.next() {
                            state.out.push(escaped);
                        }
                    } else if inner == c {
                        break;
                    }
                }
            },
            '\\' => {
                state.flush();
                state.out.push('\\');
                let mut hex_digits = 0;
                while hex_digits < 6
                    && let Some((_, hex)) = chars.next_if(|(_, ch)| ch.is_ascii_hexdigit())
                {
                    state.out.push(hex);
                    hex_digits += 1;
                }
                if hex_digits > 0 {
                    if chars.next_if(|(_, ch)| ch.is_ascii_whitespace()).is_some() {
                        state.out.push(' ');
                    }
                } else if let Some((_, escaped)) = chars.next() {
                    state.out.push(escaped);
                }
            },
            '(' | '[' => {
                state.flush();
                state.out.push(c);
                depth += 1;
            },
            ')' | ']' => {
                state.flush();
                state.out.push(c);
                depth = depth.saturating_sub(1);
            },
            '>' | '+' | '~' if tighten_combinators && depth == 0 => {
                state.pending_space = false;
                state.after_combinator = false;
                state.out.push(c);
                state.after_combinator = true;
            },
            _ => {
                state.flush();
                state.out.push(c);
            },
        }
    }

    state.out
}
