//! This module provides the core token types produced by the CSS lexer and
//! consumed by the parser.

mod css_token;
mod css_token_kind;

pub use css_token::CssToken;
pub use css_token_kind::CssTokenKind;

#[cfg(test)]
mod tests;
