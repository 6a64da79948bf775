//! Token source trait and implementations.

mod css_token_source;
mod str_to_css_token_source;

pub use css_token_source::CssTokenSource;
pub use str_to_css_token_source::StrCssTokenSource;
