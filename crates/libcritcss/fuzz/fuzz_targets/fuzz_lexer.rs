#![no_main]

use libfuzzer_sys::fuzz_target;
use libcritcss::token_source::StrCssTokenSource;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let token_source = StrCssTokenSource::new(s);
    for _ in token_source {}
});
