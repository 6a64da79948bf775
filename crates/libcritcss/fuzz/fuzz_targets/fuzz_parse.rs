#![no_main]

use libfuzzer_sys::fuzz_target;
use libcritcss::StyleAst;

fuzz_target!(|data: &[u8]| {
    let Ok(ast) = StyleAst::parse_bytes(data) else {
        return;
    };
    // Unmodified trees must serialize back to their input.
    assert_eq!(ast.to_css(), ast.css());
});
