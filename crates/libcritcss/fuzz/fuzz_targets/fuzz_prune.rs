#![no_main]

use indexmap::IndexSet;
use libfuzzer_sys::fuzz_target;
use libcritcss::StyleAst;

fuzz_target!(|data: &[u8]| {
    let Ok(ast) = StyleAst::parse_bytes(data) else {
        return;
    };

    // Treat every other selector in the input as critical.
    let critical: IndexSet<String> = ast.selectors().into_iter().step_by(2).collect();
    let pruned = ast.pruned(&critical);
    let css = pruned.to_css();
    let _ = StyleAst::parse(&css).map(|reparsed| reparsed.pruned(&critical).to_css());
});
