// Run locally (from the repo root):
//   cargo +nightly fuzz run fuzz_syntax_parse -- -runs=1000
#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };
    // Lossless: every byte of the input is in the tree, errors or not.
    let parse = lathe_syntax::parse(text);
    assert_eq!(parse.syntax().to_string(), text);
});
