#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    if let Err(err) = canon_config::CanonConfig::load_from_str(text) {
        // Errors are rendered into logs; they must never echo the input back.
        let _ = err.to_string();
    }
});
