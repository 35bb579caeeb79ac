#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use loadmap::config::script;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let code = script::strip_comments(text);
        assert_eq!(code.matches('\n').count(), text.matches('\n').count());

        if let Ok(calls) = script::extract_config_calls(&code, Path::new("fuzz.js")) {
            for call in calls {
                let _ = script::normalize_call(call);
            }
        }
    }
});
