#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use loadmap::config::ConfigLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let loader = ConfigLoader::with_defaults();

        // Only panics matter here
        let _ = loader.load_from_str(text, Path::new("fuzz.js"));
    }
});
