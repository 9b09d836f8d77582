#![no_main]

use implicitgen::{CancellationToken, GeneratorConfig, generate_all, parse_manifest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Validated declarations must never make the engine panic
        if let Ok(declarations) = parse_manifest("fuzz.json", s) {
            let config = GeneratorConfig::default().with_tuple_feature(declarations.has_tuple_feature);
            let _ = generate_all(&declarations.types, &config, &CancellationToken::new());
        }
    }
});
