#![no_main]

use implicitgen::ingest::resolve::Resolver;
use implicitgen::ingest::type_expr::parse_type_expr;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything that parses must also resolve or fail cleanly
        if let Ok(expr) = parse_type_expr(s) {
            let _ = Resolver::default().resolve(&expr, &["T".to_string()]);
        }
    }
});
