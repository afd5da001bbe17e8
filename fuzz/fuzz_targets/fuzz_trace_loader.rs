#![no_main]

use libfuzzer_sys::fuzz_target;
use tracephase::subject::TraceSubject;
use tracephase::trace::{TraceFormat, TraceLoader};

fuzz_target!(|data: &[u8]| {
    let loader = TraceLoader::default();
    for format in [TraceFormat::Json, TraceFormat::Yaml] {
        // Any trace that decodes must be checkable without panicking
        if let Ok(trace) = loader.parse(data, format, "<fuzz>") {
            let _ = TraceSubject::assert_that(&trace)
                .hides_app_window("a")
                .then()
                .shows_app_window_on_top("a")
                .for_all_entries();
            let _ = TraceSubject::assert_that(&trace)
                .shows_ime_window("b")
                .at_the_end();
        }
    }
});
