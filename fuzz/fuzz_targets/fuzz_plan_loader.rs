#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use tracephase::plan::PlanLoader;
use tracephase::trace::Trace;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        // A plan that loads must apply cleanly to an empty trace
        if let Ok(loaded) = PlanLoader::default().load_str(yaml, Path::new("fuzz.yaml")) {
            if let Ok(trace) = Trace::new(Vec::new()) {
                let _ = loaded.plan.apply(&trace);
            }
        }
    }
});
