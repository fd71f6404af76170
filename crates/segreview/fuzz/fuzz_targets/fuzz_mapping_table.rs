//! Fuzz target for mapping table resolution.
//!
//! Arbitrary table bytes either resolve or fail with a mapping error; they
//! never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use segreview::{CaseResolver, DiagnosticTrail};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(dir) = tempfile::TempDir::new() {
        if std::fs::write(dir.path().join("a.nii"), b"").is_err() {
            return;
        }
        if std::fs::write(dir.path().join("mapping.csv"), data).is_ok() {
            let _ = CaseResolver::new().resolve(dir.path(), &DiagnosticTrail::disabled());
        }
    }
});
