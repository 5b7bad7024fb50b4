//! Fuzz target for TOML configuration parsing.
//!
//! Tests `TomlConfig::parse()` with arbitrary input to find panics, hangs, or
//! excessive memory usage in the TOML deserializer.

#![no_main]
use libfuzzer_sys::fuzz_target;
use faildup_settings::TomlConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = TomlConfig::parse(s);
    }
});
