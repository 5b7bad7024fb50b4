//! Fuzz target for JUnit XML extraction.
//!
//! Feeds arbitrary text to `parse_report_str` looking for panics and hangs.
//! Any record produced must carry the given file name.

#![no_main]
use libfuzzer_sys::fuzz_target;

use faildup_junit::parse_report_str;

const MAX_INPUT_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(records) = parse_report_str(xml, "fuzz.xml") {
        for record in records {
            assert_eq!(record.file_name, "fuzz.xml");
            assert_eq!(record.message, record.message.trim());
        }
    }
});
