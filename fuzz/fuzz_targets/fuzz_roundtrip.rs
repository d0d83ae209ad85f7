#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse → render → parse must not panic at any step.
        if let Ok(envelope) = cxml::CXml::parse(s) {
            if let Ok(xml2) = envelope.render() {
                let _ = cxml::CXml::parse(&xml2);
            }
        }
    }
});
