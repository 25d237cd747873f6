#![no_main]

use libfuzzer_sys::fuzz_target;
use majority_rules_client::protocol::{ErrorBody, RoundSnapshot};
use majority_rules_client::sync::synchronize;

fuzz_target!(|data: &[u8]| {
    // Any state payload that decodes must map to a view without panicking.
    if let Ok(snapshot) = serde_json::from_slice::<RoundSnapshot>(data) {
        let view = synchronize(&snapshot);
        let _ = view.headline();
    }

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = ErrorBody::message_from(s);
    }
});
