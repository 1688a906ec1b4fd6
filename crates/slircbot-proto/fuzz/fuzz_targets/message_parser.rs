//! Fuzz target for IRC message parsing
//!
//! Feeds arbitrary UTF-8 lines to the parser. Parsing must never panic, and
//! anything it accepts must survive a Display/parse round trip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slircbot_proto::ParsedMessage;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > 8191 {
            return;
        }

        if let Ok(msg) = input.parse::<ParsedMessage>() {
            let rendered = msg.to_string();
            let reparsed = rendered
                .parse::<ParsedMessage>()
                .expect("rendered message must parse");
            assert_eq!(reparsed.command(), msg.command());
            assert_eq!(reparsed.params(), msg.params());
        }
    }
});
