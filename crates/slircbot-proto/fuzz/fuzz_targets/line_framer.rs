//! Fuzz target for line framing
//!
//! Splits the input at a fuzzer-chosen point and checks that feeding the two
//! halves yields the same lines as feeding the whole buffer at once.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slircbot_proto::LineFramer;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let split = data[0] as usize % data.len();
    let body = &data[1..];
    let split = split.min(body.len());

    let mut whole = LineFramer::new("utf-8").expect("utf-8 is known");
    let Ok(expected) = whole.feed(body) else {
        return;
    };

    let mut halves = LineFramer::new("utf-8").expect("utf-8 is known");
    let mut got = match halves.feed(&body[..split]) {
        Ok(lines) => lines,
        Err(_) => return,
    };
    match halves.feed(&body[split..]) {
        Ok(lines) => got.extend(lines),
        Err(_) => return,
    }
    assert_eq!(got, expected);
});
