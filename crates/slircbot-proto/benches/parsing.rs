//! Benchmarks for line framing and message parsing.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slircbot_proto::{LineFramer, ParsedMessage};

/// Simple PING message
const SIMPLE_MESSAGE: &str = "PING :irc.example.com";

/// Message with prefix
const PREFIX_MESSAGE: &str = ":nick!user@host PRIVMSG #channel :Hello, world!";

/// Message with IRCv3 tags
const TAGGED_MESSAGE: &str = "@time=2023-01-01T00:00:00.000Z;msgid=abc123;+example/tag=value :nick!user@host PRIVMSG #channel :Hello with tags!";

/// Numeric response
const NUMERIC_RESPONSE: &str =
    ":irc.server.net 001 nickname :Welcome to the IRC Network nickname!user@host";

fn benchmark_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Message Parsing");

    for (name, line) in [
        ("simple_ping", SIMPLE_MESSAGE),
        ("with_prefix", PREFIX_MESSAGE),
        ("with_tags", TAGGED_MESSAGE),
        ("numeric", NUMERIC_RESPONSE),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let msg: ParsedMessage = black_box(line).parse().unwrap();
                black_box(msg)
            })
        });
    }

    group.finish();
}

fn benchmark_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line Framing");

    let mut stream = Vec::new();
    for _ in 0..64 {
        stream.extend_from_slice(PREFIX_MESSAGE.as_bytes());
        stream.extend_from_slice(b"\r\n");
    }

    for chunk_size in [16usize, 256, 4096] {
        group.bench_with_input(
            BenchmarkId::new("chunked_feed", chunk_size),
            &chunk_size,
            |b, &size| {
                b.iter(|| {
                    let mut framer = LineFramer::new("utf-8").unwrap();
                    let mut count = 0;
                    for chunk in stream.chunks(size) {
                        count += framer.feed(black_box(chunk)).unwrap().len();
                    }
                    black_box(count)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_parsing, benchmark_framing);
criterion_main!(benches);
