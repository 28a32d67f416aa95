use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizline_core::fingerprint::digest;
use quizline_core::parser::parse_question_bank_str;

fn make_bank(n: usize, malformed_every: usize) -> String {
    let entries: Vec<String> = (0..n)
        .map(|i| {
            if malformed_every > 0 && i % malformed_every == 0 {
                format!(r#"{{"subject":"Physics","question":"Broken {i}","options":["A","B"]}}"#)
            } else {
                format!(
                    r#"{{"subject":"Physics","question":"Question {i}","answer":"C","options":["A","B","C","D"],"explanation":"Because {i}."}}"#
                )
            }
        })
        .collect();
    format!("[{}]", entries.join(","))
}

fn bench_parse_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_question_bank");

    let clean = make_bank(500, 0);
    group.bench_function("clean_500", |b| {
        b.iter(|| parse_question_bank_str(black_box(&clean)))
    });

    let noisy = make_bank(500, 5);
    group.bench_function("noisy_500", |b| {
        b.iter(|| parse_question_bank_str(black_box(&noisy)))
    });

    group.finish();
}

fn bench_digest(c: &mut Criterion) {
    let bank = parse_question_bank_str(&make_bank(100, 0)).unwrap();

    c.bench_function("digest_100", |b| {
        b.iter(|| {
            bank.questions
                .iter()
                .map(|q| digest(black_box(q)))
                .count()
        })
    });
}

criterion_group!(benches, bench_parse_bank, bench_digest);
criterion_main!(benches);
