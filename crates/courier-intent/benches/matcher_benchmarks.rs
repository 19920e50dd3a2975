//! Benchmarks for the deterministic matcher and the model-output parser.
//!
//! The matcher runs on every request before any model call, so its cost is
//! paid even by requests that end up on the language model path.

use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use courier_core::OperationRegistry;
use courier_intent::parse::parse_candidate;
use courier_intent::{DeterministicMatcher, PromptBuilder};

/// Mix of hits and misses, roughly what a photo and repo assistant sees.
fn generate_query(index: usize) -> String {
    match index % 8 {
        0 => "list photos".to_string(),
        1 => format!("search images of beach day {}", index),
        2 => format!("Create album named Trip {}", index),
        3 => "list albums".to_string(),
        4 => "list my repositories".to_string(),
        5 => format!("Star octocat/hello-{}", index),
        6 => format!("send an email to sam about invoice {}", index),
        _ => "do something vague with the thing from yesterday".to_string(),
    }
}

fn bench_matcher(c: &mut Criterion) {
    let registry = OperationRegistry::standard().expect("standard registry");
    let matcher = DeterministicMatcher::new(&registry);
    let queries: Vec<String> = (0..1000).map(generate_query).collect();

    let mut group = c.benchmark_group("matcher");
    group.sample_size(200);
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("mixed_single_query", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let candidate = matcher.match_text(&queries[idx % queries.len()]);
            idx += 1;
            candidate
        });
    });

    // Misses walk every rule.
    group.bench_function("miss", |b| {
        b.iter(|| matcher.match_text("do something vague with the thing from yesterday"));
    });

    group.bench_function("batch_100", |b| {
        b.iter(|| {
            queries[..100]
                .iter()
                .filter_map(|q| matcher.match_text(q))
                .count()
        });
    });

    group.finish();
}

fn bench_prompt_and_parse(c: &mut Criterion) {
    let registry = OperationRegistry::standard().expect("standard registry");
    let prompts = PromptBuilder::new(&registry);
    let fenced = "```json\n{\"operation\": \"Create Repository\", \"name\": \"demo\", \
                  \"scope\": \"private\", \"add_readme\": \"true\"}\n```";

    let mut group = c.benchmark_group("llm_path");
    group.bench_function("build_prompt", |b| {
        b.iter(|| prompts.build("Star octocat/hello"));
    });
    group.bench_function("parse_fenced_output", |b| {
        b.iter(|| parse_candidate(fenced));
    });
    group.finish();
}

criterion_group!(benches, bench_matcher, bench_prompt_and_parse);
criterion_main!(benches);
