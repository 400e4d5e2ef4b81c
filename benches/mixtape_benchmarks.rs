//! # Mixtape Performance Benchmarks
//!
//! Benchmarks for the shortlist pipeline on catalog-page sized inputs.
//!
//! ## Benchmark Categories
//!
//! - **Scoring**: per-track quality and relevance, diversity against a pool
//! - **Ranking**: two-pass ranking and the tolerant sort
//! - **Selection**: validation, dedup and the full `select_tracks` path
//! - **Presentation**: title cleaning and colour derivation
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run a specific benchmark group
//! cargo bench scoring
//! cargo bench selection
//! ```

use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use mixtape::algorithm::{self, ScoringContext};
use mixtape::config::SelectionConfig;
use mixtape::track::RawTrack;
use mixtape::{pipeline, present, ranking, validate};
use std::hint::black_box;

const GENRES: &[&str] = &["Jazz", "Bossa Nova", "Soul", "Blues", "Hard Bop"];

/// Helper function to build a realistic catalog page.
///
/// Every tenth record is a duplicate of its predecessor and every
/// fourteenth lacks a preview.
fn create_test_tracks(count: usize) -> Vec<RawTrack> {
    (1..=count)
        .map(|i| {
            let title_index = if i % 10 == 0 { i - 1 } else { i };
            RawTrack {
                album: Some(format!("Album {}", (i - 1) / 8 + 1)),
                genre: Some(GENRES[i % GENRES.len()].to_string()),
                duration_ms: Some(120_000 + (i as u64 % 40) * 7_500),
                release_date: Some(format!("{}-05-01T07:00:00Z", 1955 + i % 70)),
                artwork_url_100: Some(format!("https://example.com/art/{i}.jpg")),
                preview_url: (i % 14 != 0).then(|| format!("https://example.com/preview/{i}.m4a")),
                track_number: Some((i % 12) as i64 + 1),
                ..RawTrack::new(
                    i as u64,
                    &format!("Smooth Jazz Standard {title_index:03}"),
                    &format!("Artist {}", (title_index - 1) / 5 + 1),
                )
            }
        })
        .collect()
}

fn bench_context() -> ScoringContext {
    ScoringContext::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(), true)
}

/// Benchmark per-track scoring
fn benchmark_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let context = bench_context();
    let tracks = create_test_tracks(50);
    let track = tracks[0].clone();

    group.bench_function("quality_score", |b| {
        b.iter(|| algorithm::quality_score(black_box(&track), black_box(&context)))
    });

    group.bench_function("relevance_score", |b| {
        b.iter(|| algorithm::relevance_score(black_box(&track), black_box("smooth jazz standards")))
    });

    let pool = ranking::rank(validate::deduplicate(&tracks), "jazz", &context);
    group.bench_function("diversity_score_vs_pool", |b| {
        b.iter(|| algorithm::diversity_score(black_box(&track), black_box(&pool), black_box(&pool)))
    });

    group.finish();
}

/// Benchmark two-pass ranking at different page sizes
fn benchmark_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");
    let context = bench_context();

    for size in [25, 50, 200].iter() {
        let valid = validate::deduplicate(&create_test_tracks(*size));
        group.bench_with_input(BenchmarkId::new("rank", size), &valid, |b, valid| {
            b.iter_batched(
                || valid.clone(),
                |tracks| ranking::rank(black_box(tracks), black_box("smooth jazz"), black_box(&context)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark validation and the full selection path
fn benchmark_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    let tracks = create_test_tracks(50);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    group.bench_function("deduplicate_50", |b| {
        b.iter(|| validate::deduplicate(black_box(&tracks)))
    });

    let diverse = SelectionConfig::default();
    group.bench_function("select_tracks_diverse_50", |b| {
        b.iter(|| pipeline::select_tracks_at(black_box(&tracks), "smooth jazz", &diverse, now))
    });

    let top_n = SelectionConfig {
        ensure_genre_diversity: false,
        ..SelectionConfig::default()
    };
    group.bench_function("select_tracks_top_n_50", |b| {
        b.iter(|| pipeline::select_tracks_at(black_box(&tracks), "smooth jazz", &top_n, now))
    });

    group.finish();
}

/// Benchmark display record construction
fn benchmark_presentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("presentation");

    group.bench_function("clean_title", |b| {
        b.iter(|| present::clean_title(black_box("Sultry Autumn Leaves - Background Music for Cooking")))
    });

    group.bench_function("string_to_color", |b| {
        b.iter(|| present::string_to_color(black_box("JazzMiles Davisv2"), false))
    });

    group.finish();
}

// Group all benchmarks
criterion_group!(
    benches,
    benchmark_scoring,
    benchmark_ranking,
    benchmark_selection,
    benchmark_presentation
);

criterion_main!(benches);
