use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use phonodrill_core::curriculum::{Curriculum, Level, Word};
use phonodrill_core::progress::ProgressRecord;
use phonodrill_core::recommend::{adaptive_next, recommend_next};
use uuid::Uuid;

fn make_curriculum(levels: usize, words_per_level: usize) -> Curriculum {
    Curriculum {
        id: "bench".into(),
        name: "Bench".into(),
        description: String::new(),
        levels: (0..levels)
            .map(|l| Level {
                name: format!("level{l}"),
                ordinal: l as u32,
                words: (0..words_per_level)
                    .map(|w| Word::new(&format!("word{l}x{w}")))
                    .collect(),
            })
            .collect(),
    }
}

fn make_progress(
    curriculum: &Curriculum,
    attempted_ratio: f64,
) -> HashMap<String, ProgressRecord> {
    let mut progress = HashMap::new();
    for level in &curriculum.levels {
        let attempted = (level.words.len() as f64 * attempted_ratio) as usize;
        for (i, word) in level.words.iter().take(attempted).enumerate() {
            let score = 50.0 + (i % 50) as f64;
            progress.insert(
                word.id.clone(),
                ProgressRecord {
                    user_id: Uuid::nil(),
                    word_id: word.id.clone(),
                    score,
                    attempts: 3,
                    mastered: score >= 80.0,
                    moving_avg_score: score,
                    streak_score: 1,
                    penalty_score: 0.5,
                    total_time: 9.0,
                    last_attempt_at: None,
                },
            );
        }
    }
    progress
}

fn bench_recommend_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend_next");

    for (levels, words) in [(5usize, 20usize), (20, 100)] {
        let curriculum = make_curriculum(levels, words);
        let progress = make_progress(&curriculum, 0.6);

        group.bench_function(format!("{levels}x{words}"), |b| {
            b.iter(|| {
                recommend_next(
                    black_box(&curriculum),
                    black_box(&progress),
                    black_box(80.0),
                )
            })
        });
    }

    group.finish();
}

fn bench_adaptive_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("adaptive_next");

    let curriculum = make_curriculum(1, 500);
    let progress = make_progress(&curriculum, 0.8);
    let level = &curriculum.levels[0];

    group.bench_function("500_words", |b| {
        b.iter(|| adaptive_next(black_box(level), black_box(&progress)))
    });

    group.finish();
}

criterion_group!(benches, bench_recommend_next, bench_adaptive_next);
criterion_main!(benches);
