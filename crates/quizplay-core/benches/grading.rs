use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizplay_core::dragdrop::DragDropStore;
use quizplay_core::grader::grade;
use quizplay_core::model::{AnswerValue, Question, QuestionType, Quiz};

fn make_quiz(n: usize) -> Quiz {
    let questions = (0..n)
        .map(|id| {
            let (kind, correct) = match id % 3 {
                0 => (QuestionType::TrueFalse, AnswerValue::scalar("true")),
                1 => (QuestionType::MultipleChoice, AnswerValue::scalar("b")),
                _ => (
                    QuestionType::DragDropOrdering,
                    AnswerValue::list(["a", "b", "c", "d"]),
                ),
            };
            Question {
                id,
                prompt: format!("Question {id}"),
                kind,
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: correct,
                descriptions: None,
                code_template: None,
                explanation: None,
                references: vec![],
            }
        })
        .collect();
    Quiz::new(questions)
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for n in [10usize, 200] {
        let quiz = make_quiz(n);
        let answers: HashMap<usize, AnswerValue> = quiz
            .questions
            .iter()
            .map(|q| (q.id, q.correct_answer.clone()))
            .collect();
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| grade(black_box(&quiz), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_drag_sequence(c: &mut Criterion) {
    let quiz = make_quiz(3);
    let items = ["a", "b", "c", "d"];

    c.bench_function("drag_sequence_100_moves", |b| {
        b.iter(|| {
            let mut store = DragDropStore::for_quiz(&quiz);
            for step in 0..100usize {
                let slot = step % 4;
                if step % 7 == 0 {
                    let _ = store.remove_from_slot(2, slot);
                } else {
                    let _ = store.place_item(2, slot, items[(step * 3) % 4]);
                }
            }
            black_box(store.snapshot(2))
        })
    });
}

criterion_group!(benches, bench_grade, bench_drag_sequence);
criterion_main!(benches);
