use super::IntegrationHarness;
use mathlearn::engine::ProgressionEngine;
use mathlearn::exercises::generate_session_with_rng;
use mathlearn::session::{AnswerOutcome, PracticeSession};
use mathlearn::{Grade, OperationId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

fn grade(n: u8) -> Grade {
    Grade::new(n).unwrap()
}

#[test]
fn first_grade_addition_pass_unlocks_subtraction() {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    let report = ProgressionEngine::new(&mut store).update_progress(
        grade(1),
        OperationId::Addition,
        18,
        20,
    );

    assert_eq!(report.stars, 2);
    assert!(report.passed);
    assert_eq!(report.precision.text, "18/20 intentos (90%)");
    assert!(store.is_operation_completed(grade(1), OperationId::Addition));
    assert!(store.is_operation_unlocked(grade(1), OperationId::Subtraction));
    assert!(!store.is_operation_unlocked(grade(1), OperationId::Multiplication));
    assert!(store.is_grade_unlocked(grade(2)));
}

#[test]
fn second_grade_failure_leaves_unlocks_alone() {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    store.unlock_grade(grade(2));
    let before = store.document().clone();

    let report = ProgressionEngine::new(&mut store).update_progress(
        grade(2),
        OperationId::Addition,
        10,
        15,
    );

    assert_eq!(report.stars, 0);
    assert!(!report.passed);
    assert!(!store.is_operation_completed(grade(2), OperationId::Addition));
    assert!(!store.is_operation_unlocked(grade(2), OperationId::Subtraction));
    assert!(!store.is_grade_unlocked(grade(3)));
    for g in Grade::ALL {
        for op in g.operations() {
            assert_eq!(
                store.is_operation_unlocked(g, *op),
                before.operation(g, *op).unwrap().unlocked
            );
        }
    }
    assert_eq!(
        store.operation_precision(grade(2), OperationId::Addition).percent,
        67
    );
}

#[test]
fn repeating_an_update_keeps_stars_and_appends_history() {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    let g = grade(1);
    store.update_operation(g, OperationId::Addition, true, 2, 18, 20);
    let after_first = store.operation(g, OperationId::Addition);
    store.update_operation(g, OperationId::Addition, true, 2, 18, 20);
    let after_second = store.operation(g, OperationId::Addition);

    assert_eq!(after_first.stars, after_second.stars);
    assert_eq!(after_first.completed, after_second.completed);
    assert_eq!(after_second.history.len(), 2);
}

#[test]
fn stars_never_decrease_across_sessions() {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    let mut engine = ProgressionEngine::new(&mut store);
    let mut best = 0;
    for correct in [16, 20, 12, 18, 0] {
        let report = engine.update_progress(grade(1), OperationId::Addition, correct, 20);
        best = best.max(report.stars);
        assert_eq!(
            engine.store().operation_stars(grade(1), OperationId::Addition),
            best
        );
    }
    assert_eq!(best, 3);
}

#[test]
fn played_session_feeds_the_engine() {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut session =
        PracticeSession::start_with_rng(grade(1), OperationId::Addition, &mut rng).unwrap();

    let mut answered = 0;
    while let Some(exercise) = session.current().cloned() {
        let token = session.start_timer(Duration::from_secs(30));
        // miss two exercises, one by timeout
        let outcome = match answered {
            0 => {
                assert!(session.expire(token));
                answered += 1;
                continue;
            }
            1 => session.submit(&(exercise.correct_answer + 1.0).to_string()),
            _ => session.submit(&exercise.correct_answer.to_string()),
        };
        assert_ne!(outcome, AnswerOutcome::Rejected);
        assert!(!session.expire(token));
        session.advance();
        answered += 1;
    }

    let result = session.finish();
    assert_eq!(result.total, 20);
    assert_eq!(result.correct, 18);

    let report = ProgressionEngine::new(&mut store).record_session(
        grade(1),
        OperationId::Addition,
        result,
    );
    assert_eq!(report.stars, 2);
    assert!(store.is_operation_unlocked(grade(1), OperationId::Subtraction));
}

#[test]
fn completing_a_grade_reports_grade_stars_and_summary() {
    let harness = IntegrationHarness::new();
    let mut store = harness.open_store();
    let mut engine = ProgressionEngine::new(&mut store);
    let mut last = None;
    for op in grade(1).operations() {
        last = Some(engine.update_progress(grade(1), *op, 20, 20));
    }
    let last = last.unwrap();
    assert!(last.unlocks.grade_completed);
    assert!(last
        .achievements
        .iter()
        .any(|a| a.id == "grade_1_completed"));
    assert!(last.recommendations.iter().any(|r| r.contains("2° grado")));

    let summary = engine.summary();
    assert_eq!(summary.completed_operations, 4);
    assert_eq!(summary.total_stars, 12);
    assert_eq!(summary.total_exercises, 80);
    assert!(engine.store().is_grade_completed(grade(1)));
    assert_eq!(engine.store().grade(grade(1)).stars, 3);
}

#[test]
fn sixth_grade_sessions_fill_without_duplicates() {
    let mut rng = StdRng::seed_from_u64(77);
    for op in grade(6).operations() {
        let batch = generate_session_with_rng(grade(6), *op, &mut rng);
        assert_eq!(batch.exercises.len(), 10, "{op}");
        for (i, a) in batch.exercises.iter().enumerate() {
            for b in &batch.exercises[i + 1..] {
                assert!(!a.same_triple(b), "{op}: {}", a.display_text);
            }
        }
    }
}
