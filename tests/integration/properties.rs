use mathlearn::exercises::{check_answer, generate_session_with_rng, Operator};
use mathlearn::progress::HISTORY_LIMIT;
use mathlearn::{calculate_stars, Grade, MemoryStore, OperationId, ProgressStore};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_grade() -> impl Strategy<Value = Grade> {
    (1u8..=6).prop_map(|n| Grade::new(n).unwrap())
}

fn arb_offered_pair() -> impl Strategy<Value = (Grade, OperationId)> {
    arb_grade().prop_flat_map(|grade| {
        let ops = grade.operations();
        (Just(grade), (0..ops.len()).prop_map(move |i| ops[i]))
    })
}

proptest! {
    #[test]
    fn stars_are_monotonic_in_accuracy(total in 1u32..200, a in 0u32..200, b in 0u32..200) {
        let (lo, hi) = (a.min(b).min(total), a.max(b).min(total));
        prop_assert!(calculate_stars(lo, total) <= calculate_stars(hi, total));
        prop_assert_eq!(calculate_stars(total, total), 3);
    }

    #[test]
    fn empty_sessions_earn_nothing(correct in 0u32..1000) {
        prop_assert_eq!(calculate_stars(correct, 0), 0);
    }

    #[test]
    fn sessions_have_configured_length_and_unique_triples(
        (grade, op) in arb_offered_pair(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let batch = generate_session_with_rng(grade, op, &mut rng);
        prop_assert_eq!(batch.exercises.len(), grade.config().exercise_count);
        for (i, a) in batch.exercises.iter().enumerate() {
            prop_assert!(!a.hint.trim().is_empty());
            prop_assert!(check_answer(a, &a.correct_answer.to_string()));
            for b in &batch.exercises[i + 1..] {
                prop_assert!(!a.same_triple(b));
            }
            if a.operator == Operator::Divide {
                prop_assert_eq!(a.operand1, a.operand2 * a.correct_answer);
            }
        }
    }

    #[test]
    fn store_invariants_hold_for_any_update_sequence(
        updates in proptest::collection::vec((0u8..6, 0u32..30, 0u32..30), 1..25),
    ) {
        let mut store = ProgressStore::open(MemoryStore::new());
        let g = Grade::first();
        let mut best = 0;
        for (stars, correct, total) in updates {
            store.update_operation(g, OperationId::Addition, stars > 0, stars, correct, total);
            best = best.max(stars.min(3));
            let op = store.operation(g, OperationId::Addition);
            prop_assert_eq!(op.stars, best);
            prop_assert!(op.correct_count <= op.total_count);
            prop_assert!(op.history.len() <= HISTORY_LIMIT);
            prop_assert!(!op.completed || op.stars >= 1);
        }
    }
}
