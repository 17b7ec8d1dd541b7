use crate::curriculum::{Grade, OperationId};
use crate::progress::{Achievement, ProgressStore, MAX_STARS};
use crate::storage::KeyValueStore;

/// Exercise totals that earn a milestone.
const EXERCISE_MILESTONES: [u64; 2] = [100, 500];

/// Records whatever this session earned and returns the new entries.
pub(super) fn award<S: KeyValueStore>(
    store: &mut ProgressStore<S>,
    grade: Grade,
    operation: OperationId,
    stars: u8,
    grade_completed: bool,
) -> Vec<Achievement> {
    let mut candidates = Vec::new();
    if stars > 0 {
        candidates.push((
            "first_pass".to_string(),
            "¡Aprobaste tu primer nivel!".to_string(),
        ));
    }
    if stars >= MAX_STARS {
        candidates.push((
            format!("perfect_{}_{}", grade, operation),
            format!(
                "Puntuación perfecta en {} de {}° grado",
                operation.display_name(),
                grade
            ),
        ));
    }
    if grade_completed {
        candidates.push((
            format!("grade_{grade}_completed"),
            format!("Completaste {grade}° grado"),
        ));
    }
    let total = store.document().total_exercises;
    for milestone in EXERCISE_MILESTONES {
        if total >= milestone {
            candidates.push((
                format!("exercises_{milestone}"),
                format!("{milestone} ejercicios resueltos"),
            ));
        }
    }

    let mut earned = Vec::new();
    for (id, description) in candidates {
        if store.record_achievement(&id, &description) {
            if let Some(entry) = store.document().achievements.last() {
                earned.push(entry.clone());
            }
        }
    }
    earned
}
