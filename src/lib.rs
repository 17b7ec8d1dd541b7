pub mod curriculum;
pub mod engine;
pub mod exercises;
pub mod progress;
pub mod session;
pub mod settings;
pub mod storage;

// Re-export commonly used types for convenience.
pub use curriculum::{Grade, GradeConfig, OperationId};
pub use engine::{calculate_stars, ProgressSummary, ProgressionEngine, SessionReport};
pub use exercises::{check_answer, generate_session, Exercise, Operator};
pub use progress::{ProgressDocument, ProgressStore, UpdateOutcome};
pub use session::{AnswerOutcome, PracticeSession, SessionResult, TimerToken};
pub use settings::{AppConfig, GradeUnlockPolicy};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
