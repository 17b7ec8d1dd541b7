//! Grades, operations and the per-grade practice configuration.
//!
//! Every grade exposes a fixed, ordered subset of [`OperationId`]. The order
//! is the unlock order: an operation only opens once its predecessor within
//! the same grade is completed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest and highest grade levels offered.
pub const FIRST_GRADE: u8 = 1;
pub const LAST_GRADE: u8 = 6;

/// School grade, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const ALL: [Grade; 6] = [Grade(1), Grade(2), Grade(3), Grade(4), Grade(5), Grade(6)];

    pub fn new(value: u8) -> Option<Self> {
        (FIRST_GRADE..=LAST_GRADE)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn first() -> Self {
        Self(FIRST_GRADE)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The following grade, or `None` for the last one.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn config(self) -> GradeConfig {
        GradeConfig::for_grade(self)
    }

    pub fn operations(self) -> &'static [OperationId] {
        self.config().operations
    }

    pub fn offers(self, operation: OperationId) -> bool {
        self.operations().contains(&operation)
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value).ok_or_else(|| format!("grade {value} is outside 1-6"))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Practice topics, declared in unlock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationId {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Fractions,
    Decimals,
    Powers,
    Percentages,
}

impl OperationId {
    pub const ALL: [OperationId; 8] = [
        OperationId::Addition,
        OperationId::Subtraction,
        OperationId::Multiplication,
        OperationId::Division,
        OperationId::Fractions,
        OperationId::Decimals,
        OperationId::Powers,
        OperationId::Percentages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationId::Addition => "addition",
            OperationId::Subtraction => "subtraction",
            OperationId::Multiplication => "multiplication",
            OperationId::Division => "division",
            OperationId::Fractions => "fractions",
            OperationId::Decimals => "decimals",
            OperationId::Powers => "powers",
            OperationId::Percentages => "percentages",
        }
    }

    /// Learner-facing name.
    pub fn display_name(self) -> &'static str {
        match self {
            OperationId::Addition => "Suma",
            OperationId::Subtraction => "Resta",
            OperationId::Multiplication => "Multiplicación",
            OperationId::Division => "División",
            OperationId::Fractions => "Fracciones",
            OperationId::Decimals => "Decimales",
            OperationId::Powers => "Potencias",
            OperationId::Percentages => "Porcentajes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Successor of this operation within `grade`'s subset.
    pub fn next_in(self, grade: Grade) -> Option<OperationId> {
        let ops = grade.operations();
        let idx = ops.iter().position(|op| *op == self)?;
        ops.get(idx + 1).copied()
    }

    /// Predecessor of this operation within `grade`'s subset.
    pub fn previous_in(self, grade: Grade) -> Option<OperationId> {
        let ops = grade.operations();
        let idx = ops.iter().position(|op| *op == self)?;
        idx.checked_sub(1).and_then(|prev| ops.get(prev).copied())
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BASIC_OPERATIONS: &[OperationId] = &[
    OperationId::Addition,
    OperationId::Subtraction,
    OperationId::Multiplication,
    OperationId::Division,
];

const FIFTH_GRADE_OPERATIONS: &[OperationId] = &[
    OperationId::Addition,
    OperationId::Subtraction,
    OperationId::Multiplication,
    OperationId::Division,
    OperationId::Fractions,
    OperationId::Decimals,
];

/// Static practice configuration for a grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeConfig {
    pub grade: Grade,
    /// Number of exercises in one session.
    pub exercise_count: usize,
    pub operations: &'static [OperationId],
}

impl GradeConfig {
    pub fn for_grade(grade: Grade) -> Self {
        let (exercise_count, operations) = match grade.get() {
            1 | 2 => (20, BASIC_OPERATIONS),
            3 | 4 => (15, BASIC_OPERATIONS),
            5 => (12, FIFTH_GRADE_OPERATIONS),
            _ => (10, &OperationId::ALL[..]),
        };
        Self {
            grade,
            exercise_count,
            operations,
        }
    }
}
