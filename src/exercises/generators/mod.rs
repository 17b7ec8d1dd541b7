//! Per-grade exercise generators.
//!
//! Each operation lives in its own file with one function per grade tier.
//! Dispatch is an exhaustive match on [`OperationId`]; pairs a grade does not
//! offer are filtered out before this module is reached.

mod addition;
mod decimals;
mod fractions;
mod percentages;
mod powers;
mod subtraction;
mod tables;

use super::Exercise;
use crate::curriculum::{Grade, OperationId};
use rand::Rng;

pub(super) fn generate<R: Rng + ?Sized>(
    grade: Grade,
    operation: OperationId,
    rng: &mut R,
) -> Exercise {
    match operation {
        OperationId::Addition => addition::generate(grade, rng),
        OperationId::Subtraction => subtraction::generate(grade, rng),
        OperationId::Multiplication => tables::multiplication(grade, rng),
        OperationId::Division => tables::division(grade, rng),
        OperationId::Fractions => fractions::generate(grade, rng),
        OperationId::Decimals => decimals::generate(grade, rng),
        OperationId::Powers => powers::generate(rng),
        OperationId::Percentages => percentages::generate(rng),
    }
}

/// Uniform pick from a non-empty static pool.
fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, pool: &[T]) -> T {
    pool[rng.gen_range(0..pool.len())]
}
