use super::pick;
use crate::curriculum::Grade;
use crate::exercises::{format_number, Exercise, Operator, Problem};
use rand::Rng;

/// `(numerator, denominator, target_denominator)` for equivalence drills.
const EQUIVALENCES: &[(u32, u32, u32)] = &[
    (1, 2, 10),
    (1, 4, 100),
    (3, 4, 100),
    (1, 5, 10),
    (2, 5, 10),
    (3, 5, 10),
    (4, 5, 10),
    (1, 10, 100),
    (7, 10, 100),
    (9, 10, 100),
];

const FIFTH_GRADE_PORTIONS: &[(u32, u32)] = &[
    (1, 2),
    (1, 4),
    (3, 4),
    (1, 5),
    (2, 5),
    (1, 3),
    (2, 3),
    (1, 8),
    (3, 8),
    (3, 10),
];

const SIXTH_GRADE_PORTIONS: &[(u32, u32)] = &[(1, 2), (1, 4), (3, 4), (1, 5), (2, 5)];

pub(super) fn generate<R: Rng + ?Sized>(grade: Grade, rng: &mut R) -> Exercise {
    match (grade.get(), rng.gen_bool(0.5)) {
        (6, true) => same_denominator(rng),
        (6, false) => portion_of_quantity(rng, SIXTH_GRADE_PORTIONS, sixth_grade_quantities),
        (_, true) => equivalence(rng),
        (_, false) => portion_of_quantity(rng, FIFTH_GRADE_PORTIONS, fifth_grade_quantities),
    }
}

fn sixth_grade_quantities(_denominator: u32) -> &'static [u32] {
    &[20, 40, 50, 100, 200]
}

fn fifth_grade_quantities(denominator: u32) -> &'static [u32] {
    match denominator {
        3 => &[12, 30, 60, 90],
        8 => &[16, 24, 40, 80],
        _ => &[10, 20, 25, 50, 100],
    }
}

fn equivalence<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    let (numerator, denominator, target_denominator) = pick(rng, EQUIVALENCES);
    let factor = target_denominator / denominator;
    Exercise::with_hint(
        Problem::FractionEquivalence {
            numerator,
            denominator,
            target_denominator,
        },
        format!(
            "Multiplica numerador y denominador por el mismo número: {numerator} × {factor} = {} y {denominator} × {factor} = {target_denominator}",
            numerator * factor
        ),
    )
}

fn portion_of_quantity<R, F>(rng: &mut R, portions: &[(u32, u32)], quantities: F) -> Exercise
where
    R: Rng + ?Sized,
    F: Fn(u32) -> &'static [u32],
{
    let (numerator, denominator) = pick(rng, portions);
    let quantity = pick(rng, quantities(denominator));
    let problem = Problem::FractionOfQuantity {
        numerator,
        denominator,
        quantity,
    };
    let unit = f64::from(quantity) / f64::from(denominator);
    Exercise::with_hint(
        problem,
        format!(
            "Divide {quantity} entre {denominator} para obtener 1/{denominator} y multiplica por {numerator}: {} × {numerator} = {}",
            format_number(unit),
            format_number(problem.answer())
        ),
    )
}

fn same_denominator<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    let denominator: u32 = pick(rng, &[2, 4, 5, 10]);
    let a: u32 = rng.gen_range(1..denominator);
    let b: u32 = rng.gen_range(1..denominator);
    if rng.gen_bool(0.7) {
        Exercise::with_hint(
            Problem::SameDenominator {
                operator: Operator::Add,
                left: a,
                right: b,
                denominator,
            },
            format!(
                "Con el mismo denominador solo suma los numeradores: {a} + {b} = {}",
                a + b
            ),
        )
    } else {
        let (left, right) = (a.max(b), a.min(b));
        Exercise::with_hint(
            Problem::SameDenominator {
                operator: Operator::Subtract,
                left,
                right,
                denominator,
            },
            format!(
                "Con el mismo denominador solo resta los numeradores: {left} - {right} = {}",
                left - right
            ),
        )
    }
}
