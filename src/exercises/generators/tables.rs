//! Multiplication tables and their inverse divisions.

use crate::curriculum::Grade;
use crate::exercises::{Exercise, Operator, Problem};
use rand::Rng;

/// Highest table drilled in each grade; every grade uses factors 0-12.
fn max_table(grade: Grade) -> u32 {
    u32::from(grade.get()) * 2
}

const MAX_FACTOR: u32 = 12;

pub(super) fn multiplication<R: Rng + ?Sized>(grade: Grade, rng: &mut R) -> Exercise {
    let table: u32 = rng.gen_range(1..=max_table(grade));
    let factor: u32 = rng.gen_range(0..=MAX_FACTOR);
    Exercise::new(
        Problem::Binary {
            operator: Operator::Multiply,
            left: f64::from(table),
            right: f64::from(factor),
        },
        multiplication_hint(grade, table, factor),
    )
}

pub(super) fn division<R: Rng + ?Sized>(grade: Grade, rng: &mut R) -> Exercise {
    let divisor: u32 = rng.gen_range(1..=max_table(grade));
    let quotient: u32 = rng.gen_range(0..=MAX_FACTOR);
    let dividend = divisor * quotient;
    Exercise::new(
        Problem::Binary {
            operator: Operator::Divide,
            left: f64::from(dividend),
            right: f64::from(divisor),
        },
        division_hint(grade, divisor, quotient),
    )
}

fn multiplication_hint(grade: Grade, table: u32, factor: u32) -> Option<String> {
    let g = grade.get();
    if g == 1 {
        return Some(if table == 1 {
            "Cualquier número multiplicado por 1 es el mismo número.".into()
        } else {
            "Piensa en la tabla del 2: 2, 4, 6, 8...".into()
        });
    }
    if factor == 0 {
        return Some("Cualquier número multiplicado por 0 siempre es 0.".into());
    }
    if factor == 1 {
        return Some("Cualquier número multiplicado por 1 es el mismo número.".into());
    }
    let hint = match (g, table) {
        (2, 2..=4) => format!(
            "Piensa en la tabla del {table}: {table}, {}, {}, {}...",
            table * 2,
            table * 3,
            table * 4
        ),
        (2, _) => return None,
        (3, 5) => "Las multiplicaciones por 5 terminan en 0 o 5: en 0 si el otro número es par, en 5 si es impar.".into(),
        (3, _) => format!(
            "Recuerda la tabla del {table}: {table}, {}, {}...",
            table * 2,
            table * 3
        ),
        (_, 5) => format!(
            "Para multiplicar por 5, multiplica por 10 y divide entre 2: {factor} × 10 ÷ 2 = {}",
            table * factor
        ),
        (4, 8) => "Para multiplicar por 8, multiplica por 2 tres veces seguidas.".into(),
        (4, 4) => "Para multiplicar por 4, multiplica por 2 dos veces.".into(),
        (5 | 6, 9) => format!(
            "Para multiplicar por 9, multiplica por 10 y resta el número: {} - {factor} = {}",
            factor * 10,
            table * factor
        ),
        (5, 10) => format!("Para multiplicar por 10, agrega un 0 al final: {factor}0"),
        (6, 11) if factor <= 9 => {
            format!("Para multiplicar 11 por un dígito, repite el dígito: 11 × {factor} = {factor}{factor}")
        }
        (6, 12) => format!(
            "Multiplica por 10 y suma el doble: {} + {} = {}",
            factor * 10,
            factor * 2,
            table * factor
        ),
        _ => format!(
            "Descompón: {table} × {factor} = {table} × {} × 2 cuando el segundo factor es par, o suma una vez más {table} si es impar.",
            factor / 2
        ),
    };
    Some(hint)
}

fn division_hint(grade: Grade, divisor: u32, quotient: u32) -> Option<String> {
    let g = grade.get();
    let dividend = divisor * quotient;
    let inverse_table = || {
        format!(
            "Piensa en la tabla del {divisor} al revés. ¿Qué número multiplicado por {divisor} da {dividend}?"
        )
    };
    if divisor == 1 {
        return Some("Cualquier número dividido entre 1 es el mismo número.".into());
    }
    if g == 1 {
        return Some(inverse_table());
    }
    if quotient == 0 {
        return Some("0 dividido entre cualquier número siempre es 0.".into());
    }
    let hint = match (g, divisor) {
        (2, _) => inverse_table(),
        (3, 2) => format!("{dividend} es par, así que puedes partirlo en dos mitades iguales."),
        (_, 5) => "Para dividir entre 5, multiplica por 2 y luego divide entre 10.".into(),
        (_, 10) => "Para dividir entre 10, quita el último cero.".into(),
        (5, 9) => "Recuerda la tabla del 9: 9, 18, 27, 36, 45, 54, 63, 72, 81, 90, 99, 108...".into(),
        (6, 11) => "Recuerda la tabla del 11: 11, 22, 33, 44, 55, 66, 77, 88, 99, 110, 121, 132...".into(),
        (6, 12) => "12 = 3 × 4, así que puedes dividir primero entre 3 y luego entre 4.".into(),
        _ => inverse_table(),
    };
    Some(hint)
}
