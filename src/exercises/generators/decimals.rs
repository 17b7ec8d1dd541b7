use super::pick;
use crate::curriculum::Grade;
use crate::exercises::{format_number, Exercise, Operator, Problem};
use rand::Rng;

pub(super) fn generate<R: Rng + ?Sized>(grade: Grade, rng: &mut R) -> Exercise {
    let sixth = grade.get() >= 6;
    if rng.gen_bool(0.5) {
        let pool: &[f64] = if sixth {
            &[0.25, 0.5, 0.75, 1.25, 1.5, 1.75]
        } else {
            &[0.5, 1.5, 2.5, 0.25, 0.75]
        };
        decimal_sum(pick(rng, pool), pick(rng, pool), sixth)
    } else if sixth {
        let whole: u32 = rng.gen_range(2..=20);
        let decimal = pick(rng, &[0.1, 0.5, 0.25]);
        scaled_whole(f64::from(whole), decimal)
    } else {
        let decimal = pick(rng, &[0.5, 0.25, 0.1]);
        let whole: u32 = rng.gen_range(1..=9);
        decimal_times_whole(decimal, f64::from(whole))
    }
}

fn decimal_sum(left: f64, right: f64, column_hint: bool) -> Exercise {
    let hint = if column_hint {
        "Alinea los puntos decimales y suma por columnas.".to_string()
    } else {
        format!(
            "Piensa en centésimos: {} + {} = {} centésimos.",
            format_number(left * 100.0),
            format_number(right * 100.0),
            format_number((left + right) * 100.0)
        )
    };
    Exercise::with_hint(
        Problem::Binary {
            operator: Operator::Add,
            left,
            right,
        },
        hint,
    )
}

fn decimal_times_whole(decimal: f64, whole: f64) -> Exercise {
    let problem = Problem::Binary {
        operator: Operator::Multiply,
        left: decimal,
        right: whole,
    };
    Exercise::with_hint(
        problem,
        format!(
            "{} es {} centésimos, así que {} × {} = {} centésimos = {}",
            format_number(decimal),
            format_number(decimal * 100.0),
            format_number(decimal),
            format_number(whole),
            format_number((decimal * 100.0 * whole).round()),
            format_number(problem.answer())
        ),
    )
}

fn scaled_whole(whole: f64, decimal: f64) -> Exercise {
    let problem = Problem::Binary {
        operator: Operator::Multiply,
        left: whole,
        right: decimal,
    };
    let divisor = (1.0 / decimal).round();
    Exercise::with_hint(
        problem,
        format!(
            "Multiplicar por {} es como dividir entre {}: {} ÷ {} = {}",
            format_number(decimal),
            format_number(divisor),
            format_number(whole),
            format_number(divisor),
            format_number(problem.answer())
        ),
    )
}
