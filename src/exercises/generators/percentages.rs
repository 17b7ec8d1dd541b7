use super::pick;
use crate::exercises::{format_number, Exercise, Problem};
use rand::Rng;

pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let percent: u32 = pick(rng, &[10, 25, 50, 75]);
        let base: u32 = pick(rng, &[20, 40, 50, 100, 200, 400]);
        let problem = Problem::PercentOf { percent, base };
        let base_f = f64::from(base);
        let hint = match percent {
            10 => format!("10% es 1/10 del número: {base} ÷ 10 = {}", format_number(base_f / 10.0)),
            25 => format!("25% es 1/4 del número: {base} ÷ 4 = {}", format_number(base_f / 4.0)),
            50 => format!("50% es la mitad del número: {base} ÷ 2 = {}", format_number(base_f / 2.0)),
            _ => format!(
                "75% es 3/4 del número: 3 × ({base} ÷ 4) = {}",
                format_number(problem.answer())
            ),
        };
        Exercise::with_hint(problem, hint)
    } else {
        let part: u32 = pick(rng, &[10, 20, 25, 30, 40, 50, 60, 75, 80]);
        Exercise::with_hint(
            Problem::PercentOfHundred { part },
            format!("Sobre una base de 100, {part} representa directamente el {part}% del total."),
        )
    }
}
