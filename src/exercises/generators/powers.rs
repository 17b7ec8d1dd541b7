use super::pick;
use crate::exercises::{Exercise, Problem};
use rand::Rng;

pub(super) fn generate<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    match rng.gen_range(0..3) {
        0 => {
            let base: u32 = rng.gen_range(2..=10);
            Exercise::with_hint(
                Problem::Power { base, exponent: 2 },
                format!(
                    "El cuadrado de un número es el número por sí mismo: {base} × {base} = {}",
                    base * base
                ),
            )
        }
        1 => {
            let base: u32 = pick(rng, &[2, 3, 4, 5]);
            Exercise::with_hint(
                Problem::Power { base, exponent: 3 },
                format!(
                    "El cubo es el número multiplicado por sí mismo tres veces: {base} × {base} × {base} = {}",
                    base * base * base
                ),
            )
        }
        _ => {
            let exponent: u32 = rng.gen_range(1..=4);
            Exercise::with_hint(
                Problem::Power {
                    base: 10,
                    exponent,
                },
                format!(
                    "Una potencia de 10 es un 1 seguido de {exponent} ceros: 1{}",
                    "0".repeat(exponent as usize)
                ),
            )
        }
    }
}
