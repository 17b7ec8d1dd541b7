use super::pick;
use crate::curriculum::Grade;
use crate::exercises::{format_number, Exercise, Operator, Problem};
use rand::Rng;

pub(super) fn generate<R: Rng + ?Sized>(grade: Grade, rng: &mut R) -> Exercise {
    match grade.get() {
        1 => within_ten(rng),
        2 => round_tens(rng),
        3 => friendly_hundreds(rng),
        4 => hundreds_and_quarters(rng),
        5 => complements_and_round_hundreds(rng),
        _ => thousands_and_decimals(rng),
    }
}

fn difference(left: f64, right: f64, hint: String) -> Exercise {
    Exercise::with_hint(
        Problem::Binary {
            operator: Operator::Subtract,
            left,
            right,
        },
        hint,
    )
}

fn within_ten<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    let left: u32 = rng.gen_range(1..=10);
    let right: u32 = rng.gen_range(1..=left);
    difference(
        f64::from(left),
        f64::from(right),
        format!("Si tienes {left} y quitas {right}, ¿cuántos te quedan?"),
    )
}

fn round_tens<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let a: u32 = rng.gen_range(3..=7);
        let b: u32 = rng.gen_range(1..a);
        difference(
            f64::from(a * 10),
            f64::from(b * 10),
            format!("Piensa en {a} - {b} = {} y agrega el cero: {}0", a - b, a - b),
        )
    } else {
        let tens: u32 = rng.gen_range(1..=5);
        let units: u32 = rng.gen_range(1..=9);
        difference(
            f64::from(tens * 10 + units),
            f64::from(units),
            format!(
                "Si quitas {units} de {}, te quedan exactamente {tens}0",
                tens * 10 + units
            ),
        )
    }
}

fn friendly_hundreds<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let a: u32 = rng.gen_range(3..=7);
        let b: u32 = rng.gen_range(1..a);
        difference(
            f64::from(a * 100),
            f64::from(b * 100),
            format!(
                "Resta las centenas: {a} - {b} = {}, luego agrega los ceros: {}00",
                a - b,
                a - b
            ),
        )
    } else {
        let right: u32 = pick(rng, &[25, 50, 75, 100]);
        difference(
            100.0,
            f64::from(right),
            format!(
                "{right} son {}/4 de 100, así que la respuesta es {}",
                right / 25,
                100 - right
            ),
        )
    }
}

fn hundreds_and_quarters<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let base: u32 = pick(rng, &[100, 200, 500, 1000]);
        let right: u32 = pick(rng, &[25, 50, 75, 100]);
        difference(
            f64::from(base),
            f64::from(right),
            format!(
                "Quita {right} de {base} pensando en cuartos de 100: quedan {}",
                base - right
            ),
        )
    } else {
        let a: u32 = rng.gen_range(5..=9);
        let b: u32 = rng.gen_range(1..a);
        difference(
            f64::from(a * 100),
            f64::from(b * 100),
            format!(
                "Resta las centenas: {a} - {b} = {}, luego agrega los ceros: {}00",
                a - b,
                a - b
            ),
        )
    }
}

fn complements_and_round_hundreds<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let base: u32 = pick(rng, &[100, 1000]);
        let right: u32 = if base == 100 {
            pick(rng, &[25, 50, 75])
        } else {
            pick(rng, &[250, 500, 750])
        };
        difference(
            f64::from(base),
            f64::from(right),
            format!(
                "{right} son {}/4 de {base}, así que quedan {}",
                right * 4 / base,
                base - right
            ),
        )
    } else {
        let a: u32 = rng.gen_range(3..=9);
        let b: u32 = rng.gen_range(0..a);
        difference(
            f64::from(a * 100),
            f64::from(b * 100),
            format!(
                "Resta las centenas: {a} - {b} = {}, luego agrega los ceros: {}00",
                a - b,
                a - b
            ),
        )
    }
}

fn thousands_and_decimals<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let right: u32 = pick(rng, &[125, 250, 375, 500, 625, 750, 875]);
        difference(
            1000.0,
            f64::from(right),
            format!(
                "{right} son {}/8 de 1000, así que la resta es {}",
                right / 125,
                1000 - right
            ),
        )
    } else {
        let base: u32 = pick(rng, &[5, 10, 20]);
        let right = pick(rng, &[0.25, 0.5, 0.75, 1.5, 2.5]);
        difference(
            f64::from(base),
            right,
            format!(
                "Escribe {base} como {base}.00 y resta {} posición por posición.",
                format_number(right)
            ),
        )
    }
}
