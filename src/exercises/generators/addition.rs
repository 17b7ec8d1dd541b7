use super::pick;
use crate::curriculum::Grade;
use crate::exercises::{format_number, Exercise, Operator, Problem};
use rand::Rng;

pub(super) fn generate<R: Rng + ?Sized>(grade: Grade, rng: &mut R) -> Exercise {
    match grade.get() {
        1 => small_sums(rng),
        2 => round_to_ten(rng),
        3 => friendly_hundreds(rng),
        4 => hundreds_and_quarters(rng),
        5 => quarters_and_complements(rng),
        _ => thousands_and_decimals(rng),
    }
}

fn sum(left: f64, right: f64, hint: String) -> Exercise {
    Exercise::with_hint(
        Problem::Binary {
            operator: Operator::Add,
            left,
            right,
        },
        hint,
    )
}

fn small_sums<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    let left: u32 = rng.gen_range(1..=9);
    let right: u32 = rng.gen_range(1..=10 - left);
    sum(
        f64::from(left),
        f64::from(right),
        format!("Cuenta {left} y luego agrega {right} más."),
    )
}

fn round_to_ten<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let tens: u32 = rng.gen_range(1..=5);
        let units: u32 = rng.gen_range(1..=9);
        let left = tens * 10 + units;
        let right = 10 - units;
        sum(
            f64::from(left),
            f64::from(right),
            format!(
                "Completa la decena: a {left} le faltan {right} para llegar a {}.",
                left + right
            ),
        )
    } else {
        let a: u32 = rng.gen_range(1..=5);
        let b: u32 = rng.gen_range(1..=5);
        sum(
            f64::from(a * 10),
            f64::from(b * 10),
            format!("Piensa en {a} + {b} = {} y agrega el cero: {}0", a + b, a + b),
        )
    }
}

fn friendly_hundreds<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let left: u32 = rng.gen_range(1..=8) * 10;
        let right = 100 - left;
        sum(
            f64::from(left),
            f64::from(right),
            format!("Busca completar la centena: ¿cuánto le falta a {left} para llegar a 100?"),
        )
    } else {
        let a: u32 = rng.gen_range(1..=5);
        let b: u32 = rng.gen_range(1..=4);
        sum(
            f64::from(a * 100),
            f64::from(b * 100),
            format!(
                "Suma primero las centenas: {a} + {b} = {}, luego agrega los ceros: {}00",
                a + b,
                a + b
            ),
        )
    }
}

fn hundreds_and_quarters<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let a: u32 = rng.gen_range(1..=5);
        let b: u32 = rng.gen_range(1..=5);
        sum(
            f64::from(a * 100),
            f64::from(b * 100),
            format!(
                "Suma las centenas: {a} + {b} = {}, luego agrega los ceros: {}00",
                a + b,
                a + b
            ),
        )
    } else {
        let left: u32 = pick(rng, &[25, 50, 75]);
        let right: u32 = pick(rng, &[25, 50, 75]);
        sum(
            f64::from(left),
            f64::from(right),
            format!(
                "Piensa en cuartos de 100: {left} son {}/4 y {right} son {}/4. Juntos son {}/4, o sea {}.",
                left / 25,
                right / 25,
                (left + right) / 25,
                left + right
            ),
        )
    }
}

fn quarters_and_complements<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let pool = [25, 50, 75, 100, 125, 150, 175];
        let left: u32 = pick(rng, &pool);
        let right: u32 = pick(rng, &pool);
        sum(
            f64::from(left),
            f64::from(right),
            format!(
                "{left} = {} × 25 y {right} = {} × 25, así que la suma es {} × 25 = {}",
                left / 25,
                right / 25,
                (left + right) / 25,
                left + right
            ),
        )
    } else {
        let target: u32 = pick(rng, &[100, 1000]);
        let left: u32 = if target == 100 {
            rng.gen_range(10..=89)
        } else {
            rng.gen_range(100..=899)
        };
        let right = target - left;
        sum(
            f64::from(left),
            f64::from(right),
            format!("Fíjate que {left} + ? = {target}. La diferencia es {right}."),
        )
    }
}

fn thousands_and_decimals<R: Rng + ?Sized>(rng: &mut R) -> Exercise {
    if rng.gen_bool(0.5) {
        let left: u32 = pick(rng, &[250, 500, 750]);
        let right = 1000 - left;
        sum(
            f64::from(left),
            f64::from(right),
            format!("Busca completar el millar: {left} + ? = 1000. La diferencia es {right}."),
        )
    } else {
        let pool = [0.5, 1.5, 2.5, 0.75, 1.75, 0.25];
        let left = pick(rng, &pool);
        let right = pick(rng, &pool);
        sum(
            left,
            right,
            format!(
                "Convierte a centésimos: {} + {} centésimos = {} centésimos.",
                format_number(left * 100.0),
                format_number(right * 100.0),
                format_number((left + right) * 100.0)
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_grade_sums_stay_within_ten() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let exercise = small_sums(&mut rng);
            assert!((1.0..=9.0).contains(&exercise.operand1));
            assert!(exercise.operand2 >= 1.0);
            assert!(exercise.correct_answer <= 10.0);
        }
    }

    #[test]
    fn complements_reach_their_target() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..200 {
            let exercise = quarters_and_complements(&mut rng);
            let answer = exercise.correct_answer;
            assert!(answer % 25.0 == 0.0 || answer == 100.0 || answer == 1000.0);
        }
    }
}
