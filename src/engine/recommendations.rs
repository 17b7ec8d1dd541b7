use crate::curriculum::{Grade, OperationId};
use crate::progress::{ProgressStore, MAX_STARS};
use crate::storage::KeyValueStore;

const MAX_RECOMMENDATIONS: usize = 3;

/// Precision under which an operation tip is added.
const TIP_PRECISION_THRESHOLD: u8 = 80;

pub(super) fn build<S: KeyValueStore>(
    store: &ProgressStore<S>,
    grade: Grade,
    operation: OperationId,
    stars: u8,
    precision: u8,
) -> Vec<String> {
    let mut out = Vec::new();
    match stars {
        0 => {
            out.push("¡No te rindas! Repite este nivel para ganar tu primera estrella.".to_string());
            out.push("Lee la pista antes de responder cuando un ejercicio te cueste.".to_string());
        }
        s if s >= MAX_STARS => {
            out.push(format!(
                "¡Excelente! Dominaste {} de {}° grado.",
                operation.display_name(),
                grade
            ));
            if let Some(next) = operation.next_in(grade) {
                out.push(format!("Continúa con {}.", next.display_name()));
            }
            if let Some(next_grade) = grade.next() {
                let grade_mastered = grade
                    .operations()
                    .iter()
                    .all(|op| store.operation_stars(grade, *op) >= MAX_STARS);
                if grade_mastered {
                    out.push(format!("Ya tienes 3 estrellas en todo: prueba {next_grade}° grado."));
                }
            }
        }
        _ => {
            out.push("¡Buen trabajo! Vuelve a intentarlo para conseguir 3 estrellas.".to_string());
        }
    }
    if precision < TIP_PRECISION_THRESHOLD {
        out.push(operation_tip(operation).to_string());
    }
    out.truncate(MAX_RECOMMENDATIONS);
    out
}

fn operation_tip(operation: OperationId) -> &'static str {
    match operation {
        OperationId::Addition => "Suma primero las decenas y luego las unidades.",
        OperationId::Subtraction => "Cuenta hacia adelante desde el número pequeño hasta el grande.",
        OperationId::Multiplication => "Repasa las tablas en voz alta, de dos en dos.",
        OperationId::Division => "Piensa qué número multiplicado por el divisor da el dividendo.",
        OperationId::Fractions => "Dibuja la fracción como partes de una pizza.",
        OperationId::Decimals => "Alinea los puntos decimales antes de operar.",
        OperationId::Powers => "Escribe la multiplicación completa antes de calcular la potencia.",
        OperationId::Percentages => "Recuerda que 50% es la mitad y 25% es la cuarta parte.",
    }
}
