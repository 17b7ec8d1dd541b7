use super::problem::Operator;

/// Generic strategy hint used when a generator has nothing specific to say.
pub fn generic_hint(operator: Operator) -> &'static str {
    match operator {
        Operator::Add => "Intenta sumar por columnas, primero las unidades, luego las decenas.",
        Operator::Subtract => {
            "Recuerda que puedes descomponer el número mayor para facilitar la resta."
        }
        Operator::Multiply => "Intenta multiplicar dígito por dígito y luego suma los resultados.",
        Operator::Divide => "Piensa en la tabla de multiplicar del divisor.",
        Operator::Fraction => "Recuerda que una fracción representa una división.",
        Operator::Percent => {
            "Un porcentaje es una fracción de 100. Para calcular X% de Y, multiplica Y por X/100."
        }
        Operator::Power => {
            "Una potencia significa multiplicar el número base por sí mismo tantas veces como indique el exponente."
        }
    }
}
