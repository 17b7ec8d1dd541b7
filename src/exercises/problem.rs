use serde::{Deserialize, Serialize};

/// Operator symbol attached to an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
    #[serde(rename = "/")]
    Fraction,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "^")]
    Power,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Fraction => "/",
            Operator::Percent => "%",
            Operator::Power => "^",
        }
    }

    /// Whether answers are compared with the absolute tolerance instead of
    /// exact equality. Only `+`, `×` and `÷` get the tolerance.
    pub fn uses_tolerance(self) -> bool {
        matches!(self, Operator::Add | Operator::Multiply | Operator::Divide)
    }
}

/// The mathematical content of an exercise.
///
/// Operands, answer and display text are all derived from this value, so a
/// shifted copy (see [`Problem::shifted`]) stays internally consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    /// `left op right` for `+ - × ÷`. Division problems always satisfy
    /// `left = right × answer`.
    Binary {
        operator: Operator,
        left: f64,
        right: f64,
    },
    /// `numerator/denominator = ?/target_denominator`.
    FractionEquivalence {
        numerator: u32,
        denominator: u32,
        target_denominator: u32,
    },
    /// `numerator/denominator` of `quantity`.
    FractionOfQuantity {
        numerator: u32,
        denominator: u32,
        quantity: u32,
    },
    /// `left/d ± right/d = ?/d`; the answer is the resulting numerator.
    SameDenominator {
        operator: Operator,
        left: u32,
        right: u32,
        denominator: u32,
    },
    /// `percent%` of `base`.
    PercentOf { percent: u32, base: u32 },
    /// Which percentage of 100 is `part`.
    PercentOfHundred { part: u32 },
    Power { base: u32, exponent: u32 },
}

impl Problem {
    pub fn operator(&self) -> Operator {
        match self {
            Problem::Binary { operator, .. } | Problem::SameDenominator { operator, .. } => {
                *operator
            }
            Problem::FractionEquivalence { .. } | Problem::FractionOfQuantity { .. } => {
                Operator::Fraction
            }
            Problem::PercentOf { .. } | Problem::PercentOfHundred { .. } => Operator::Percent,
            Problem::Power { .. } => Operator::Power,
        }
    }

    /// `(operand1, operand2, operand3, operand4)` as exposed on the exercise.
    pub fn operands(&self) -> (f64, f64, Option<f64>, Option<f64>) {
        match *self {
            Problem::Binary { left, right, .. } => (left, right, None, None),
            Problem::FractionEquivalence {
                numerator,
                denominator,
                target_denominator,
            } => (
                f64::from(numerator),
                f64::from(denominator),
                Some(self.answer()),
                Some(f64::from(target_denominator)),
            ),
            Problem::FractionOfQuantity {
                numerator,
                denominator,
                quantity,
            } => (
                f64::from(numerator),
                f64::from(denominator),
                Some(f64::from(quantity)),
                None,
            ),
            Problem::SameDenominator {
                left,
                right,
                denominator,
                ..
            } => (
                f64::from(left),
                f64::from(denominator),
                Some(f64::from(right)),
                Some(f64::from(denominator)),
            ),
            Problem::PercentOf { percent, base } => (f64::from(percent), f64::from(base), None, None),
            Problem::PercentOfHundred { part } => (f64::from(part), 100.0, None, None),
            Problem::Power { base, exponent } => (f64::from(base), f64::from(exponent), None, None),
        }
    }

    pub fn answer(&self) -> f64 {
        match *self {
            Problem::Binary {
                operator,
                left,
                right,
            } => {
                let raw = match operator {
                    Operator::Add => left + right,
                    Operator::Subtract => left - right,
                    Operator::Multiply => left * right,
                    Operator::Divide if right != 0.0 => left / right,
                    _ => f64::NAN,
                };
                round_hundredths(raw)
            }
            Problem::FractionEquivalence {
                numerator,
                denominator,
                target_denominator,
            } => {
                if denominator == 0 {
                    return f64::NAN;
                }
                f64::from(numerator) * f64::from(target_denominator) / f64::from(denominator)
            }
            Problem::FractionOfQuantity {
                numerator,
                denominator,
                quantity,
            } => {
                if denominator == 0 {
                    return f64::NAN;
                }
                f64::from(numerator) * f64::from(quantity) / f64::from(denominator)
            }
            Problem::SameDenominator {
                operator,
                left,
                right,
                ..
            } => match operator {
                Operator::Add => f64::from(left) + f64::from(right),
                Operator::Subtract => f64::from(left) - f64::from(right),
                _ => f64::NAN,
            },
            Problem::PercentOf { percent, base } => f64::from(base) * f64::from(percent) / 100.0,
            Problem::PercentOfHundred { part } => f64::from(part),
            Problem::Power { base, exponent } => f64::from(base).powi(exponent as i32),
        }
    }

    pub fn display(&self) -> String {
        match *self {
            Problem::Binary {
                operator,
                left,
                right,
            } => format!(
                "{} {} {} = ?",
                format_number(left),
                operator.symbol(),
                format_number(right)
            ),
            Problem::FractionEquivalence {
                numerator,
                denominator,
                target_denominator,
            } => format!("Si {numerator}/{denominator} = ?/{target_denominator}, entonces ? = "),
            Problem::FractionOfQuantity {
                numerator,
                denominator,
                quantity,
            } => format!("¿Cuánto es {numerator}/{denominator} de {quantity}?"),
            Problem::SameDenominator {
                operator,
                left,
                right,
                denominator,
            } => format!(
                "{left}/{denominator} {} {right}/{denominator} = ?/{denominator}",
                operator.symbol()
            ),
            Problem::PercentOf { percent, base } => format!("{percent}% de {base} = ?"),
            Problem::PercentOfHundred { part } => format!("¿Qué porcentaje de 100 es {part}?"),
            Problem::Power { base, exponent } => match exponent {
                2 => format!("{base}² = ?"),
                3 => format!("{base}³ = ?"),
                _ => format!("{base}^{exponent} = ?"),
            },
        }
    }

    /// Copy of this problem with its leading operand moved up by `offset`.
    ///
    /// Division shifts the dividend by `offset × divisor` so the quotient
    /// stays whole.
    pub fn shifted(&self, offset: u32) -> Problem {
        let delta = f64::from(offset);
        match *self {
            Problem::Binary {
                operator: Operator::Divide,
                left,
                right,
            } => Problem::Binary {
                operator: Operator::Divide,
                left: left + delta * right,
                right,
            },
            Problem::Binary {
                operator,
                left,
                right,
            } => Problem::Binary {
                operator,
                left: left + delta,
                right,
            },
            Problem::FractionEquivalence {
                numerator,
                denominator,
                target_denominator,
            } => Problem::FractionEquivalence {
                numerator: numerator + offset,
                denominator,
                target_denominator,
            },
            Problem::FractionOfQuantity {
                numerator,
                denominator,
                quantity,
            } => Problem::FractionOfQuantity {
                numerator: numerator + offset,
                denominator,
                quantity,
            },
            Problem::SameDenominator {
                operator,
                left,
                right,
                denominator,
            } => Problem::SameDenominator {
                operator,
                left: left + offset,
                right,
                denominator,
            },
            Problem::PercentOf { percent, base } => Problem::PercentOf {
                percent: percent + offset,
                base,
            },
            Problem::PercentOfHundred { part } => Problem::PercentOfHundred {
                part: part + offset,
            },
            Problem::Power { base, exponent } => Problem::Power {
                base: base + offset,
                exponent,
            },
        }
    }
}

/// Whole numbers print without decimals, everything else with two.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
