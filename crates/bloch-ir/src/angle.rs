//! Rotation angles and their restricted symbolic grammar.
//!
//! Gate parameters arrive as either JSON numbers or short strings. Strings are
//! limited to a numeric literal or a rational multiple of π:
//!
//! ```text
//! angle   := literal | [sign] [coeff ['*']] pi ['/' divisor]
//! pi      := "pi" | "π"
//! coeff   := digits
//! divisor := digits (non-zero)
//! ```
//!
//! There is no general arithmetic: `pi+1` or `theta` are rejected.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// A concrete rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Angle {
    /// A plain numeric value in radians.
    Radians(f64),
    /// `numerator * π / denominator`.
    PiFraction {
        /// Signed integer coefficient of π.
        numerator: i32,
        /// Positive divisor.
        denominator: u32,
    },
}

impl Angle {
    /// Create a `numerator·π/denominator` angle.
    pub fn pi_fraction(numerator: i32, denominator: u32) -> IrResult<Self> {
        if denominator == 0 {
            return Err(IrError::InvalidAngleExpression {
                expr: format!("{numerator}pi/0"),
                gate_name: None,
            });
        }
        Ok(Angle::PiFraction {
            numerator,
            denominator,
        })
    }

    /// Evaluate to radians.
    pub fn radians(&self) -> f64 {
        match *self {
            Angle::Radians(v) => v,
            Angle::PiFraction {
                numerator,
                denominator,
            } => f64::from(numerator) * PI / f64::from(denominator),
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Angle::Radians(v) => write!(f, "{v}"),
            Angle::PiFraction {
                numerator,
                denominator,
            } => {
                match numerator {
                    1 => write!(f, "pi")?,
                    -1 => write!(f, "-pi")?,
                    n => write!(f, "{n}pi")?,
                }
                if denominator != 1 {
                    write!(f, "/{denominator}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Angle {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IrError::InvalidAngleExpression {
            expr: s.to_string(),
            gate_name: None,
        };

        let text: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase()
            .replace('π', "pi");
        if text.is_empty() {
            return Err(invalid());
        }

        if let Ok(value) = text.parse::<f64>() {
            return if value.is_finite() {
                Ok(Angle::Radians(value))
            } else {
                Err(invalid())
            };
        }

        let (sign, rest) = match text.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, text.strip_prefix('+').unwrap_or(&text)),
        };

        let pi_at = rest.find("pi").ok_or_else(invalid)?;
        let coeff_text = rest[..pi_at].strip_suffix('*').unwrap_or(&rest[..pi_at]);
        let coeff: i32 = if coeff_text.is_empty() {
            1
        } else if coeff_text.bytes().all(|b| b.is_ascii_digit()) {
            coeff_text.parse().map_err(|_| invalid())?
        } else {
            return Err(invalid());
        };

        let tail = &rest[pi_at + 2..];
        let denominator: u32 = if tail.is_empty() {
            1
        } else {
            let digits = tail.strip_prefix('/').ok_or_else(invalid)?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse().map_err(|_| invalid())?
        };

        Angle::pi_fraction(sign * coeff, denominator).map_err(|_| invalid())
    }
}

/// A gate parameter value as written in a circuit description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AngleExpr {
    /// A JSON number, taken as radians.
    Number(f64),
    /// A string in the angle grammar.
    Text(String),
}

impl AngleExpr {
    /// Resolve the expression to a concrete angle.
    pub fn resolve(&self) -> IrResult<Angle> {
        match self {
            AngleExpr::Number(v) if v.is_finite() => Ok(Angle::Radians(*v)),
            AngleExpr::Number(v) => Err(IrError::InvalidAngleExpression {
                expr: v.to_string(),
                gate_name: None,
            }),
            AngleExpr::Text(text) => text.parse(),
        }
    }
}

impl From<f64> for AngleExpr {
    fn from(value: f64) -> Self {
        AngleExpr::Number(value)
    }
}

impl From<&str> for AngleExpr {
    fn from(value: &str) -> Self {
        AngleExpr::Text(value.to_string())
    }
}

impl From<Angle> for AngleExpr {
    fn from(angle: Angle) -> Self {
        AngleExpr::Text(angle.to_string())
    }
}
