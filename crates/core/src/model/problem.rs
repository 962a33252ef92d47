use std::fmt;

use serde::{Deserialize, Serialize};

//
// ─── OPERATION ─────────────────────────────────────────────────────────────────
//

/// A concrete arithmetic operation applied to a single problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    /// Symbol used when rendering a prompt.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '−',
            Operation::Multiplication => '×',
            Operation::Division => '÷',
        }
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// Canonical answer of a problem.
///
/// Each variant selects how typed input is compared:
/// - `Integer`: numeric parse, integral equality
/// - `Real`: numeric parse, exact floating equality
/// - `Remainder`: normalized text against `"<quotient>r<remainder>"`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Answer {
    Integer(i64),
    Real(f64),
    Remainder { quotient: i64, remainder: i64 },
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Integer(value) => write!(f, "{value}"),
            Answer::Real(value) => write!(f, "{value}"),
            Answer::Remainder {
                quotient,
                remainder,
            } => write!(f, "{quotient}r{remainder}"),
        }
    }
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// One generated exercise: operands in display order, the operation, and the
/// canonical answer.
///
/// For division, `operands` is `[dividend, divisor]` and the divisor is never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    operands: Vec<i64>,
    operation: Operation,
    answer: Answer,
}

impl Problem {
    #[must_use]
    pub(crate) fn new(operands: Vec<i64>, operation: Operation, answer: Answer) -> Self {
        Self {
            operands,
            operation,
            answer,
        }
    }

    #[must_use]
    pub fn operands(&self) -> &[i64] {
        &self.operands
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn answer(&self) -> Answer {
        self.answer
    }

    /// Renders the prompt, e.g. `"12 + 7 + 30 = ?"`.
    #[must_use]
    pub fn prompt(&self) -> String {
        let separator = format!(" {} ", self.operation.symbol());
        let joined = self
            .operands
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(&separator);
        format!("{joined} = ?")
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prompt())
    }
}
