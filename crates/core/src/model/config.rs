use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Operation;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("max digits must be between 1 and {max}, got {provided}")]
    InvalidMaxDigits { provided: u32, max: u32 },

    #[error("problem count must be between 1 and {max}, got {provided}")]
    InvalidProblemCount { provided: u32, max: u32 },

    #[error("numbers per problem must be between 2 and {max}, got {provided}")]
    InvalidNumbersInProblem { provided: u32, max: u32 },

    #[error("{digits} digits x {numbers} numbers overflows a product")]
    ProductOverflow { digits: u32, numbers: u32 },

    #[error("unknown operation type: {0}")]
    UnknownOperation(String),
}

//
// ─── OPERATION TYPE ────────────────────────────────────────────────────────────
//

/// Operation selection for a whole session. `Mixed` draws one of the four
/// concrete operations per problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Mixed,
}

impl OperationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Addition => "addition",
            OperationType::Subtraction => "subtraction",
            OperationType::Multiplication => "multiplication",
            OperationType::Division => "division",
            OperationType::Mixed => "mixed",
        }
    }

    /// The fixed operation, or `None` for `Mixed`.
    #[must_use]
    pub fn fixed_operation(self) -> Option<Operation> {
        match self {
            OperationType::Addition => Some(Operation::Addition),
            OperationType::Subtraction => Some(Operation::Subtraction),
            OperationType::Multiplication => Some(Operation::Multiplication),
            OperationType::Division => Some(Operation::Division),
            OperationType::Mixed => None,
        }
    }

    fn may_multiply(self) -> bool {
        matches!(self, OperationType::Multiplication | OperationType::Mixed)
    }
}

impl From<Operation> for OperationType {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Addition => OperationType::Addition,
            Operation::Subtraction => OperationType::Subtraction,
            Operation::Multiplication => OperationType::Multiplication,
            Operation::Division => OperationType::Division,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addition" => Ok(OperationType::Addition),
            "subtraction" => Ok(OperationType::Subtraction),
            "multiplication" => Ok(OperationType::Multiplication),
            "division" => Ok(OperationType::Division),
            "mixed" => Ok(OperationType::Mixed),
            _ => Err(ConfigError::UnknownOperation(s.to_string())),
        }
    }
}

//
// ─── CONFIGURATION ─────────────────────────────────────────────────────────────
//

/// Validated, immutable settings for one practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillConfig {
    max_digits: u32,
    problem_count: u32,
    numbers_in_problem: u32,
    operation_type: OperationType,
    allow_remainders: bool,
}

/// User-editable form of [`DrillConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillConfigDraft {
    pub max_digits: u32,
    pub problem_count: u32,
    pub numbers_in_problem: u32,
    pub operation_type: OperationType,
    pub allow_remainders: bool,
}

impl Default for DrillConfigDraft {
    fn default() -> Self {
        Self {
            max_digits: 2,
            problem_count: 10,
            numbers_in_problem: 2,
            operation_type: OperationType::Addition,
            allow_remainders: false,
        }
    }
}

impl DrillConfigDraft {
    pub const MAX_DIGITS: u32 = 9;
    pub const MAX_PROBLEM_COUNT: u32 = 1_000;
    pub const MAX_NUMBERS_IN_PROBLEM: u32 = 10;
    /// Largest digit budget whose product still fits in an `i64`.
    const MAX_PRODUCT_DIGITS: u32 = 18;

    /// Validate the draft into an immutable configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a field is out of range, or when the digit
    /// budget of a multiplication could overflow.
    pub fn validate(self) -> Result<DrillConfig, ConfigError> {
        if !(1..=Self::MAX_DIGITS).contains(&self.max_digits) {
            return Err(ConfigError::InvalidMaxDigits {
                provided: self.max_digits,
                max: Self::MAX_DIGITS,
            });
        }
        if !(1..=Self::MAX_PROBLEM_COUNT).contains(&self.problem_count) {
            return Err(ConfigError::InvalidProblemCount {
                provided: self.problem_count,
                max: Self::MAX_PROBLEM_COUNT,
            });
        }
        if !(2..=Self::MAX_NUMBERS_IN_PROBLEM).contains(&self.numbers_in_problem) {
            return Err(ConfigError::InvalidNumbersInProblem {
                provided: self.numbers_in_problem,
                max: Self::MAX_NUMBERS_IN_PROBLEM,
            });
        }
        if self.operation_type.may_multiply()
            && self.max_digits * self.numbers_in_problem > Self::MAX_PRODUCT_DIGITS
        {
            return Err(ConfigError::ProductOverflow {
                digits: self.max_digits,
                numbers: self.numbers_in_problem,
            });
        }

        Ok(DrillConfig {
            max_digits: self.max_digits,
            problem_count: self.problem_count,
            numbers_in_problem: self.numbers_in_problem,
            operation_type: self.operation_type,
            allow_remainders: self.allow_remainders,
        })
    }
}

impl DrillConfig {
    #[must_use]
    pub fn max_digits(&self) -> u32 {
        self.max_digits
    }

    #[must_use]
    pub fn problem_count(&self) -> u32 {
        self.problem_count
    }

    /// Operand count for non-division problems. Division always uses two.
    #[must_use]
    pub fn numbers_in_problem(&self) -> u32 {
        self.numbers_in_problem
    }

    #[must_use]
    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    #[must_use]
    pub fn allow_remainders(&self) -> bool {
        self.allow_remainders
    }

    /// Leaderboard label for the digit setting, e.g. `"3 max"`.
    #[must_use]
    pub fn digits_label(&self) -> String {
        format!("{} max", self.max_digits)
    }
}

impl From<&DrillConfig> for DrillConfigDraft {
    fn from(config: &DrillConfig) -> Self {
        Self {
            max_digits: config.max_digits,
            problem_count: config.problem_count,
            numbers_in_problem: config.numbers_in_problem,
            operation_type: config.operation_type,
            allow_remainders: config.allow_remainders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DrillConfigDraft {
        DrillConfigDraft::default()
    }

    #[test]
    fn default_draft_is_valid() {
        let config = draft().validate().unwrap();
        assert_eq!(config.max_digits(), 2);
        assert_eq!(config.digits_label(), "2 max");
    }

    #[test]
    fn rejects_zero_digits_and_counts() {
        let err = DrillConfigDraft {
            max_digits: 0,
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxDigits { provided: 0, .. }));

        let err = DrillConfigDraft {
            problem_count: 0,
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidProblemCount { .. }));

        let err = DrillConfigDraft {
            numbers_in_problem: 1,
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumbersInProblem { .. }));
    }

    #[test]
    fn product_budget_only_applies_when_multiplying() {
        let wide = DrillConfigDraft {
            max_digits: 9,
            numbers_in_problem: 3,
            ..draft()
        };
        assert!(wide.clone().validate().is_ok());

        let err = DrillConfigDraft {
            operation_type: OperationType::Mixed,
            ..wide
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ProductOverflow {
                digits: 9,
                numbers: 3
            }
        );
    }

    #[test]
    fn operation_type_parses_and_serializes_lowercase() {
        assert_eq!(
            " Mixed ".parse::<OperationType>().unwrap(),
            OperationType::Mixed
        );
        assert!("modulo".parse::<OperationType>().is_err());
        let json = serde_json::to_string(&OperationType::Division).unwrap();
        assert_eq!(json, "\"division\"");
    }
}
