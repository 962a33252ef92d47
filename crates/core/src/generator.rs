use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::model::{Answer, DrillConfig, Operation, Problem};

/// Divisors stay small enough to work by hand.
const MAX_DIVISOR_DIGITS: u32 = 3;
/// `10^18` is the largest power of ten an `i64` holds.
const MAX_OPERAND_DIGITS: u32 = 18;

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// Compute the canonical answer for operands in display order.
///
/// - Subtraction folds left to right: `[10, 3, 2]` is `10 - 3 - 2`.
/// - Division uses `operands[0] / operands[1]`. With remainders allowed an inexact
///   division yields `Answer::Remainder`; without them an exact division yields
///   `Answer::Integer` and anything else the real quotient.
#[must_use]
pub fn calculate_answer(operands: &[i64], operation: Operation, allow_remainders: bool) -> Answer {
    match operation {
        Operation::Addition => {
            Answer::Integer(operands.iter().fold(0_i64, |acc, n| acc.saturating_add(*n)))
        }
        Operation::Subtraction => {
            let Some((first, rest)) = operands.split_first() else {
                return Answer::Integer(0);
            };
            Answer::Integer(rest.iter().fold(*first, |acc, n| acc.saturating_sub(*n)))
        }
        Operation::Multiplication => {
            Answer::Integer(operands.iter().fold(1_i64, |acc, n| acc.saturating_mul(*n)))
        }
        Operation::Division => {
            let (dividend, divisor) = match operands {
                [dividend, divisor, ..] => (*dividend, *divisor),
                _ => return Answer::Integer(0),
            };
            divide(dividend, divisor, allow_remainders)
        }
    }
}

fn divide(dividend: i64, divisor: i64, allow_remainders: bool) -> Answer {
    if divisor == 0 {
        // Never generated; kept total so hand-built operands cannot panic.
        #[allow(clippy::cast_precision_loss)]
        return Answer::Real(dividend as f64 / 0.0);
    }

    let quotient = dividend.div_euclid(divisor);
    let remainder = dividend.rem_euclid(divisor);
    if remainder == 0 {
        return Answer::Integer(quotient);
    }
    if allow_remainders {
        Answer::Remainder {
            quotient,
            remainder,
        }
    } else {
        #[allow(clippy::cast_precision_loss)]
        Answer::Real(dividend as f64 / divisor as f64)
    }
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Random problem source.
///
/// Generic over the RNG so tests can seed it; production uses an OS-seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct ProblemGenerator<R = StdRng> {
    rng: R,
}

impl ProblemGenerator<StdRng> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic generator for tests and replays.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ProblemGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ProblemGenerator<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform number with exactly `digits` decimal digits.
    ///
    /// One digit means `1..=9`; zero is never produced.
    pub fn generate_number(&mut self, digits: u32) -> i64 {
        let digits = digits.clamp(1, MAX_OPERAND_DIGITS);
        if digits == 1 {
            return self.rng.random_range(1..=9);
        }
        let min = 10_i64.pow(digits - 1);
        let max = min * 10 - 1;
        self.rng.random_range(min..=max)
    }

    /// The configured operation, or a uniform pick of all four for `Mixed`.
    pub fn pick_operation(&mut self, config: &DrillConfig) -> Operation {
        match config.operation_type().fixed_operation() {
            Some(operation) => operation,
            None => *Operation::ALL
                .choose(&mut self.rng)
                .unwrap_or(&Operation::Addition),
        }
    }

    /// Generate one problem for the given configuration.
    pub fn generate_problem(&mut self, config: &DrillConfig) -> Problem {
        let operation = self.pick_operation(config);
        let max_digits = config.max_digits();

        let operands = match operation {
            Operation::Division => {
                let divisor = self.generate_number(max_digits.min(MAX_DIVISOR_DIGITS));
                let dividend = if config.allow_remainders() {
                    self.generate_number(max_digits)
                } else {
                    divisor * self.generate_number(max_digits.saturating_sub(2).max(1))
                };
                vec![dividend, divisor]
            }
            _ => (0..config.numbers_in_problem())
                .map(|_| {
                    let digits = self.rng.random_range(1..=max_digits);
                    self.generate_number(digits)
                })
                .collect(),
        };

        let answer = calculate_answer(&operands, operation, config.allow_remainders());
        Problem::new(operands, operation, answer)
    }

    /// Generate the whole ordered problem list for a session up front.
    pub fn generate_set(&mut self, config: &DrillConfig) -> Vec<Problem> {
        (0..config.problem_count())
            .map(|_| self.generate_problem(config))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DrillConfigDraft, OperationType};

    fn config(
        operation_type: OperationType,
        max_digits: u32,
        allow_remainders: bool,
    ) -> DrillConfig {
        DrillConfigDraft {
            max_digits,
            problem_count: 200,
            numbers_in_problem: 2,
            operation_type,
            allow_remainders,
        }
        .validate()
        .unwrap()
    }

    fn digit_count(n: i64) -> u32 {
        n.unsigned_abs().to_string().len() as u32
    }

    #[test]
    fn generated_numbers_have_exact_digit_count() {
        let mut generator = ProblemGenerator::seeded(7);
        for digits in 1..=9 {
            for _ in 0..200 {
                let n = generator.generate_number(digits);
                assert_eq!(digit_count(n), digits, "{n} for {digits} digits");
            }
        }
    }

    #[test]
    fn single_digit_numbers_are_never_zero() {
        let mut generator = ProblemGenerator::seeded(1);
        for _ in 0..1_000 {
            let n = generator.generate_number(1);
            assert!((1..=9).contains(&n));
        }
    }

    #[test]
    fn subtraction_folds_left_to_right() {
        assert_eq!(
            calculate_answer(&[10, 3, 2], Operation::Subtraction, false),
            Answer::Integer(5)
        );
    }

    #[test]
    fn sums_and_products_cover_all_operands() {
        assert_eq!(
            calculate_answer(&[4, 5, 6], Operation::Addition, false),
            Answer::Integer(15)
        );
        assert_eq!(
            calculate_answer(&[4, 5, 6], Operation::Multiplication, false),
            Answer::Integer(120)
        );
    }

    #[test]
    fn division_answer_forms() {
        assert_eq!(
            calculate_answer(&[23, 3], Operation::Division, true),
            Answer::Remainder {
                quotient: 7,
                remainder: 2
            }
        );
        assert_eq!(
            calculate_answer(&[21, 3], Operation::Division, true),
            Answer::Integer(7)
        );
        assert_eq!(
            calculate_answer(&[21, 3], Operation::Division, false),
            Answer::Integer(7)
        );
        assert_eq!(
            calculate_answer(&[5, 2], Operation::Division, false),
            Answer::Real(2.5)
        );
    }

    #[test]
    fn exact_division_never_leaves_a_remainder() {
        let mut generator = ProblemGenerator::seeded(42);
        for max_digits in 1..=6 {
            let config = config(OperationType::Division, max_digits, false);
            for problem in generator.generate_set(&config) {
                let [dividend, divisor] = problem.operands() else {
                    panic!("division must have two operands");
                };
                assert!(*divisor >= 1);
                assert!(digit_count(*divisor) <= 3);
                assert_eq!(dividend % divisor, 0);
                assert!(matches!(problem.answer(), Answer::Integer(_)));
            }
        }
    }

    #[test]
    fn division_with_remainders_draws_independent_dividend() {
        let mut generator = ProblemGenerator::seeded(3);
        let config = config(OperationType::Division, 4, true);
        let problems = generator.generate_set(&config);
        assert!(problems.iter().all(|p| digit_count(p.operands()[0]) == 4));
        assert!(
            problems
                .iter()
                .any(|p| matches!(p.answer(), Answer::Remainder { .. }))
        );
    }

    #[test]
    fn operand_digits_vary_up_to_max() {
        let mut generator = ProblemGenerator::seeded(11);
        let config = config(OperationType::Addition, 4, false);
        let digits: Vec<u32> = generator
            .generate_set(&config)
            .iter()
            .flat_map(|p| p.operands().iter().map(|n| digit_count(*n)))
            .collect();
        assert!(digits.iter().all(|d| (1..=4).contains(d)));
        assert!(digits.contains(&1));
        assert!(digits.contains(&4));
    }

    #[test]
    fn operand_count_follows_config_except_division() {
        let mut generator = ProblemGenerator::seeded(5);
        let config = DrillConfigDraft {
            max_digits: 3,
            problem_count: 100,
            numbers_in_problem: 4,
            operation_type: OperationType::Mixed,
            allow_remainders: false,
        }
        .validate()
        .unwrap();
        let problems = generator.generate_set(&config);
        assert_eq!(problems.len(), 100);
        for problem in &problems {
            let expected = if problem.operation() == Operation::Division { 2 } else { 4 };
            assert_eq!(problem.operands().len(), expected);
        }
        for op in Operation::ALL {
            assert!(problems.iter().any(|p| p.operation() == op), "{op:?} never drawn");
        }
    }
}
