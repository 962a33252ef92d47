use crate::model::Answer;

/// Largest magnitude at which every integer is exactly representable in `f64`.
const F64_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Outcome of comparing typed input with a canonical answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCheck {
    /// Input was empty after trimming; nothing should change.
    Blank,
    Correct,
    Incorrect,
}

impl AnswerCheck {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerCheck::Correct)
    }
}

/// Lower-cases and strips all whitespace, so `"7 R 2"` becomes `"7r2"`.
#[must_use]
pub fn normalize_remainder_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare raw user input against the canonical answer.
///
/// Unparsable input is simply incorrect.
#[must_use]
pub fn check_answer(answer: &Answer, raw: &str) -> AnswerCheck {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return AnswerCheck::Blank;
    }

    let correct = match *answer {
        Answer::Remainder { .. } => normalize_remainder_input(trimmed) == answer.to_string(),
        Answer::Integer(expected) => parse_integral(trimmed) == Some(expected),
        #[allow(clippy::float_cmp)]
        Answer::Real(expected) => trimmed.parse::<f64>().is_ok_and(|value| value == expected),
    };

    if correct {
        AnswerCheck::Correct
    } else {
        AnswerCheck::Incorrect
    }
}

/// Parses `"12"`, `"12.0"` or `"1.2e1"` as 12; fractional input yields `None`.
fn parse_integral(input: &str) -> Option<i64> {
    if let Ok(value) = input.parse::<i64>() {
        return Some(value);
    }
    let value = input.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > F64_EXACT_INT {
        return None;
    }
    // NOTE: bounded by F64_EXACT_INT above, so the cast is exact.
    #[allow(clippy::cast_possible_truncation)]
    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEVEN_R_TWO: Answer = Answer::Remainder {
        quotient: 7,
        remainder: 2,
    };

    #[test]
    fn blank_input_is_a_non_event() {
        assert_eq!(check_answer(&Answer::Integer(4), "   "), AnswerCheck::Blank);
        assert_eq!(check_answer(&SEVEN_R_TWO, ""), AnswerCheck::Blank);
    }

    #[test]
    fn remainder_answers_ignore_case_and_whitespace() {
        assert!(check_answer(&SEVEN_R_TWO, "7r2").is_correct());
        assert!(check_answer(&SEVEN_R_TWO, "7 R 2").is_correct());
        assert!(check_answer(&SEVEN_R_TWO, " 7R2 ").is_correct());
        assert!(!check_answer(&SEVEN_R_TWO, "7").is_correct());
        assert!(!check_answer(&SEVEN_R_TWO, "7r3").is_correct());
    }

    #[test]
    fn integer_answers_compare_numerically() {
        let answer = Answer::Integer(12);
        assert!(check_answer(&answer, "12").is_correct());
        assert!(check_answer(&answer, " 12.0 ").is_correct());
        assert!(!check_answer(&answer, "12.5").is_correct());
        assert!(!check_answer(&answer, "13").is_correct());
    }

    #[test]
    fn large_integers_compare_exactly() {
        let answer = Answer::Integer(123_456_789_012_345_678);
        assert!(check_answer(&answer, "123456789012345678").is_correct());
        assert!(!check_answer(&answer, "123456789012345679").is_correct());
    }

    #[test]
    fn unparsable_input_is_incorrect() {
        assert_eq!(
            check_answer(&Answer::Integer(5), "five"),
            AnswerCheck::Incorrect
        );
        assert_eq!(check_answer(&Answer::Real(2.5), "2,5"), AnswerCheck::Incorrect);
    }

    #[test]
    fn real_answers_use_exact_equality() {
        let answer = Answer::Real(2.5);
        assert!(check_answer(&answer, "2.5").is_correct());
        assert!(!check_answer(&answer, "2.50001").is_correct());
    }
}
