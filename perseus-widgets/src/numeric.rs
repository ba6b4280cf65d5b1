//! Parsing learner-typed numbers.
//!
//! Answers arrive as raw strings and are matched against the answer forms
//! the exercise allows. Each form parses independently; the first form
//! that accepts the input wins, so the order of `forms_for_answer_type`
//! matters.

/// The shape a typed answer took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Integer,
    Decimal,
    Proper,
    Improper,
    Mixed,
    Percent,
    Pi,
}

/// A successfully parsed answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAnswer {
    pub value: f64,
    pub form: Form,
    /// Whether fraction-shaped input was in lowest terms. Non-fraction
    /// forms are always considered simplified.
    pub simplified: bool,
}

/// The forms each `answerType` accepts, in matching order.
pub fn forms_for_answer_type(answer_type: &str) -> &'static [Form] {
    match answer_type {
        "integer" => &[Form::Integer],
        "decimal" => &[Form::Integer, Form::Decimal],
        "rational" => &[Form::Integer, Form::Proper, Form::Improper, Form::Mixed],
        "improper" => &[Form::Integer, Form::Proper, Form::Improper],
        "mixed" => &[Form::Integer, Form::Proper, Form::Mixed],
        "proper" => &[Form::Integer, Form::Proper],
        "percent" => &[Form::Integer, Form::Decimal, Form::Percent],
        "pi" => &[Form::Pi],
        // "number" accepts everything.
        _ => &[
            Form::Integer,
            Form::Decimal,
            Form::Proper,
            Form::Improper,
            Form::Mixed,
            Form::Percent,
            Form::Pi,
        ],
    }
}

/// Tries each allowed form against the input, in order.
pub fn parse_answer(raw: &str, forms: &[Form]) -> Option<ParsedAnswer> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    forms.iter().find_map(|&form| parse_form(raw, form))
}

fn parse_form(raw: &str, form: Form) -> Option<ParsedAnswer> {
    match form {
        Form::Integer => {
            let value: i64 = raw.parse().ok()?;
            Some(answer(value as f64, form, true))
        }
        Form::Decimal => {
            let value: f64 = raw.parse().ok()?;
            value.is_finite().then(|| answer(value, form, true))
        }
        Form::Proper => {
            let (numerator, denominator) = parse_fraction(raw)?;
            (numerator.unsigned_abs() < denominator).then(|| {
                answer(
                    numerator as f64 / denominator as f64,
                    form,
                    gcd(numerator.unsigned_abs(), denominator) == 1,
                )
            })
        }
        Form::Improper => {
            let (numerator, denominator) = parse_fraction(raw)?;
            (numerator.unsigned_abs() >= denominator).then(|| {
                answer(
                    numerator as f64 / denominator as f64,
                    form,
                    gcd(numerator.unsigned_abs(), denominator) == 1,
                )
            })
        }
        Form::Mixed => {
            let (whole, rest) = raw.split_once(' ')?;
            let whole: i64 = whole.trim().parse().ok()?;
            let (numerator, denominator) = parse_fraction(rest.trim())?;
            if numerator < 0 || numerator.unsigned_abs() >= denominator {
                return None;
            }
            let fraction = numerator as f64 / denominator as f64;
            let value = if whole < 0 {
                whole as f64 - fraction
            } else {
                whole as f64 + fraction
            };
            Some(answer(
                value,
                form,
                gcd(numerator.unsigned_abs(), denominator) == 1,
            ))
        }
        Form::Percent => {
            let digits = raw.strip_suffix('%')?.trim();
            let value: f64 = digits.parse().ok()?;
            value
                .is_finite()
                .then(|| answer(value / 100.0, form, true))
        }
        Form::Pi => parse_pi(raw),
    }
}

fn answer(value: f64, form: Form, simplified: bool) -> ParsedAnswer {
    ParsedAnswer {
        value,
        form,
        simplified,
    }
}

/// `"a/b"` with a nonzero denominator.
fn parse_fraction(raw: &str) -> Option<(i64, u64)> {
    let (numerator, denominator) = raw.split_once('/')?;
    let numerator: i64 = numerator.trim().parse().ok()?;
    let denominator: u64 = denominator.trim().parse().ok()?;
    (denominator != 0).then_some((numerator, denominator))
}

/// Multiples of pi: `pi`, `-pi`, `2 pi`, `2pi`, `1/2 pi`, `2π`.
fn parse_pi(raw: &str) -> Option<ParsedAnswer> {
    let body = raw
        .strip_suffix("pi")
        .or_else(|| raw.strip_suffix('π'))?
        .trim();
    let coefficient = if body.is_empty() {
        1.0
    } else if body == "-" {
        -1.0
    } else if let Some((numerator, denominator)) = parse_fraction(body) {
        numerator as f64 / denominator as f64
    } else {
        body.parse::<f64>().ok().filter(|c| c.is_finite())?
    };
    Some(answer(coefficient * std::f64::consts::PI, Form::Pi, true))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALL: &[Form] = &[
        Form::Integer,
        Form::Decimal,
        Form::Proper,
        Form::Improper,
        Form::Mixed,
        Form::Percent,
        Form::Pi,
    ];

    #[rstest]
    #[case("6", 6.0, Form::Integer)]
    #[case("-3", -3.0, Form::Integer)]
    #[case("0.75", 0.75, Form::Decimal)]
    #[case("5/6", 5.0 / 6.0, Form::Proper)]
    #[case("7/4", 7.0 / 4.0, Form::Improper)]
    #[case("1 3/4", 1.75, Form::Mixed)]
    #[case("50%", 0.5, Form::Percent)]
    fn parses_each_form(#[case] raw: &str, #[case] value: f64, #[case] form: Form) {
        let parsed = parse_answer(raw, ALL).unwrap();
        assert!((parsed.value - value).abs() < 1e-12, "{raw}: {parsed:?}");
        assert_eq!(parsed.form, form);
    }

    #[test]
    fn pi_forms() {
        let parsed = parse_answer("2 pi", &[Form::Pi]).unwrap();
        assert!((parsed.value - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        let parsed = parse_answer("1/2 π", &[Form::Pi]).unwrap();
        assert!((parsed.value - 0.5 * std::f64::consts::PI).abs() < 1e-12);
        assert!(parse_answer("two pi", &[Form::Pi]).is_none());
    }

    #[test]
    fn simplification_detection() {
        assert!(parse_answer("5/6", ALL).unwrap().simplified);
        assert!(!parse_answer("10/12", ALL).unwrap().simplified);
        assert!(!parse_answer("1 2/4", ALL).unwrap().simplified);
    }

    #[test]
    fn forms_restrict_what_parses() {
        assert!(parse_answer("0.75", &[Form::Integer]).is_none());
        assert!(parse_answer("5/6", &[Form::Integer, Form::Decimal]).is_none());
        // A proper form will not swallow an improper fraction.
        assert!(parse_answer("7/4", &[Form::Proper]).is_none());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_answer("", ALL).is_none());
        assert!(parse_answer("  ", ALL).is_none());
        assert!(parse_answer("1/0", ALL).is_none());
        assert!(parse_answer("abc", ALL).is_none());
    }
}
