//! Score combination and small shared helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::types::PerseusScore;

/// Matches well-formed widget ids of the shape `"<type> <index>"`.
static WIDGET_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9-]*) ([0-9]+)$").unwrap());

/// Splits a widget id into its implied type and occurrence index.
pub fn parse_widget_id(id: &str) -> Option<(&str, u32)> {
    let caps = WIDGET_ID_RE.captures(id)?;
    let type_name = caps.get(1)?.as_str();
    let index = caps.get(2)?.as_str().parse().ok()?;
    Some((type_name, index))
}

/// The identity score: zero points out of zero.
pub fn no_score() -> PerseusScore {
    PerseusScore::Points {
        earned: 0,
        total: 0,
        message: None,
    }
}

/// Whether a widget's score means "no answer given yet".
pub fn score_is_empty(score: &PerseusScore) -> bool {
    matches!(score, PerseusScore::Invalid { message } if message.is_none())
}

/// Message accumulator for [`combine_scores`]: messages survive only when
/// every widget that speaks agrees.
enum MessageMeet {
    Silent,
    Agreed(String),
    Conflict,
}

impl MessageMeet {
    fn meet(&mut self, message: Option<&str>) {
        let Some(message) = message else { return };
        match self {
            MessageMeet::Silent => *self = MessageMeet::Agreed(message.to_string()),
            MessageMeet::Agreed(existing) if existing != message => {
                *self = MessageMeet::Conflict
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<String> {
        match self {
            MessageMeet::Agreed(message) => Some(message),
            _ => None,
        }
    }
}

/// Reduces per-widget scores to one aggregate score.
///
/// Any invalid component makes the whole invalid; otherwise earned and
/// total points sum. Either way the result is independent of the order the
/// scores arrive in.
pub fn combine_scores(scores: impl IntoIterator<Item = PerseusScore>) -> PerseusScore {
    let mut earned = 0u32;
    let mut total = 0u32;
    let mut points_message = MessageMeet::Silent;
    let mut invalid_message = MessageMeet::Silent;
    let mut any_invalid = false;

    for score in scores {
        match score {
            PerseusScore::Points {
                earned: e,
                total: t,
                message,
            } => {
                earned += e;
                total += t;
                points_message.meet(message.as_deref());
            }
            PerseusScore::Invalid { message } => {
                any_invalid = true;
                invalid_message.meet(message.as_deref());
            }
        }
    }

    if any_invalid {
        PerseusScore::Invalid {
            message: invalid_message.finish(),
        }
    } else {
        PerseusScore::Points {
            earned,
            total,
            message: points_message.finish(),
        }
    }
}

/// Shallow object merge: keys from `patch` win. Non-object patches replace
/// the base outright.
pub fn merge_props(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, patch) => patch,
    }
}
