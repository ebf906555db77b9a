//! Submission validation.
//!
//! [`RecordRequest`] mirrors the JSON body a game client posts. Every field
//! is optional and numbers are carried as `f64` so that a missing field, a
//! fractional value and an out-of-range value each produce their own
//! message. A field of the wrong JSON type reads as missing, so it fails
//! with that field's message too. A request that passes becomes a strongly
//! typed [`Submission`].

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::difficulty::Difficulty;
use crate::error::{CoreError, CoreResult};
use crate::nfc_string;

pub const NAME_MAX_CHARS: usize = 12;
pub const SCORE_MIN: i32 = -999;
pub const SCORE_MAX: i32 = 999;
pub const DURATION_MIN_MS: u32 = 1_000;
pub const DURATION_MAX_MS: u32 = 120_000;

// 2^64: the first integer a `u64` cannot hold.
const CAUGHT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Untrusted game result as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordRequest {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub difficulty: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub duration_ms: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub avg_catch_ms: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub caught: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

/// Reads `T`, or `None` when the value is null or of another type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Value(value)) => Some(value),
        Some(Lenient::Other(IgnoredAny)) | None => None,
    })
}

/// A game result that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub difficulty: Difficulty,
    pub score: i32,
    pub duration_ms: u32,
    pub avg_catch_ms: f64,
    pub caught: u64,
}

/// Outcome of [`validate`]: `message` is set exactly when `valid` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub message: Option<String>,
}

/// Checks a request without converting it.
///
/// Checks run in field order and the first failure wins.
pub fn validate(request: &RecordRequest) -> Validation {
    match Submission::try_from(request) {
        Ok(_) => Validation {
            valid: true,
            message: None,
        },
        Err(e) => Validation {
            valid: false,
            message: Some(e.to_string()),
        },
    }
}

impl TryFrom<&RecordRequest> for Submission {
    type Error = CoreError;

    fn try_from(request: &RecordRequest) -> CoreResult<Self> {
        let name = request
            .name
            .as_deref()
            .map(nfc_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid("name is required (1~12 characters)"))?;
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(invalid("name must be 1~12 characters"));
        }

        let difficulty = request
            .difficulty
            .as_deref()
            .and_then(|d| d.parse::<Difficulty>().ok())
            .ok_or_else(|| invalid("difficulty must be one of: easy, medium, hard"))?;

        let score = integer(request.score).ok_or_else(|| invalid("score must be an integer"))?;
        if score < f64::from(SCORE_MIN) || score > f64::from(SCORE_MAX) {
            return Err(invalid("score must be an integer between -999 and 999"));
        }

        let duration_ms =
            integer(request.duration_ms).ok_or_else(|| invalid("durationMs must be an integer"))?;
        if duration_ms < f64::from(DURATION_MIN_MS) || duration_ms > f64::from(DURATION_MAX_MS) {
            return Err(invalid("durationMs must be between 1000 and 120000"));
        }

        let avg_catch_ms = request
            .avg_catch_ms
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid("avgCatchMs must be a number"))?;
        if avg_catch_ms < 0.0 {
            return Err(invalid("avgCatchMs must be >= 0"));
        }

        let caught = integer(request.caught)
            .filter(|v| *v < CAUGHT_LIMIT)
            .ok_or_else(|| invalid("caught must be an integer"))?;
        if caught < 0.0 {
            return Err(invalid("caught must be >= 0"));
        }

        if caught == 0.0 && avg_catch_ms != 0.0 {
            return Err(invalid("avgCatchMs must be 0 when caught is 0"));
        }

        // Ranges were checked above, so the casts are lossless.
        Ok(Submission {
            name,
            difficulty,
            score: score as i32,
            duration_ms: duration_ms as u32,
            avg_catch_ms,
            caught: caught as u64,
        })
    }
}

fn integer(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && v.fract() == 0.0)
}

fn invalid(message: &str) -> CoreError {
    CoreError::Validation(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RecordRequest {
        RecordRequest {
            name: Some("swatter".to_string()),
            difficulty: Some("easy".to_string()),
            score: Some(42.0),
            duration_ms: Some(30_000.0),
            avg_catch_ms: Some(350.5),
            caught: Some(12.0),
        }
    }

    fn message(request: &RecordRequest) -> Option<String> {
        validate(request).message
    }

    #[test]
    fn accepts_valid_request() {
        let result = validate(&valid_request());
        assert!(result.valid);
        assert!(result.message.is_none());
    }

    #[test]
    fn converts_to_typed_submission() {
        let submission = Submission::try_from(&valid_request()).unwrap();
        assert_eq!(submission.name, "swatter");
        assert_eq!(submission.difficulty, Difficulty::Easy);
        assert_eq!(submission.score, 42);
        assert_eq!(submission.duration_ms, 30_000);
        assert_eq!(submission.caught, 12);
    }

    #[test]
    fn name_length_boundaries() {
        let mut req = valid_request();
        req.name = Some("a".to_string());
        assert!(validate(&req).valid);

        req.name = Some("abcdefghijkl".to_string());
        assert!(validate(&req).valid);

        req.name = Some(String::new());
        assert_eq!(
            message(&req).as_deref(),
            Some("name is required (1~12 characters)")
        );

        req.name = Some("abcdefghijklm".to_string());
        assert_eq!(message(&req).as_deref(), Some("name must be 1~12 characters"));
    }

    #[test]
    fn missing_name_is_required() {
        let mut req = valid_request();
        req.name = None;
        assert_eq!(
            message(&req).as_deref(),
            Some("name is required (1~12 characters)")
        );
    }

    #[test]
    fn name_counts_characters_not_bytes() {
        let mut req = valid_request();
        req.name = Some("파리잡기챔피언왕중왕최고".to_string());
        assert!(validate(&req).valid);

        // Decomposed Hangul (NFD) is composed before counting.
        req.name = Some("\u{1111}\u{1161}\u{1105}\u{1175}".to_string());
        let submission = Submission::try_from(&req).unwrap();
        assert_eq!(submission.name, "파리");
    }

    #[test]
    fn difficulty_must_be_known() {
        let mut req = valid_request();
        req.difficulty = Some("extreme".to_string());
        assert_eq!(
            message(&req).as_deref(),
            Some("difficulty must be one of: easy, medium, hard")
        );

        req.difficulty = None;
        assert!(!validate(&req).valid);
    }

    #[test]
    fn score_boundaries() {
        let mut req = valid_request();
        for ok in [-999.0, 999.0, 0.0] {
            req.score = Some(ok);
            assert!(validate(&req).valid, "score {ok} should be valid");
        }
        for bad in [-1000.0, 1000.0] {
            req.score = Some(bad);
            assert_eq!(
                message(&req).as_deref(),
                Some("score must be an integer between -999 and 999")
            );
        }
    }

    #[test]
    fn score_must_be_integer() {
        let mut req = valid_request();
        req.score = Some(1.5);
        assert_eq!(message(&req).as_deref(), Some("score must be an integer"));

        req.score = None;
        assert_eq!(message(&req).as_deref(), Some("score must be an integer"));
    }

    #[test]
    fn duration_boundaries() {
        let mut req = valid_request();
        for ok in [1_000.0, 120_000.0] {
            req.duration_ms = Some(ok);
            assert!(validate(&req).valid);
        }
        for bad in [999.0, 120_001.0] {
            req.duration_ms = Some(bad);
            assert_eq!(
                message(&req).as_deref(),
                Some("durationMs must be between 1000 and 120000")
            );
        }
        req.duration_ms = Some(1_000.25);
        assert_eq!(message(&req).as_deref(), Some("durationMs must be an integer"));
    }

    #[test]
    fn avg_catch_must_be_non_negative_number() {
        let mut req = valid_request();
        req.avg_catch_ms = None;
        assert_eq!(message(&req).as_deref(), Some("avgCatchMs must be a number"));

        req.avg_catch_ms = Some(-0.1);
        assert_eq!(message(&req).as_deref(), Some("avgCatchMs must be >= 0"));
    }

    #[test]
    fn caught_must_be_non_negative_integer() {
        let mut req = valid_request();
        req.caught = Some(2.5);
        assert_eq!(message(&req).as_deref(), Some("caught must be an integer"));

        req.caught = Some(-1.0);
        assert_eq!(message(&req).as_deref(), Some("caught must be >= 0"));
    }

    #[test]
    fn caught_beyond_u64_is_rejected() {
        let mut req = valid_request();
        req.caught = Some(1e20);
        assert_eq!(message(&req).as_deref(), Some("caught must be an integer"));

        req.caught = Some(9_007_199_254_740_992.0);
        assert_eq!(
            Submission::try_from(&req).unwrap().caught,
            9_007_199_254_740_992
        );
    }

    #[test]
    fn zero_caught_requires_zero_average() {
        let mut req = valid_request();
        req.caught = Some(0.0);
        req.avg_catch_ms = Some(0.0);
        assert!(validate(&req).valid);

        req.avg_catch_ms = Some(5.0);
        assert_eq!(
            message(&req).as_deref(),
            Some("avgCatchMs must be 0 when caught is 0")
        );

        req.caught = Some(3.0);
        assert!(validate(&req).valid);
    }

    #[test]
    fn first_failure_wins() {
        let req = RecordRequest {
            name: Some("abcdefghijklmnop".to_string()),
            difficulty: Some("bogus".to_string()),
            score: Some(5000.0),
            ..RecordRequest::default()
        };
        assert_eq!(message(&req).as_deref(), Some("name must be 1~12 characters"));
    }

    #[test]
    fn deserializes_camel_case_body() {
        let req: RecordRequest = serde_json::from_str(
            r#"{"name":"fly","difficulty":"hard","score":10,"durationMs":5000,"avgCatchMs":0,"caught":0}"#,
        )
        .unwrap();
        assert_eq!(req.duration_ms, Some(5000.0));
        assert!(validate(&req).valid);
    }

    #[test]
    fn wrongly_typed_fields_read_as_missing() {
        let req: RecordRequest = serde_json::from_str(
            r#"{"name":123,"difficulty":2,"score":"10","durationMs":[5000],"avgCatchMs":{},"caught":true}"#,
        )
        .unwrap();
        assert_eq!(req, RecordRequest::default());
    }

    #[test]
    fn string_score_fails_on_score() {
        let req: RecordRequest = serde_json::from_str(
            r#"{"name":"fly","difficulty":"easy","score":"10","durationMs":5000,"avgCatchMs":0,"caught":0}"#,
        )
        .unwrap();
        assert_eq!(message(&req).as_deref(), Some("score must be an integer"));
    }

    #[test]
    fn null_fields_read_as_missing() {
        let req: RecordRequest =
            serde_json::from_str(r#"{"name":null,"score":null}"#).unwrap();
        assert_eq!(req.name, None);
        assert_eq!(req.score, None);
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: RecordRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, RecordRequest::default());
        assert!(!validate(&req).valid);
    }
}
