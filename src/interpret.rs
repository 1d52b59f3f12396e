// (c) Copyright 2025 Strider Contributors
// SPDX-License-Identifier: MIT

//! Translation of free-text route requests into [PreferenceWeights].
//!
//! The translation itself (usually a language model behind some remote API) is not
//! part of this crate. It is injected through the [PreferenceInterpreter] trait,
//! and its output is validated before it can reach a route search.

use serde::{Deserialize, Serialize};

use crate::{PreferenceWeights, WeightsError};

/// Preferences extracted from a free-text request, together with
/// the (optional) explanation provided by the interpreter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpretedPreferences {
    pub preferences: PreferenceWeights,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    /// E.g. "night" for "walk me home tonight".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,

    /// E.g. "shortest" or "flexible".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_preference: Option<String>,
}

/// Turns a natural-language request into preference multipliers.
pub trait PreferenceInterpreter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn interpret(&self, text: &str) -> Result<InterpretedPreferences, Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum InterpretationError {
    #[error("empty route request")]
    EmptyRequest,

    #[error("preference interpreter failed: {0}")]
    Interpreter(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("interpreter returned invalid weights: {0}")]
    InvalidWeights(#[from] WeightsError),
}

/// Runs an [PreferenceInterpreter] over `text`, returning weights which are
/// guaranteed to pass [PreferenceWeights::validate].
pub fn interpret_preferences<I: PreferenceInterpreter + ?Sized>(
    interpreter: &I,
    text: &str,
) -> Result<InterpretedPreferences, InterpretationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InterpretationError::EmptyRequest);
    }

    let interpreted = interpreter
        .interpret(text)
        .map_err(|e| InterpretationError::Interpreter(Box::new(e)))?;
    interpreted.preferences.validate()?;

    log::debug!(
        target: "strider::interpret",
        "{:?} interpreted as {:?}",
        text,
        interpreted.preferences,
    );
    Ok(interpreted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Dimension;
    use crate::RoadType;

    /// Keyword matcher standing in for a real language model.
    struct Keywords;

    #[derive(Debug, thiserror::Error)]
    #[error("interpreter offline")]
    struct Offline;

    impl PreferenceInterpreter for Keywords {
        type Error = Offline;

        fn interpret(&self, text: &str) -> Result<InterpretedPreferences, Self::Error> {
            if text == "offline" {
                return Err(Offline);
            }

            let mut out = InterpretedPreferences::default();
            if text.contains("dark") {
                out.preferences.set(Dimension::Unlit, 5.0);
                out.time_of_day = Some("night".to_string());
            }
            if text.contains("busy") {
                out.preferences.set(Dimension::RoadType(RoadType::Primary), 10.0);
            }
            if text.contains("pretty") {
                out.preferences.set(Dimension::Scenic, 0.3);
            }
            if text.contains("broken") {
                out.preferences.set(Dimension::Scenic, 0.0);
            }
            Ok(out)
        }
    }

    #[test]
    fn interprets_request() {
        let got = interpret_preferences(&Keywords, "  avoid dark and busy streets ").unwrap();
        assert_eq!(
            got.preferences,
            PreferenceWeights::default()
                .with_unlit(5.0)
                .with_road_type(RoadType::Primary, 10.0)
        );
        assert_eq!(got.time_of_day.as_deref(), Some("night"));
    }

    #[test]
    fn empty_request() {
        assert!(matches!(
            interpret_preferences(&Keywords, "   "),
            Err(InterpretationError::EmptyRequest)
        ));
    }

    #[test]
    fn interpreter_failure() {
        let err = interpret_preferences(&Keywords, "offline").unwrap_err();
        assert!(matches!(err, InterpretationError::Interpreter(_)));
        assert_eq!(err.to_string(), "preference interpreter failed: interpreter offline");
    }

    #[test]
    fn invalid_weights_are_rejected() {
        assert!(matches!(
            interpret_preferences(&Keywords, "a pretty but broken route"),
            Err(InterpretationError::InvalidWeights(WeightsError::NonPositive {
                dimension: Dimension::Scenic,
                ..
            }))
        ));
    }

    #[test]
    fn parse_interpreter_output() {
        let got: InterpretedPreferences = serde_json::from_str(
            r#"{
                "preferences": {"footway": 0.5, "unlit": 3.0},
                "reasoning": "User wants a safe walking route",
                "distance_preference": "flexible"
            }"#,
        )
        .unwrap();
        assert_eq!(got.preferences.get(Dimension::Unlit), Some(3.0));
        assert_eq!(
            got.preferences.get(Dimension::RoadType(RoadType::Footway)),
            Some(0.5)
        );
        assert_eq!(got.time_of_day, None);
        assert_eq!(got.distance_preference.as_deref(), Some("flexible"));
    }

    #[test]
    fn generic_road_classes_are_neutral() {
        struct Canned;

        impl PreferenceInterpreter for Canned {
            type Error = serde_json::Error;

            fn interpret(&self, _: &str) -> Result<InterpretedPreferences, Self::Error> {
                serde_json::from_str(
                    r#"{
                        "preferences": {"highway": 10.0, "scenic": 0.5, "unlit": 2.0},
                        "reasoning": "User wants a 5km scenic night run, avoiding major roads",
                        "time_of_day": "night",
                        "distance_preference": "5km"
                    }"#,
                )
            }
        }

        let got = interpret_preferences(&Canned, "scenic night run avoiding highways, about 5km")
            .unwrap();
        assert_eq!(
            got.preferences.iter().collect::<Vec<_>>(),
            vec![(Dimension::Unlit, 2.0), (Dimension::Scenic, 0.5)]
        );
        assert_eq!(got.preferences.unmatched().collect::<Vec<_>>(), vec![("highway", 10.0)]);
        assert_eq!(got.time_of_day.as_deref(), Some("night"));
        assert_eq!(got.distance_preference.as_deref(), Some("5km"));
    }

    #[test]
    fn unmatched_keys_must_still_be_positive() {
        struct Canned;

        impl PreferenceInterpreter for Canned {
            type Error = serde_json::Error;

            fn interpret(&self, _: &str) -> Result<InterpretedPreferences, Self::Error> {
                serde_json::from_str(r#"{"preferences": {"highway": 0.0}}"#)
            }
        }

        assert!(matches!(
            interpret_preferences(&Canned, "anything"),
            Err(InterpretationError::InvalidWeights(
                WeightsError::NonPositiveUnmatched { .. }
            ))
        ));
    }
}
