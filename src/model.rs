use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// One end of a flight. `time` is the local ISO-8601 timestamp exactly as
/// supplied, offset suffix included; `timezone` is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub city: String,
    pub airport: String,
    pub time: String,
    #[serde(default)]
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_number: String,
    pub departure: Leg,
    pub arrival: Leg,
}

impl Flight {
    /// LX64 Zurich to Miami, a six-hour westward shift landing late afternoon.
    pub fn sample() -> Self {
        Self {
            flight_number: "LX64".into(),
            departure: Leg {
                city: "Zurich".into(),
                airport: "ZRH".into(),
                time: "2025-08-18T13:05:00+02:00".into(),
                timezone: "Europe/Zurich".into(),
            },
            arrival: Leg {
                city: "Miami".into(),
                airport: "MIA".into(),
                time: "2025-08-18T17:30:00-04:00".into(),
                timezone: "America/New_York".into(),
            },
        }
    }

    pub fn route(&self) -> String {
        format!("{}-{}", self.departure.airport, self.arrival.airport)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
    Athlete,
}

impl FitnessLevel {
    pub const ALL: [FitnessLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Athlete,
    ];

    pub fn from_str_loose(s: &str) -> Result<Self, PlanError> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "athlete" => Ok(Self::Athlete),
            _ => Err(PlanError::Validation(format!(
                "invalid fitness level: {s} (expected beginner, intermediate, advanced or athlete)"
            ))),
        }
    }
}

impl std::fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Athlete => "Athlete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub health_conditions: Vec<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, fitness_level: FitnessLevel) -> Self {
        Self {
            id: id.into(),
            fitness_level,
            health_conditions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    Medium,
    High,
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub timing: String,
    pub duration: String,
    pub intensity: Intensity,
    pub description: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecommendation {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightAction {
    #[serde(rename = "Seek Light")]
    SeekLight,
    #[serde(rename = "Avoid Light")]
    AvoidLight,
}

impl std::fmt::Display for LightAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SeekLight => f.write_str("Seek Light"),
            Self::AvoidLight => f.write_str("Avoid Light"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightRecommendation {
    pub title: String,
    pub action: LightAction,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub exercise: Vec<ExerciseRecommendation>,
    pub sleep: Vec<SleepRecommendation>,
    pub light: Vec<LightRecommendation>,
}

/// `time_offset` is the signed difference of the offsets' hour components,
/// not the fractional shift used to pick the exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub route: String,
    pub time_offset: i32,
    pub recommendations: Recommendations,
}

/// `{"flightData": {...}}`, the success body of a flight lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub flight_data: Flight,
}
