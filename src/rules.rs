//! Recommendation rules as plain data: the shift/arrival decision table,
//! fitness adjustments and the fixed sleep and light advice.

use crate::model::{
    ExerciseRecommendation, FitnessLevel, Intensity, LightAction, LightRecommendation,
    SleepRecommendation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftBand {
    /// Up to 2 hours.
    Minor,
    /// Over 2, up to 5 hours.
    Moderate,
    /// Over 5 hours.
    Major,
}

impl ShiftBand {
    pub const ALL: [ShiftBand; 3] = [Self::Minor, Self::Moderate, Self::Major];

    pub fn from_hours(shift_hours: f64) -> Self {
        if shift_hours <= 2.0 {
            Self::Minor
        } else if shift_hours <= 5.0 {
            Self::Moderate
        } else {
            Self::Major
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Minor => 0,
            Self::Moderate => 1,
            Self::Major => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrivalWindow {
    /// 08:00 through 17:59 local.
    Daytime,
    Night,
}

impl ArrivalWindow {
    pub const ALL: [ArrivalWindow; 2] = [Self::Daytime, Self::Night];

    /// An unreadable arrival time counts as night.
    pub fn from_hour(hour: Option<u32>) -> Self {
        match hour {
            Some(h) if (8..=17).contains(&h) => Self::Daytime,
            _ => Self::Night,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Daytime => 0,
            Self::Night => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseTemplate {
    pub kind: &'static str,
    pub timing: &'static str,
    pub duration: &'static str,
    pub intensity: Intensity,
    pub description: &'static str,
}

impl ExerciseTemplate {
    pub fn to_recommendation(&self) -> ExerciseRecommendation {
        ExerciseRecommendation {
            kind: self.kind.to_string(),
            timing: self.timing.to_string(),
            duration: self.duration.to_string(),
            intensity: self.intensity,
            description: self.description.to_string(),
            optional: false,
        }
    }
}

/// Shift band rows crossed with arrival window columns.
#[derive(Debug, Clone)]
pub struct DecisionTable {
    cells: [[ExerciseTemplate; 2]; 3],
}

impl DecisionTable {
    pub const fn new(cells: [[ExerciseTemplate; 2]; 3]) -> Self {
        Self { cells }
    }

    pub fn select(&self, band: ShiftBand, window: ArrivalWindow) -> &ExerciseTemplate {
        &self.cells[band.index()][window.index()]
    }
}

const NEXT_MORNING: &str = "Next day 7:00 AM local";

pub static DEFAULT_TABLE: DecisionTable = DecisionTable::new([
    [
        ExerciseTemplate {
            kind: "Light Walk",
            timing: "1 hour after landing",
            duration: "30 minutes",
            intensity: Intensity::Light,
            description: "Helps reset your body clock with gentle movement",
        },
        ExerciseTemplate {
            kind: "Morning Walk",
            timing: NEXT_MORNING,
            duration: "30 minutes",
            intensity: Intensity::Light,
            description: "Start your day with natural light exposure",
        },
    ],
    [
        ExerciseTemplate {
            kind: "Moderate Jog",
            timing: "2 hours after landing",
            duration: "20-30 minutes",
            intensity: Intensity::Medium,
            description: "Moderate activity to boost circadian adaptation",
        },
        ExerciseTemplate {
            kind: "Morning Yoga",
            timing: NEXT_MORNING,
            duration: "30 minutes",
            intensity: Intensity::Light,
            description: "Gentle stretching to ease into the new time zone",
        },
    ],
    [
        ExerciseTemplate {
            kind: "High-Intensity Training",
            timing: "3 hours after landing",
            duration: "20-30 minutes",
            intensity: Intensity::High,
            description: "Vigorous exercise to strongly signal time zone change",
        },
        ExerciseTemplate {
            kind: "Morning Walk",
            timing: NEXT_MORNING,
            duration: "30 minutes",
            intensity: Intensity::Light,
            description: "Consistent wake-up time is key for adaptation",
        },
    ],
]);

impl Intensity {
    /// One step easier; `Light` stays `Light`.
    pub fn downgraded(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Light,
            Self::Light => Self::Light,
        }
    }
}

pub const BEGINNER_DURATION: &str = "15-20 minutes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FitnessAdjustment {
    pub downgrade_intensity: bool,
    pub duration: Option<&'static str>,
}

impl FitnessAdjustment {
    pub fn apply(&self, mut rec: ExerciseRecommendation) -> ExerciseRecommendation {
        if self.downgrade_intensity {
            rec.intensity = rec.intensity.downgraded();
        }
        if let Some(duration) = self.duration {
            rec.duration = duration.to_string();
        }
        rec
    }
}

impl FitnessLevel {
    pub fn adjustment(self) -> FitnessAdjustment {
        match self {
            Self::Beginner => FitnessAdjustment {
                downgrade_intensity: true,
                duration: Some(BEGINNER_DURATION),
            },
            Self::Intermediate | Self::Advanced | Self::Athlete => FitnessAdjustment::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SleepAdvice {
    pub title: &'static str,
    pub description: &'static str,
    pub additional_info: Option<&'static str>,
}

#[derive(Debug, Clone, Copy)]
pub struct LightAdvice {
    pub title: &'static str,
    pub action: LightAction,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct AdviceCatalog {
    pub sleep: &'static [SleepAdvice],
    pub light: &'static [LightAdvice],
}

impl AdviceCatalog {
    pub fn sleep_recommendations(&self) -> Vec<SleepRecommendation> {
        self.sleep
            .iter()
            .map(|a| SleepRecommendation {
                title: a.title.to_string(),
                description: a.description.to_string(),
                additional_info: a.additional_info.map(String::from),
            })
            .collect()
    }

    pub fn light_recommendations(&self) -> Vec<LightRecommendation> {
        self.light
            .iter()
            .map(|a| LightRecommendation {
                title: a.title.to_string(),
                action: a.action,
                description: a.description.to_string(),
            })
            .collect()
    }
}

static SLEEP_ADVICE: [SleepAdvice; 2] = [
    SleepAdvice {
        title: "Sleep Schedule",
        description: "Aim for bedtime at 10:30 PM local time on arrival night",
        additional_info: Some("Even if tired, consistent wake-up time is key"),
    },
    SleepAdvice {
        title: "Sleep Hygiene",
        description: "Avoid heavy meals 2-3 hours before bed",
        additional_info: Some("Create a calming bedtime routine"),
    },
];

static LIGHT_ADVICE: [LightAdvice; 3] = [
    LightAdvice {
        title: "Arrival Day Morning",
        action: LightAction::SeekLight,
        description: "Get at least 30 minutes of outdoor morning sunlight",
    },
    LightAdvice {
        title: "Evening Routine",
        action: LightAction::AvoidLight,
        description: "Dim lights 1-2 hours before your target bedtime. Limit screen use",
    },
    LightAdvice {
        title: "Follow-up Days",
        action: LightAction::SeekLight,
        description: "Reinforce the new time zone with consistent morning light exposure",
    },
];

pub static DEFAULT_ADVICE: AdviceCatalog = AdviceCatalog {
    sleep: &SLEEP_ADVICE,
    light: &LIGHT_ADVICE,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive_upper() {
        assert_eq!(ShiftBand::from_hours(0.0), ShiftBand::Minor);
        assert_eq!(ShiftBand::from_hours(2.0), ShiftBand::Minor);
        assert_eq!(ShiftBand::from_hours(2.5), ShiftBand::Moderate);
        assert_eq!(ShiftBand::from_hours(5.0), ShiftBand::Moderate);
        assert_eq!(ShiftBand::from_hours(5.25), ShiftBand::Major);
        assert_eq!(ShiftBand::from_hours(14.0), ShiftBand::Major);
    }

    #[test]
    fn window_edges() {
        assert_eq!(ArrivalWindow::from_hour(Some(7)), ArrivalWindow::Night);
        assert_eq!(ArrivalWindow::from_hour(Some(8)), ArrivalWindow::Daytime);
        assert_eq!(ArrivalWindow::from_hour(Some(17)), ArrivalWindow::Daytime);
        assert_eq!(ArrivalWindow::from_hour(Some(18)), ArrivalWindow::Night);
        assert_eq!(ArrivalWindow::from_hour(None), ArrivalWindow::Night);
    }

    #[test]
    fn every_cell_is_mandatory_and_distinct_by_row() {
        for band in ShiftBand::ALL {
            let day = DEFAULT_TABLE.select(band, ArrivalWindow::Daytime);
            let night = DEFAULT_TABLE.select(band, ArrivalWindow::Night);
            assert_ne!(day, night);
            assert!(!day.to_recommendation().optional);
            assert!(!night.to_recommendation().optional);
        }
    }

    #[test]
    fn downgrade_is_one_step() {
        assert_eq!(Intensity::High.downgraded(), Intensity::Medium);
        assert_eq!(Intensity::Medium.downgraded(), Intensity::Light);
        assert_eq!(Intensity::Light.downgraded(), Intensity::Light);
    }

    #[test]
    fn only_beginners_are_adjusted() {
        assert!(FitnessLevel::Beginner.adjustment().downgrade_intensity);
        for level in [
            FitnessLevel::Intermediate,
            FitnessLevel::Advanced,
            FitnessLevel::Athlete,
        ] {
            assert_eq!(level.adjustment(), FitnessAdjustment::default());
        }
    }
}
