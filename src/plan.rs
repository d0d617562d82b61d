use tracing::{debug, warn};

use crate::error::PlanError;
use crate::model::{Flight, RecoveryPlan, Recommendations, UserProfile};
use crate::offset::{self, UtcOffset};
use crate::rules::{
    AdviceCatalog, ArrivalWindow, DecisionTable, ShiftBand, DEFAULT_ADVICE, DEFAULT_TABLE,
};

/// What the engine reads off a flight before choosing anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftAnalysis {
    pub departure_offset: Option<UtcOffset>,
    pub arrival_offset: Option<UtcOffset>,
    /// `|arrival - departure|` in fractional hours, `0` unless both offsets parsed.
    pub shift_hours: f64,
    /// Signed hour-component difference shown to the traveler, `0` unless both parsed.
    pub reported_offset: i32,
    pub arrival_hour: Option<u32>,
}

impl ShiftAnalysis {
    pub fn band(&self) -> ShiftBand {
        ShiftBand::from_hours(self.shift_hours)
    }

    pub fn window(&self) -> ArrivalWindow {
        ArrivalWindow::from_hour(self.arrival_hour)
    }

    pub fn offsets_parsed(&self) -> bool {
        self.departure_offset.is_some() && self.arrival_offset.is_some()
    }
}

pub fn analyze(flight: &Flight) -> ShiftAnalysis {
    let departure_offset = offset::parse_offset(&flight.departure.time);
    let arrival_offset = offset::parse_offset(&flight.arrival.time);

    let (shift_hours, reported_offset) = match (departure_offset, arrival_offset) {
        (Some(dep), Some(arr)) => (
            (arr.as_hours() - dep.as_hours()).abs(),
            arr.hour_component() - dep.hour_component(),
        ),
        _ => (0.0, 0),
    };

    ShiftAnalysis {
        departure_offset,
        arrival_offset,
        shift_hours,
        reported_offset,
        arrival_hour: offset::local_hour(&flight.arrival.time),
    }
}

/// Stateless recovery-plan computation over a decision table and an advice
/// catalog. `RecoveryPlanEngine::default()` uses the built-in rules.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPlanEngine<'a> {
    table: &'a DecisionTable,
    advice: &'a AdviceCatalog,
}

impl Default for RecoveryPlanEngine<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_TABLE, &DEFAULT_ADVICE)
    }
}

impl<'a> RecoveryPlanEngine<'a> {
    pub fn new(table: &'a DecisionTable, advice: &'a AdviceCatalog) -> Self {
        Self { table, advice }
    }

    /// Never fails. A leg without a UTC offset plans as a zero shift.
    pub fn compute(&self, flight: &Flight, profile: &UserProfile) -> RecoveryPlan {
        let analysis = analyze(flight);
        if !analysis.offsets_parsed() {
            warn!(
                route = %flight.route(),
                departure = %flight.departure.time,
                arrival = %flight.arrival.time,
                "UTC offset missing, planning with zero time shift"
            );
        }
        self.assemble(flight, profile, &analysis)
    }

    /// Like [`compute`](Self::compute) but refuses a leg without a UTC offset.
    pub fn compute_strict(
        &self,
        flight: &Flight,
        profile: &UserProfile,
    ) -> Result<RecoveryPlan, PlanError> {
        let analysis = analyze(flight);
        if analysis.departure_offset.is_none() {
            return Err(PlanError::MissingOffset {
                leg: "departure",
                timestamp: flight.departure.time.clone(),
            });
        }
        if analysis.arrival_offset.is_none() {
            return Err(PlanError::MissingOffset {
                leg: "arrival",
                timestamp: flight.arrival.time.clone(),
            });
        }
        Ok(self.assemble(flight, profile, &analysis))
    }

    fn assemble(
        &self,
        flight: &Flight,
        profile: &UserProfile,
        analysis: &ShiftAnalysis,
    ) -> RecoveryPlan {
        let band = analysis.band();
        let window = analysis.window();
        let template = self.table.select(band, window);
        let exercise = profile
            .fitness_level
            .adjustment()
            .apply(template.to_recommendation());

        debug!(
            shift_hours = analysis.shift_hours,
            arrival_hour = ?analysis.arrival_hour,
            ?band,
            ?window,
            fitness = %profile.fitness_level,
            exercise = %exercise.kind,
            "selected exercise"
        );

        RecoveryPlan {
            route: flight.route(),
            time_offset: analysis.reported_offset,
            recommendations: Recommendations {
                exercise: vec![exercise],
                sleep: self.advice.sleep_recommendations(),
                light: self.advice.light_recommendations(),
            },
        }
    }
}

pub fn compute(flight: &Flight, profile: &UserProfile) -> RecoveryPlan {
    RecoveryPlanEngine::default().compute(flight, profile)
}
