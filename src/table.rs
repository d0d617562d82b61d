use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::model::{Flight, RecoveryPlan};

pub fn format_offset(hours: i32) -> String {
    match hours {
        0 => "no change".to_string(),
        h if h > 0 => format!("+{h}h"),
        h => format!("{h}h"),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn render(plan: &RecoveryPlan) -> String {
    let recs = &plan.recommendations;

    let mut exercise = new_table(vec!["Exercise", "When", "Duration", "Intensity", "Why"]);
    for rec in &recs.exercise {
        let kind = if rec.optional {
            format!("{} (optional)", rec.kind)
        } else {
            rec.kind.clone()
        };
        exercise.add_row(vec![
            kind,
            rec.timing.clone(),
            rec.duration.clone(),
            rec.intensity.to_string(),
            rec.description.clone(),
        ]);
    }

    let mut sleep = new_table(vec!["Sleep", "Advice", "Tip"]);
    for rec in &recs.sleep {
        sleep.add_row(vec![
            rec.title.as_str(),
            rec.description.as_str(),
            rec.additional_info.as_deref().unwrap_or("—"),
        ]);
    }

    let mut light = new_table(vec!["Light", "Action", "Advice"]);
    for rec in &recs.light {
        light.add_row(vec![
            rec.title.clone(),
            rec.action.to_string(),
            rec.description.clone(),
        ]);
    }

    format!(
        "Recovery plan for {} (time offset: {})\n\n{exercise}\n\n{sleep}\n\n{light}",
        plan.route,
        format_offset(plan.time_offset),
    )
}

/// One line per recommendation, `|`-separated.
pub fn render_compact(plan: &RecoveryPlan) -> String {
    let recs = &plan.recommendations;
    let mut lines = vec![format!(
        "{} | offset {}",
        plan.route,
        format_offset(plan.time_offset)
    )];

    for rec in &recs.exercise {
        lines.push(format!(
            "exercise | {} | {} | {} | {}",
            rec.kind, rec.timing, rec.duration, rec.intensity
        ));
    }
    for rec in &recs.sleep {
        lines.push(format!("sleep | {} | {}", rec.title, rec.description));
    }
    for rec in &recs.light {
        lines.push(format!(
            "light | {} | {} | {}",
            rec.title, rec.action, rec.description
        ));
    }

    lines.join("\n")
}

pub fn render_flight(flight: &Flight) -> String {
    let mut table = new_table(vec!["Flight", "", "City", "Airport", "Local time", "Timezone"]);

    for (label, leg) in [("Depart", &flight.departure), ("Arrive", &flight.arrival)] {
        let timezone = if leg.timezone.is_empty() {
            "—"
        } else {
            leg.timezone.as_str()
        };
        table.add_row(vec![
            flight.flight_number.as_str(),
            label,
            leg.city.as_str(),
            leg.airport.as_str(),
            leg.time.as_str(),
            timezone,
        ]);
    }

    table.to_string()
}
