//! Renders a snapshot into the per-minute status bundle.
//!
//! Two lines, moon then sun, mirroring what the watchkeeper wants at a
//! glance; sentinel strings stand in wherever a value has no data behind
//! it, and each sentinel names *why* (awaiting fix vs. ephemeris
//! unavailable vs. compute error vs. polar day/night).

use crate::engine::{Snapshot, State};
use crate::lighting::LightingStage;
use pelorus_almanac::{DayReport, EventInstant, HorizonCrossings, MoonPhase, TransitInstant};
use pelorus_core::angle::format_bearing;
use pelorus_core::LocalClock;
use pelorus_ephemeris::Horizontal;

const AWAITING_FIX: &str = "awaiting fix";
const UNAVAILABLE: &str = "ephemeris unavailable";
const COMPUTE_ERROR: &str = "compute error";

/// Renders the full bundle: moon line, sun line, and an optional
/// solar-term reminder line.
pub fn render(snapshot: &Snapshot, clock: &LocalClock) -> Vec<String> {
    let mut lines = vec![moon_line(snapshot, clock), sun_line(snapshot, clock)];
    if let Some(reminder) = &snapshot.reminder {
        lines.push(reminder.clone());
    }
    lines
}

fn moon_line(snapshot: &Snapshot, clock: &LocalClock) -> String {
    let phase = match &snapshot.phase {
        State::Ready(phase) => phase_summary(phase),
        State::Unavailable => UNAVAILABLE.to_string(),
        State::Failed => COMPUTE_ERROR.to_string(),
        State::AwaitingFix => AWAITING_FIX.to_string(),
    };
    let (rise, set, transit) = day_summary(&snapshot.moon_day, clock, "no moonrise", "no moonset");
    let position = position_summary(&snapshot.moon);

    format!(
        "{phase} | moonrise {rise} | moonset {set} | transit {transit} | now {position}"
    )
}

fn sun_line(snapshot: &Snapshot, clock: &LocalClock) -> String {
    let stage = match snapshot.lighting() {
        Some(stage) => stage_summary(stage),
        None => "light stage unknown".to_string(),
    };
    let (rise, set, transit) = day_summary(&snapshot.sun_day, clock, "no sunrise", "no sunset");
    let position = position_summary(&snapshot.sun);

    format!("☀ {stage} | sunrise {rise} | sunset {set} | transit {transit} | now {position}")
}

fn phase_summary(phase: &MoonPhase) -> String {
    format!(
        "{} {} ({}) age {:.1} d ({:.0}%) lit {:.0}%{}",
        phase.bucket.glyph(),
        phase.bucket.name(),
        phase.bucket.lit_side(),
        phase.age_days,
        phase.ratio * 100.0,
        phase.illumination,
        phase.trend.arrow()
    )
}

fn stage_summary(stage: LightingStage) -> String {
    format!("{} ({})", stage.name(), stage.description())
}

fn day_summary(
    state: &State<DayReport>,
    clock: &LocalClock,
    no_rise: &str,
    no_set: &str,
) -> (String, String, String) {
    match state {
        State::Ready(report) => {
            let (rise, set) = match &report.crossings {
                HorizonCrossings::Normal { rise, set } => (
                    crossing_summary(rise.as_ref(), clock, no_rise),
                    crossing_summary(set.as_ref(), clock, no_set),
                ),
                HorizonCrossings::AlwaysUp => {
                    ("polar day".to_string(), "polar day".to_string())
                }
                HorizonCrossings::AlwaysDown => {
                    ("polar night".to_string(), "polar night".to_string())
                }
            };
            (rise, set, transit_summary(&report.transit, clock))
        }
        State::AwaitingFix => three(AWAITING_FIX),
        State::Unavailable => three(UNAVAILABLE),
        State::Failed => three(COMPUTE_ERROR),
    }
}

fn three(sentinel: &str) -> (String, String, String) {
    (
        sentinel.to_string(),
        sentinel.to_string(),
        sentinel.to_string(),
    )
}

fn crossing_summary(event: Option<&EventInstant>, clock: &LocalClock, absent: &str) -> String {
    match event {
        Some(event) => format!(
            "{} az {}",
            clock.to_local(event.time).format("%H:%M:%S"),
            format_bearing(event.azimuth)
        ),
        None => absent.to_string(),
    }
}

fn transit_summary(transit: &TransitInstant, clock: &LocalClock) -> String {
    format!(
        "{} alt {:.1}°",
        clock.to_local(transit.time).format("%H:%M"),
        transit.altitude
    )
}

fn position_summary(state: &State<Horizontal>) -> String {
    match state {
        State::Ready(position) if position.altitude >= 0.0 => {
            format!(
                "alt {:.1}° az {:.1}°",
                position.altitude, position.azimuth
            )
        }
        State::Ready(_) => "below horizon".to_string(),
        State::AwaitingFix => AWAITING_FIX.to_string(),
        State::Unavailable => UNAVAILABLE.to_string(),
        State::Failed => COMPUTE_ERROR.to_string(),
    }
}
