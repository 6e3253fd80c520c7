//! Human-readable durations.

/// Format a duration in minutes for display.
///
/// Rounds to the nearest whole minute. Hours are shown once the duration
/// reaches 60 minutes, e.g. `"45 mins"`, `"1 hr"`, `"2 hrs 1 min"`.
/// Negative or non-finite input formats as `"0 mins"`.
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return plural(0, "min");
    }

    let total = minutes.round() as u64;
    let hours = total / 60;
    let mins = total % 60;

    match (hours, mins) {
        (0, m) => plural(m, "min"),
        (h, 0) => plural(h, "hr"),
        (h, m) => format!("{} {}", plural(h, "hr"), plural(m, "min")),
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
