//! Humanizes a span of virtual or wall-clock seconds the same way the
//! original simulator's `display_time` did, so a seeded run's console
//! output stays stable across re-implementations.

/// `(unit name, seconds per unit)`, largest first. Matches the original
/// interval table exactly, comments included: "centuries" really is a
/// hundred years (`60*60*24*365*10`), and "millennia" a thousand
/// (`60*60*24*365*100`).
const INTERVALS: &[(&str, u64)] = &[
    ("millennia", 31_536_000_000),
    ("centuries", 3_153_600_000),
    ("years", 31_536_000),
    ("weeks", 604_800),
    ("days", 86_400),
    ("hours", 3_600),
    ("minutes", 60),
    ("seconds", 1),
];

/// Renders `seconds` as a comma-joined list of the `granularity` largest
/// non-zero units, e.g. `"2 days, 3 hours, 12 minutes"`. Anything under a
/// second renders as `"< 1 second"` rather than `"0 seconds"`.
pub fn humanize(seconds: f64, granularity: usize) -> String {
    if seconds < 1.0 {
        return "< 1 second".to_string();
    }

    let mut remaining = seconds as u64;
    let mut parts = Vec::new();
    for &(name, unit) in INTERVALS {
        let value = remaining / unit;
        if value == 0 {
            continue;
        }
        remaining -= value * unit;
        let label = if value == 1 { singular(name) } else { name };
        parts.push(format!("{} {}", value, label));
        if parts.len() == granularity {
            break;
        }
    }
    parts.join(", ")
}

fn singular(name: &str) -> &'static str {
    match name {
        "centuries" => "century",
        "millennia" => "millennium",
        "weeks" => "week",
        "days" => "day",
        "hours" => "hour",
        "minutes" => "minute",
        "seconds" => "second",
        "years" => "year",
        _ => unreachable!("all interval names are listed above"),
    }
}
