// Author: Dustin Pilgrim
// License: MIT

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Renders a duration in seconds for the idle summary line.
///
/// `SS.ss [s]` under a minute, `MM:SS [m]` under an hour, `HH:MM:SS [h]`
/// under a day and `DD:HH:MM:SS [d]` beyond. Lower units are truncated so
/// `59.999` never prints as `60`.
pub fn format_time(secs: f64) -> String {
    let secs = if secs.is_finite() && secs > 0.0 { secs } else { 0.0 };
    let whole = secs.floor() as u64;

    if whole < MINUTE {
        // Nudge before flooring so 0.29 (stored as 0.28999..) keeps its last digit.
        let centis = ((secs * 100.0 + 1e-6).floor() as u64).min(MINUTE * 100 - 1);
        return format!("{:02}.{:02} [s]", centis / 100, centis % 100);
    }

    let seconds = whole % MINUTE;
    let minutes = (whole / MINUTE) % 60;
    let hours = (whole / HOUR) % 24;
    let days = whole / DAY;

    if whole < HOUR {
        format!("{:02}:{:02} [m]", whole / MINUTE, seconds)
    } else if whole < DAY {
        format!("{:02}:{:02}:{:02} [h]", whole / HOUR, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}:{:02} [d]", days, hours, minutes, seconds)
    }
}
