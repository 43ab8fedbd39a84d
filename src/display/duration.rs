//! Utility to display durations

use jobtrace::Duration;
use std::fmt::{self, Display, Formatter};

/// One microsecond, in seconds
const MICROSECOND: Duration = 1e-6;

/// One millisecond, in seconds
const MILLISECOND: Duration = 1e-3;

/// Durations are rounded to the centisecond in hours:minutes:seconds format
const CENTIS_PER_MINUTE: u64 = 60 * 100;
const CENTIS_PER_HOUR: u64 = 60 * CENTIS_PER_MINUTE;
const CENTIS_PER_DAY: u64 = 24 * CENTIS_PER_HOUR;

/// Human-readable display of a duration in seconds
///
/// Short durations are displayed with a unit suffix (`1.23ms`, `4.56s`),
/// longer ones use an hours:minutes:seconds format (`2:03:07.65`), with a day
/// count prefix if needed (`8d 06:02:01.36`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HumanDuration(pub Duration);
//
impl Display for HumanDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let secs = self.0;
        if secs < MILLISECOND {
            return write!(f, "{:.2}µs", secs / MICROSECOND);
        } else if secs < 0.999995 {
            return write!(f, "{:.2}ms", secs / MILLISECOND);
        } else if secs < 59.995 {
            return write!(f, "{secs:.2}s");
        }

        // Round first so that 59.999s shows up as a full minute
        let centis = (secs * 100.0).round() as u64;
        let days = centis / CENTIS_PER_DAY;
        let hours = (centis % CENTIS_PER_DAY) / CENTIS_PER_HOUR;
        let minutes = (centis % CENTIS_PER_HOUR) / CENTIS_PER_MINUTE;
        let seconds = (centis % CENTIS_PER_MINUTE) as f64 / 100.0;
        if days > 0 {
            write!(f, "{days}d {hours:02}:{minutes:02}:{seconds:05.2}")
        } else if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{seconds:05.2}")
        } else {
            write!(f, "{minutes}:{seconds:05.2}")
        }
    }
}
