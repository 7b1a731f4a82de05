use chrono::{Days, NaiveDate};
use std::fmt;

/// How far ahead of the reference day to look for upcoming dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// A fixed number of days after the reference day (inclusive).
    Days(u64),
    /// Everything from the reference day onward.
    Unbounded,
}
impl Window {
    /// The horizon used when the caller doesn't ask for one, or asks for one we can't understand.
    pub const DEFAULT_DAYS: u64 = 365;

    /// Interprets a window parameter. This never fails: a missing or blank parameter, or one that
    /// isn't a non-negative number, falls back to [`Self::DEFAULT_DAYS`]. The token `all` (in any
    /// case) removes the horizon entirely. Fractional day counts are truncated.
    pub fn from_param(param: Option<&str>) -> Self {
        let Some(param) = param.map(str::trim).filter(|p| !p.is_empty()) else {
            return Self::default();
        };
        if param.eq_ignore_ascii_case("all") {
            return Self::Unbounded;
        }

        match param.parse::<f64>() {
            // This saturates, which is fine, since an absurd horizon will overflow the calendar
            // and be treated as unbounded anyway
            Ok(days) if days.is_finite() && days >= 0.0 => Self::Days(days.trunc() as u64),
            _ => {
                tracing::debug!(param, "unrecognised window, using the default");
                Self::default()
            }
        }
    }

    /// The last day inside this window, for the given reference day. `None` means there's no end.
    pub fn end(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Days(days) => today.checked_add_days(Days::new(*days)),
            Self::Unbounded => None,
        }
    }
}
impl Default for Window {
    fn default() -> Self {
        Self::Days(Self::DEFAULT_DAYS)
    }
}
impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days} days"),
            Self::Unbounded => f.write_str("all"),
        }
    }
}

/// A filter over occurrence dates, keeping those on or after the reference day and on or before
/// the end of the window. The end is worked out once, up front.
#[derive(Debug, Clone, Copy)]
pub struct WindowFilter {
    today: NaiveDate,
    until: Option<NaiveDate>,
}
impl WindowFilter {
    pub fn new(today: NaiveDate, window: Window) -> Self {
        Self {
            today,
            until: window.end(today),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The last day shown, or `None` if the window is unbounded.
    pub fn until(&self) -> Option<NaiveDate> {
        self.until
    }

    /// Checks if the given occurrence falls inside the window (both ends inclusive).
    pub fn matches(&self, occurrence: NaiveDate) -> bool {
        occurrence >= self.today && self.until.is_none_or(|until| occurrence <= until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_window_params() {
        assert_eq!(Window::from_param(None), Window::Days(365));
        assert_eq!(Window::from_param(Some("")), Window::Days(365));
        assert_eq!(Window::from_param(Some("7")), Window::Days(7));
        assert_eq!(Window::from_param(Some(" 30 ")), Window::Days(30));
        assert_eq!(Window::from_param(Some("0")), Window::Days(0));
        assert_eq!(Window::from_param(Some("2.9")), Window::Days(2));
        assert_eq!(Window::from_param(Some("all")), Window::Unbounded);
        assert_eq!(Window::from_param(Some("ALL")), Window::Unbounded);
    }

    #[test]
    fn bad_window_params_fall_back() {
        for param in ["-1", "soon", "NaN", "inf", "7d", "-0.5"] {
            assert_eq!(Window::from_param(Some(param)), Window::Days(365), "{param}");
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let today = ymd(2024, 3, 10);
        let filter = WindowFilter::new(today, Window::Days(7));

        assert_eq!(filter.until(), Some(ymd(2024, 3, 17)));
        assert!(filter.matches(today));
        assert!(filter.matches(ymd(2024, 3, 17)));
        assert!(!filter.matches(ymd(2024, 3, 18)));
        assert!(!filter.matches(ymd(2024, 3, 9)));
    }

    #[test]
    fn zero_day_window_keeps_only_today() {
        let today = ymd(2024, 3, 10);
        let filter = WindowFilter::new(today, Window::Days(0));
        assert!(filter.matches(today));
        assert!(!filter.matches(ymd(2024, 3, 11)));
    }

    #[test]
    fn unbounded_window_has_no_end() {
        let today = ymd(2024, 3, 10);
        let filter = WindowFilter::new(today, Window::Unbounded);
        assert_eq!(filter.until(), None);
        assert!(filter.matches(ymd(2034, 3, 10)));
        assert!(!filter.matches(ymd(2024, 3, 9)));
    }

    #[test]
    fn overflowing_window_is_unbounded() {
        let filter = WindowFilter::new(ymd(2024, 3, 10), Window::from_param(Some("1e300")));
        assert_eq!(filter.until(), None);
    }
}
