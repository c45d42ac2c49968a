use chrono::{Datelike, NaiveDateTime};

const ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, labelled as `"MMM yyyy"` (e.g. `"Mar 2025"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthLabel {
    year: i32,
    month: u32,
}

impl MonthLabel {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn of(at: &NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(&super::now_local())
    }

    /// Accepts `"Mar 2025"` (month abbreviation is case-insensitive) or `"2025-03"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some((y, m)) = s.split_once('-') {
            if y.len() != 4 || m.len() != 2 {
                return None;
            }
            return Self::new(y.parse().ok()?, m.parse().ok()?);
        }

        let mut parts = s.split_whitespace();
        let name = parts.next()?;
        let year = parts.next()?;
        if parts.next().is_some() || year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month = ABBREVIATIONS
            .iter()
            .position(|abbr| abbr.eq_ignore_ascii_case(name))?;
        Self::new(year.parse().ok()?, month as u32 + 1)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The preceding month; Jan 0001 has none and returns itself.
    pub fn prev(&self) -> Self {
        if self.month == 1 && self.year == 1 {
            *self
        } else if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The following month; Dec 9999 has none and returns itself.
    pub fn next(&self) -> Self {
        if self.month == 12 && self.year == 9999 {
            *self
        } else if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        at.year() == self.year && at.month() == self.month
    }
}

impl std::fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:04}",
            ABBREVIATIONS[(self.month - 1) as usize],
            self.year
        )
    }
}
