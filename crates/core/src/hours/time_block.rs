use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Staff member is away inside the block (lunch).
    Break,
    /// Staff member only works inside the block.
    Shift,
}

/// A daily window layered on top of office hours. Start is inclusive, end exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub kind: BlockKind,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TimeBlockError {
    #[error("time block is empty")]
    Empty,
    #[error("time block `{0}` must be written as `start-end`")]
    MissingSeparator(String),
    #[error("unparsable time `{0}` in time block")]
    InvalidTime(String),
    #[error("time block ends at {end} which is not after its start {start}")]
    EndNotAfterStart { start: NaiveTime, end: NaiveTime },
}

impl TimeBlock {
    pub fn parse(raw: &str, lunch: bool) -> Result<Self, TimeBlockError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TimeBlockError::Empty);
        }

        let (start_raw, end_raw) = trimmed
            .split_once(|ch: char| ch == '-' || ch == '\u{2013}')
            .ok_or_else(|| TimeBlockError::MissingSeparator(trimmed.to_string()))?;

        let start = parse_clock(start_raw)
            .ok_or_else(|| TimeBlockError::InvalidTime(start_raw.trim().to_string()))?;
        let end = parse_clock(end_raw)
            .ok_or_else(|| TimeBlockError::InvalidTime(end_raw.trim().to_string()))?;

        if end <= start {
            return Err(TimeBlockError::EndNotAfterStart { start, end });
        }

        let kind = if lunch { BlockKind::Break } else { BlockKind::Shift };
        Ok(Self { start, end, kind })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Whether the block lets the staff member take calls at `time`.
    pub fn permits(&self, time: NaiveTime) -> bool {
        match self.kind {
            BlockKind::Break => !self.contains(time),
            BlockKind::Shift => self.contains(time),
        }
    }
}

/// Parses `HH:MM`, `HHMM`, and 12-hour forms such as `1pm` or `12:30 PM`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let lowered = raw.trim().to_ascii_lowercase();
    if lowered.is_empty() || !lowered.is_ascii() {
        return None;
    }

    let (body, meridiem) = if let Some(body) = lowered.strip_suffix("am") {
        (body.trim_end(), Some(false))
    } else if let Some(body) = lowered.strip_suffix("pm") {
        (body.trim_end(), Some(true))
    } else {
        (lowered.as_str(), None)
    };

    let (hour, minute) = match body.split_once(':') {
        Some((hour, minute)) => (parse_digits(hour, 1, 2)?, parse_digits(minute, 2, 2)?),
        None if body.len() == 4 => {
            (parse_digits(&body[..2], 2, 2)?, parse_digits(&body[2..], 2, 2)?)
        }
        None if meridiem.is_some() => (parse_digits(body, 1, 2)?, 0),
        None => return None,
    };

    let hour = match meridiem {
        None => hour,
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(false) if hour == 12 => 0,
        Some(true) if hour == 12 => 12,
        Some(false) => hour,
        Some(true) => hour + 12,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn parse_digits(raw: &str, min_len: usize, max_len: usize) -> Option<u32> {
    let raw = raw.trim();
    if raw.len() < min_len || raw.len() > max_len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
