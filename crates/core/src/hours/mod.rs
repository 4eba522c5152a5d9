pub mod time_block;

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::staff::StaffEntry;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl DayWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self, DomainError> {
        if close <= open {
            return Err(DomainError::InvalidTimeOfDay(format!(
                "{open}-{close} (close must be after open)"
            )));
        }
        Ok(Self { open, close })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.open <= time && time < self.close
    }
}

/// Office opening windows in local wall-clock time, one optional window per weekday.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    windows: [Option<DayWindow>; 7],
    closed_dates: BTreeSet<NaiveDate>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, day: Weekday, window: DayWindow) -> Self {
        self.windows[day.num_days_from_monday() as usize] = Some(window);
        self
    }

    pub fn without_window(mut self, day: Weekday) -> Self {
        self.windows[day.num_days_from_monday() as usize] = None;
        self
    }

    pub fn with_closed_date(mut self, date: NaiveDate) -> Self {
        self.closed_dates.insert(date);
        self
    }

    pub fn window(&self, day: Weekday) -> Option<&DayWindow> {
        self.windows[day.num_days_from_monday() as usize].as_ref()
    }

    pub fn closed_dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.closed_dates.iter()
    }

    pub fn is_open_local(&self, local: NaiveDateTime) -> bool {
        if self.closed_dates.contains(&local.date()) {
            return false;
        }
        self.window(local.weekday()).is_some_and(|window| window.contains(local.time()))
    }
}

/// Open/closed check with the business timezone passed explicitly.
pub fn is_open(schedule: &WeeklySchedule, now: DateTime<Utc>, timezone: Tz) -> bool {
    schedule.is_open_local(now.with_timezone(&timezone).naive_local())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffAvailability {
    Available,
    OfficeClosed,
    OnBreak,
    OutsideShift,
    Inactive,
}

impl StaffAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHoursState {
    pub open: bool,
    pub timezone: Tz,
    pub local_time: NaiveDateTime,
    pub staff: Option<StaffAvailability>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessHours {
    timezone: Tz,
    schedule: WeeklySchedule,
}

impl BusinessHours {
    pub fn new(timezone: Tz, schedule: WeeklySchedule) -> Self {
        Self { timezone, schedule }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.timezone).naive_local()
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        is_open(&self.schedule, now, self.timezone)
    }

    pub fn staff_availability(&self, entry: &StaffEntry, now: DateTime<Utc>) -> StaffAvailability {
        if !entry.active {
            return StaffAvailability::Inactive;
        }
        if !self.is_open(now) {
            return StaffAvailability::OfficeClosed;
        }

        let local = self.local_time(now).time();
        match &entry.time_block {
            Some(block) if !block.permits(local) => match block.kind {
                time_block::BlockKind::Break => StaffAvailability::OnBreak,
                time_block::BlockKind::Shift => StaffAvailability::OutsideShift,
            },
            _ => StaffAvailability::Available,
        }
    }

    pub fn is_staff_available(&self, entry: &StaffEntry, now: DateTime<Utc>) -> bool {
        self.staff_availability(entry, now).is_available()
    }

    pub fn state(&self, now: DateTime<Utc>, entry: Option<&StaffEntry>) -> BusinessHoursState {
        BusinessHoursState {
            open: self.is_open(now),
            timezone: self.timezone,
            local_time: self.local_time(now),
            staff: entry.map(|entry| self.staff_availability(entry, now)),
        }
    }
}

pub fn parse_weekday(raw: &str) -> Result<Weekday, DomainError> {
    raw.trim().parse::<Weekday>().map_err(|_| DomainError::InvalidWeekday(raw.to_string()))
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, DomainError> {
    time_block::parse_clock(raw).ok_or_else(|| DomainError::InvalidTimeOfDay(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
    use chrono_tz::America::New_York;
    use chrono_tz::Tz;

    use super::{is_open, BusinessHours, DayWindow, StaffAvailability, WeeklySchedule};
    use crate::domain::staff::{Assignment, DepartmentId, Extension, StaffEntry};
    use crate::hours::time_block::TimeBlock;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    fn weekdays_nine_to_five() -> WeeklySchedule {
        let window = DayWindow::new(hm(9, 0), hm(17, 0)).expect("valid window");
        [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri]
            .into_iter()
            .fold(WeeklySchedule::new(), |schedule, day| schedule.with_window(day, window))
    }

    fn eastern(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        New_York
            .with_ymd_and_hms(y, m, d, hour, minute, 0)
            .single()
            .expect("unambiguous local time")
            .with_timezone(&Utc)
    }

    fn staff(time_block: Option<TimeBlock>) -> StaffEntry {
        StaffEntry {
            department: DepartmentId::new("CL"),
            name: "Dana Reyes".to_string(),
            assignment: Assignment::parse("A-F").expect("range"),
            pool: None,
            extension: Extension("210".to_string()),
            time_block,
            transferable: true,
            active: true,
        }
    }

    #[test]
    fn weekday_schedule_in_eastern_time() {
        let schedule = weekdays_nine_to_five();

        // 2026-10-14 is a Wednesday, 2026-10-17 a Saturday.
        assert!(is_open(&schedule, eastern(2026, 10, 14, 10, 0), New_York));
        assert!(!is_open(&schedule, eastern(2026, 10, 17, 10, 0), New_York));
        assert!(!is_open(&schedule, eastern(2026, 10, 14, 20, 0), New_York));
    }

    #[test]
    fn comparisons_use_business_timezone_not_utc() {
        let schedule = weekdays_nine_to_five();
        let utc_mid_morning = Utc.with_ymd_and_hms(2026, 10, 14, 12, 30, 0).unwrap();

        assert!(!is_open(&schedule, utc_mid_morning, New_York), "08:30 EDT is before opening");
        assert!(is_open(&schedule, utc_mid_morning, Tz::UTC));
    }

    #[test]
    fn opening_is_inclusive_and_closing_exclusive_across_dst() {
        let schedule = weekdays_nine_to_five();

        // Winter (EST) and summer (EDT) offsets both resolve to local 09:00.
        assert!(is_open(&schedule, eastern(2026, 1, 14, 9, 0), New_York));
        assert!(is_open(&schedule, eastern(2026, 7, 15, 9, 0), New_York));
        assert!(!is_open(&schedule, eastern(2026, 7, 15, 17, 0), New_York));
        assert!(is_open(&schedule, eastern(2026, 7, 15, 16, 59), New_York));
    }

    #[test]
    fn closed_dates_override_weekly_windows() {
        let christmas = NaiveDate::from_ymd_opt(2026, 12, 25).expect("valid date");
        let hours =
            BusinessHours::new(New_York, weekdays_nine_to_five().with_closed_date(christmas));

        assert!(!hours.is_open(eastern(2026, 12, 25, 11, 0)));
        assert!(hours.is_open(eastern(2026, 12, 24, 11, 0)));
    }

    #[test]
    fn lunch_block_makes_staff_unavailable_while_office_is_open() {
        let hours = BusinessHours::new(New_York, weekdays_nine_to_five());
        let lunch = TimeBlock::parse("12:00-13:00", true).expect("valid block");
        let entry = staff(Some(lunch));

        let noon = eastern(2026, 10, 14, 12, 15);
        assert!(hours.is_open(noon));
        assert_eq!(hours.staff_availability(&entry, noon), StaffAvailability::OnBreak);
        assert!(hours.is_staff_available(&entry, eastern(2026, 10, 14, 13, 0)));

        let state = hours.state(noon, Some(&entry));
        assert!(state.open);
        assert_eq!(state.staff, Some(StaffAvailability::OnBreak));
        assert_eq!(state.local_time.time(), hm(12, 15));
    }

    #[test]
    fn shift_block_and_inactive_entries_limit_availability() {
        let hours = BusinessHours::new(New_York, weekdays_nine_to_five());
        let morning_shift = TimeBlock::parse("9:00-13:00", false).expect("valid block");
        let part_timer = staff(Some(morning_shift));

        assert!(hours.is_staff_available(&part_timer, eastern(2026, 10, 14, 10, 0)));
        assert_eq!(
            hours.staff_availability(&part_timer, eastern(2026, 10, 14, 15, 0)),
            StaffAvailability::OutsideShift
        );

        let inactive = StaffEntry { active: false, ..staff(None) };
        assert_eq!(
            hours.staff_availability(&inactive, eastern(2026, 10, 14, 10, 0)),
            StaffAvailability::Inactive
        );
        assert_eq!(
            hours.staff_availability(&staff(None), eastern(2026, 10, 17, 10, 0)),
            StaffAvailability::OfficeClosed
        );
    }

    #[test]
    fn day_window_rejects_close_before_open() {
        assert!(DayWindow::new(hm(17, 0), hm(9, 0)).is_err());
        assert!(DayWindow::new(hm(9, 0), hm(9, 0)).is_err());
    }
}
