use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Groups timestamps into calendar days under a single UTC offset.
///
/// Both the risk validator and the stats aggregator hold the same calendar so
/// "today" means one thing for limits and for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    offset: FixedOffset,
}

impl DayCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Calendar using the host's current local offset.
    pub fn local() -> Self {
        Self::new(*Local::now().offset())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day of `timestamp` under this calendar's offset.
    pub fn day_of(&self, timestamp: &DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.offset).date_naive()
    }

    pub fn same_day(&self, a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }

    pub fn is_on(&self, timestamp: &DateTime<Utc>, day: NaiveDate) -> bool {
        self.day_of(timestamp) == day
    }
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sao_paulo() -> DayCalendar {
        DayCalendar::new(FixedOffset::west_opt(3 * 3600).unwrap())
    }

    #[test]
    fn test_same_day_across_midnight_is_false() {
        // 23:30 and 00:30 local, one hour apart
        let calendar = sao_paulo();
        let late = Utc.with_ymd_and_hms(2024, 3, 11, 2, 30, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 11, 3, 30, 0).unwrap();

        assert!(!calendar.same_day(&late, &early));
    }

    #[test]
    fn test_same_day_uses_offset_not_utc_date() {
        // Different UTC dates, same local date
        let calendar = sao_paulo();
        let morning = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 11, 1, 0, 0).unwrap();

        assert!(calendar.same_day(&morning, &night));
        assert_eq!(
            calendar.day_of(&night),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_utc_calendar() {
        let calendar = DayCalendar::utc();
        let a = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();

        assert!(calendar.same_day(&a, &b));
        assert!(calendar.is_on(&a, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()));
    }
}
