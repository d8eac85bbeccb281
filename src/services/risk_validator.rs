use crate::domain::{InputIssue, RiskLimits, RiskViolation, Trade};
use crate::services::DayCalendar;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Decides whether a candidate trade fits inside the configured limits.
///
/// Always works from the full trade list it is handed and never from cached
/// aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskValidator {
    calendar: DayCalendar,
}

impl RiskValidator {
    pub fn new(calendar: DayCalendar) -> Self {
        Self { calendar }
    }

    /// Validate `candidate` against `existing` trades and `limits`.
    ///
    /// `existing` does not need to be filtered; only trades on the candidate's
    /// calendar day count toward the daily limit. The per-trade check runs
    /// first, so a trade breaking both limits reports the per-trade one.
    /// Both comparisons are strict: landing exactly on a limit is allowed.
    pub fn validate(
        &self,
        candidate: &Trade,
        existing: &[Trade],
        limits: &RiskLimits,
    ) -> Result<(), RiskViolation> {
        let risk = candidate.risk_or_zero();
        if risk < Decimal::ZERO {
            return Err(RiskViolation::InvalidInput {
                field: "risk".to_string(),
                issue: InputIssue::Negative,
            });
        }

        if risk > limits.per_trade_limit {
            return Err(RiskViolation::PerTradeLimitExceeded {
                risk,
                limit: limits.per_trade_limit,
            });
        }

        let day = self.calendar.day_of(&candidate.timestamp);
        let todays_risk = self.risk_on_day(existing, day).saturating_add(risk);

        if todays_risk > limits.daily_limit {
            return Err(RiskViolation::DailyLimitExceeded {
                todays_risk,
                limit: limits.daily_limit,
            });
        }

        Ok(())
    }

    /// Sum of risk across `trades` recorded on `day`.
    pub fn risk_on_day(&self, trades: &[Trade], day: NaiveDate) -> Decimal {
        trades
            .iter()
            .filter(|t| self.calendar.is_on(&t.timestamp, day))
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.risk_or_zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTrade;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn limits() -> RiskLimits {
        RiskLimits {
            per_trade_limit: dec!(500),
            daily_limit: dec!(1000),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, hour, 0, 0).unwrap()
    }

    fn trade(risk: Option<Decimal>, timestamp: DateTime<Utc>) -> Trade {
        Trade::from_new("trader-1", timestamp, NewTrade::new(None, risk))
    }

    #[test]
    fn test_accepts_trade_within_limits() {
        let validator = RiskValidator::default();
        let existing = vec![trade(Some(dec!(200)), at(9))];

        let result = validator.validate(&trade(Some(dec!(300)), at(10)), &existing, &limits());

        assert!(result.is_ok());
    }

    #[test]
    fn test_negative_risk_is_invalid_input() {
        let validator = RiskValidator::default();

        let err = validator
            .validate(&trade(Some(dec!(-0.01)), at(10)), &[], &limits())
            .unwrap_err();

        assert_eq!(
            err,
            RiskViolation::InvalidInput {
                field: "risk".to_string(),
                issue: InputIssue::Negative,
            }
        );
    }

    #[test]
    fn test_per_trade_limit_is_inclusive() {
        let validator = RiskValidator::default();

        assert!(validator
            .validate(&trade(Some(dec!(500)), at(10)), &[], &limits())
            .is_ok());

        let err = validator
            .validate(&trade(Some(dec!(500.01)), at(10)), &[], &limits())
            .unwrap_err();
        assert_eq!(
            err,
            RiskViolation::PerTradeLimitExceeded {
                risk: dec!(500.01),
                limit: dec!(500),
            }
        );
    }

    #[test]
    fn test_daily_limit_is_inclusive() {
        // Existing risk 700 + candidate 300 lands exactly on 1000
        let validator = RiskValidator::default();
        let existing = vec![trade(Some(dec!(400)), at(8)), trade(Some(dec!(300)), at(9))];

        assert!(validator
            .validate(&trade(Some(dec!(300)), at(10)), &existing, &limits())
            .is_ok());

        let err = validator
            .validate(&trade(Some(dec!(300.01)), at(10)), &existing, &limits())
            .unwrap_err();
        assert_eq!(
            err,
            RiskViolation::DailyLimitExceeded {
                todays_risk: dec!(1000.01),
                limit: dec!(1000),
            }
        );
    }

    #[test]
    fn test_per_trade_violation_reported_before_daily() {
        let validator = RiskValidator::default();
        let existing = vec![trade(Some(dec!(900)), at(8))];

        let err = validator
            .validate(&trade(Some(dec!(600)), at(10)), &existing, &limits())
            .unwrap_err();

        assert!(matches!(err, RiskViolation::PerTradeLimitExceeded { .. }));
    }

    #[test]
    fn test_other_days_do_not_count() {
        let validator = RiskValidator::default();
        let yesterday = Utc.with_ymd_and_hms(2024, 5, 13, 23, 0, 0).unwrap();
        let existing = vec![trade(Some(dec!(500)), yesterday), trade(Some(dec!(500)), yesterday)];

        assert!(validator
            .validate(&trade(Some(dec!(500)), at(1)), &existing, &limits())
            .is_ok());
    }

    #[test]
    fn test_day_follows_calendar_offset() {
        // 02:00 UTC is still the previous day at UTC-3
        let calendar = DayCalendar::new(FixedOffset::west_opt(3 * 3600).unwrap());
        let validator = RiskValidator::new(calendar);
        let previous_evening = Utc.with_ymd_and_hms(2024, 5, 13, 20, 0, 0).unwrap();
        let existing = vec![trade(Some(dec!(500)), previous_evening)];

        let err = validator
            .validate(&trade(Some(dec!(501)), at(2)), &existing, &RiskLimits {
                per_trade_limit: dec!(1000),
                daily_limit: dec!(1000),
            })
            .unwrap_err();

        assert!(matches!(err, RiskViolation::DailyLimitExceeded { .. }));
    }

    #[test]
    fn test_missing_risk_counts_as_zero() {
        let validator = RiskValidator::default();
        let existing = vec![trade(None, at(8)), trade(Some(dec!(1000)), at(9))];

        assert!(validator.validate(&trade(None, at(10)), &existing, &limits()).is_ok());
    }

    #[test]
    fn test_zero_limits_reject_any_risk() {
        let validator = RiskValidator::default();
        let zero = RiskLimits {
            per_trade_limit: Decimal::ZERO,
            daily_limit: Decimal::ZERO,
        };

        assert!(validator.validate(&trade(Some(dec!(0)), at(10)), &[], &zero).is_ok());
        assert!(matches!(
            validator.validate(&trade(Some(dec!(0.01)), at(10)), &[], &zero),
            Err(RiskViolation::PerTradeLimitExceeded { .. })
        ));
    }
}
