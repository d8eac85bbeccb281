use crate::domain::{StatsSnapshot, Trade};
use crate::services::DayCalendar;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rolls a set of trades up into dashboard statistics.
///
/// Never fails: missing profit or risk contributes zero. Never reads the
/// clock; the caller decides which day is "today".
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsAggregator {
    calendar: DayCalendar,
}

impl StatsAggregator {
    pub fn new(calendar: DayCalendar) -> Self {
        Self { calendar }
    }

    /// Aggregate `trades`, keeping only those on `day` when one is given.
    /// Without a day the input is taken as already filtered.
    pub fn aggregate(&self, trades: &[Trade], day: Option<NaiveDate>) -> StatsSnapshot {
        let included = trades
            .iter()
            .filter(|t| day.map_or(true, |d| self.calendar.is_on(&t.timestamp, d)));

        let mut snapshot = included.fold(StatsSnapshot::default(), |mut acc, trade| {
            acc.total_trades += 1;
            acc.total_profit = acc.total_profit.saturating_add(trade.profit_or_zero());
            acc.risk_used = acc.risk_used.saturating_add(trade.risk_or_zero());
            if trade.is_win() {
                acc.winning_trades += 1;
            } else if trade.is_loss() {
                acc.losing_trades += 1;
            }
            acc
        });

        snapshot.win_rate = Self::win_rate(snapshot.winning_trades, snapshot.total_trades);
        snapshot
    }

    /// Winning share as a percentage, two decimals, zero for an empty set.
    pub fn win_rate(winning: usize, total: usize) -> Decimal {
        if total == 0 {
            return Decimal::ZERO;
        }

        (Decimal::from(winning) * Decimal::ONE_HUNDRED / Decimal::from(total))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTrade;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn trade(profit: Option<Decimal>, risk: Option<Decimal>, timestamp: DateTime<Utc>) -> Trade {
        Trade::from_new("trader-1", timestamp, NewTrade::new(profit, risk))
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        let snapshot = StatsAggregator::default().aggregate(&[], None);

        assert_eq!(snapshot, StatsSnapshot::default());
        assert_eq!(snapshot.win_rate, Decimal::ZERO);
    }

    #[test]
    fn test_mixed_results() {
        let trades = vec![
            trade(Some(dec!(100)), Some(dec!(50)), at(14, 9)),
            trade(Some(dec!(-40)), Some(dec!(30)), at(14, 10)),
            trade(Some(dec!(0)), Some(dec!(10)), at(14, 11)),
        ];

        let snapshot = StatsAggregator::default().aggregate(&trades, None);

        assert_eq!(snapshot.total_profit, dec!(60));
        assert_eq!(snapshot.total_trades, 3);
        assert_eq!(snapshot.winning_trades, 1);
        assert_eq!(snapshot.losing_trades, 1);
        assert_eq!(snapshot.win_rate, dec!(33.33));
        assert_eq!(snapshot.risk_used, dec!(90));
    }

    #[test]
    fn test_missing_fields_contribute_zero() {
        let trades = vec![
            trade(None, None, at(14, 9)),
            trade(Some(dec!(25)), None, at(14, 10)),
        ];

        let snapshot = StatsAggregator::default().aggregate(&trades, None);

        assert_eq!(snapshot.total_trades, 2);
        assert_eq!(snapshot.total_profit, dec!(25));
        assert_eq!(snapshot.risk_used, Decimal::ZERO);
        assert_eq!(snapshot.win_rate, dec!(50));
    }

    #[test]
    fn test_day_filter() {
        let trades = vec![
            trade(Some(dec!(10)), Some(dec!(5)), at(13, 23)),
            trade(Some(dec!(20)), Some(dec!(5)), at(14, 0)),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();

        let snapshot = StatsAggregator::default().aggregate(&trades, Some(day));

        assert_eq!(snapshot.total_trades, 1);
        assert_eq!(snapshot.total_profit, dec!(20));
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let trades = vec![
            trade(Some(dec!(12.5)), Some(dec!(3)), at(14, 9)),
            trade(Some(dec!(-2.25)), Some(dec!(4)), at(14, 9)),
        ];
        let aggregator = StatsAggregator::default();

        let first = aggregator.aggregate(&trades, None);
        let second = aggregator.aggregate(&trades, None);

        assert_eq!(first, second);
    }

    #[test]
    fn test_win_rate_rounding() {
        assert_eq!(StatsAggregator::win_rate(2, 3), dec!(66.67));
        assert_eq!(StatsAggregator::win_rate(1, 8), dec!(12.5));
        assert_eq!(StatsAggregator::win_rate(0, 4), Decimal::ZERO);
    }
}
