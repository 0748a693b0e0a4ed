#[cfg(test)]
mod tests {
    use crate::ledger::{Lot, SelectionStrategy};
    use chrono::{DateTime, NaiveDateTime, Utc};
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn ts(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    fn lot(date: &str, amount: rust_decimal::Decimal, cost: rust_decimal::Decimal) -> Lot {
        Lot {
            currency: "BTC".to_string(),
            amount,
            cost_basis: cost,
            cost_currency: "USD".to_string(),
            acquired_at: ts(date),
            exchange: "Bitshares".to_string(),
        }
    }

    #[test]
    fn partial_spend_removes_a_proportional_cost_share() {
        let mut lot = lot("2021-01-01 00:00:00", dec!(2), dec!(40000));
        let (spent, cost_removed, remainder) = lot.spend(dec!(0.5));
        assert_eq!(spent, dec!(0.5));
        assert_eq!(cost_removed, dec!(10000));
        assert_eq!(remainder, dec!(0));
        assert_eq!(lot.amount, dec!(1.5));
        assert_eq!(lot.cost_basis, dec!(30000));
        assert!(!lot.is_empty());
    }

    #[test]
    fn overspending_empties_the_lot_and_returns_the_remainder() {
        let mut lot = lot("2021-01-01 00:00:00", dec!(2), dec!(40000));
        let (spent, cost_removed, remainder) = lot.spend(dec!(3));
        assert_eq!(spent, dec!(2));
        assert_eq!(cost_removed, dec!(40000));
        assert_eq!(remainder, dec!(1));
        assert!(lot.is_empty());
        assert_eq!(lot.cost_basis, dec!(0));
    }

    #[test]
    fn unit_price_is_zero_for_an_empty_lot() {
        let full = lot("2021-01-01 00:00:00", dec!(2), dec!(40000));
        assert_eq!(full.unit_price(), dec!(20000));
        let empty = lot("2021-01-01 00:00:00", dec!(0), dec!(0));
        assert_eq!(empty.unit_price(), dec!(0));
    }

    #[test]
    fn strategies_order_lots_for_front_consumption() {
        // Oldest is also the most expensive, so the three strategies
        // disagree about which lot goes first.
        let lots = vec![
            lot("2021-02-01 00:00:00", dec!(1), dec!(20000)),
            lot("2021-01-01 00:00:00", dec!(1), dec!(30000)),
            lot("2021-03-01 00:00:00", dec!(1), dec!(10000)),
        ];

        let mut fifo = lots.clone();
        SelectionStrategy::Fifo.sort_lots(&mut fifo);
        assert_eq!(fifo[0].acquired_at, ts("2021-01-01 00:00:00"));

        let mut lifo = lots.clone();
        SelectionStrategy::Lifo.sort_lots(&mut lifo);
        assert_eq!(lifo[0].acquired_at, ts("2021-03-01 00:00:00"));

        let mut lpfo = lots;
        SelectionStrategy::Lpfo.sort_lots(&mut lpfo);
        assert_eq!(lpfo[0].cost_basis, dec!(10000));
        assert_eq!(lpfo[2].cost_basis, dec!(30000));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!(
            SelectionStrategy::from_str("fifo").unwrap(),
            SelectionStrategy::Fifo
        );
        assert_eq!(
            SelectionStrategy::from_str("LPFO").unwrap(),
            SelectionStrategy::Lpfo
        );
        assert!(SelectionStrategy::from_str("HIFO").is_err());
    }
}
