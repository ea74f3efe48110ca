//! Money-weighted XIRR solver (§4.4.4) and cash-flow sign normalization
//! (§4.4.3).

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::activities::{Activity, ActivityType};

use super::returns_model::CashFlow;

const MAX_ITERATIONS: u32 = 100;
const CONVERGENCE_THRESHOLD: f64 = 1e-7;
const INITIAL_GUESS: f64 = 0.1;

/// Builds the signed external cash-flow stream for a period (§4.4.3).
/// Trading and dividend activities never enter this stream — they are
/// internal reallocations already reflected in `V(date)`.
pub fn external_cash_flows(activities: &[Activity]) -> Vec<CashFlow> {
    activities
        .iter()
        .filter(|a| a.activity_type.is_external_cash_flow())
        .map(|a| {
            let amount = match a.activity_type {
                ActivityType::Deposit => a.amount.abs(),
                ActivityType::Withdrawal => -a.amount.abs(),
                ActivityType::Transfer | ActivityType::Receive => a.amount,
                _ => unreachable!("filtered to external cash flow types above"),
            };
            CashFlow { date: a.activity_date, amount }
        })
        .collect()
}

/// Solves `V_start·(1+r)^((t_end−t_start)/T) + Σ CF_i·(1+r)^((t_end−t_i)/T) − V_end = 0`
/// for `r` via Newton-Raphson from `r = 0.1`. Returns `None` on
/// non-convergence, including the `r = -1` singularity.
pub fn xirr(
    start_date: NaiveDate,
    end_date: NaiveDate,
    start_value: Decimal,
    end_value: Decimal,
    flows: &[CashFlow],
) -> Option<Decimal> {
    let total_days = (end_date - start_date).num_days().max(1) as f64;
    let v_start = start_value.to_f64()?;
    let v_end = end_value.to_f64()?;

    // Exponent for each event is time remaining *to the end* of the period,
    // as a fraction of the period length: the opening value compounds
    // forward to t_end (exponent 1), external flows compound forward from
    // their own date, and V_end itself sits at exponent 0. With no
    // intermediate flows this reduces to V_start·(1+r) = V_end.
    let events: Vec<(f64, f64)> = std::iter::once((1.0, v_start))
        .chain(flows.iter().filter_map(|cf| {
            let remaining = (end_date - cf.date).num_days() as f64;
            let amount = cf.amount.to_f64()?;
            Some((remaining / total_days, amount))
        }))
        .collect();

    let f = |r: f64| -> Option<f64> {
        if r <= -1.0 {
            return None;
        }
        let mut total = -v_end;
        for (t, amount) in &events {
            total += amount * (1.0 + r).powf(*t);
        }
        Some(total)
    };

    let f_prime = |r: f64| -> Option<f64> {
        if r <= -1.0 {
            return None;
        }
        let mut total = 0.0;
        for (t, amount) in &events {
            if *t == 0.0 {
                continue;
            }
            total += amount * t * (1.0 + r).powf(t - 1.0);
        }
        Some(total)
    };

    let mut r = INITIAL_GUESS;
    for _ in 0..MAX_ITERATIONS {
        let fr = f(r)?;
        if fr.abs() < CONVERGENCE_THRESHOLD {
            return Decimal::from_f64_retain(r);
        }
        let fpr = f_prime(r)?;
        if fpr == 0.0 {
            return None;
        }
        let next = r - fr / fpr;
        if next <= -1.0 {
            return None;
        }
        r = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn positive_return_with_mid_period_deposit() {
        let start = d(2024, 1, 1);
        let end = d(2024, 1, 31);
        let flows = vec![CashFlow { date: d(2024, 1, 11), amount: dec!(5000) }];
        let irr = xirr(start, end, dec!(10000), dec!(16000), &flows).expect("should converge");
        assert!(irr > Decimal::ZERO, "expected a positive return, got {irr}");
    }

    #[test]
    fn no_flows_matches_simple_growth_rate() {
        let start = d(2024, 1, 1);
        let end = d(2025, 1, 1);
        let irr = xirr(start, end, dec!(10000), dec!(11000), &[]).expect("should converge");
        // One full year at 10% nominal growth, no intermediate flows.
        assert!((irr.to_f64().unwrap() - 0.10).abs() < 0.01);
    }

    #[test]
    fn sign_rules_match_spec() {
        let activities = vec![
            Activity {
                id: "1".into(),
                account_id: "a".into(),
                security_id: None,
                activity_type: ActivityType::Deposit,
                activity_date: d(2024, 1, 1),
                quantity: None,
                unit_price: None,
                amount: dec!(-100),
                currency: "USD".into(),
                created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            },
            Activity {
                id: "2".into(),
                account_id: "a".into(),
                security_id: None,
                activity_type: ActivityType::Withdrawal,
                activity_date: d(2024, 1, 2),
                quantity: None,
                unit_price: None,
                amount: dec!(50),
                currency: "USD".into(),
                created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            },
        ];
        let flows = external_cash_flows(&activities);
        assert_eq!(flows[0].amount, dec!(100));
        assert_eq!(flows[1].amount, dec!(-50));
    }
}
