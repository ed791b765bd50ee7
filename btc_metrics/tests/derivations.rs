mod common;

use btc_metrics::MetricsError;
use btc_metrics::derive::{
    self, DIFFICULTY_GROWTH, EX_FEES_VOLUME, HASH_PRICE, HASH_RATE, OBSERVED_LABEL,
    TARGET_HASH_RATE, TARGET_LABEL,
};
use btc_metrics::models::DisplayColumn;
use btc_metrics::models::daily_record::{
    DIFFICULTY_LATEST, HASH_RATE_MEAN, PRICE_USD_CLOSE, REVENUE_FROM_FEES, VOLUME_MINED_SUM,
};
use common::{daily_series, day, series_with};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[test]
fn target_hash_rate_is_difficulty_times_144_over_86400() {
    let series = daily_series(30);
    let target = derive::target_hash_rate(&series).unwrap();
    let difficulty = series.values(DIFFICULTY_LATEST).unwrap();
    for (t, d) in target.values(TARGET_HASH_RATE).unwrap().iter().zip(&difficulty) {
        let (t, d) = (t.unwrap(), d.unwrap());
        assert!(close(t, d * 144.0 / 86_400.0));
    }

    let unit = series_with(&[(DIFFICULTY_LATEST, vec![Some(86_400.0)])]);
    let target = derive::target_hash_rate(&unit).unwrap();
    assert_eq!(target.values(TARGET_HASH_RATE).unwrap(), vec![Some(144.0)]);
}

#[test]
fn comparison_doubles_the_rows() {
    let series = daily_series(7);
    let long = derive::hash_rate_comparison(&series).unwrap();
    assert_eq!(long.len(), 14);
    let rates = long.values(HASH_RATE).unwrap();
    assert_eq!(&rates[7..], series.values(HASH_RATE_MEAN).unwrap().as_slice());

    let labels = long
        .frame()
        .column("rate_type")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|l| l.unwrap().to_string())
        .collect::<Vec<_>>();
    assert!(labels[..7].iter().all(|l| l == TARGET_LABEL));
    assert!(labels[7..].iter().all(|l| l == OBSERVED_LABEL));
}

#[test]
fn zero_fee_share_keeps_mined_volume() {
    let series = series_with(&[
        (VOLUME_MINED_SUM, vec![Some(450.0), Some(900.0), Some(312.5)]),
        (REVENUE_FROM_FEES, vec![Some(0.0); 3]),
    ]);
    let ex = derive::ex_fees_volume(&series).unwrap();
    assert_eq!(
        ex.values(EX_FEES_VOLUME).unwrap(),
        series.values(VOLUME_MINED_SUM).unwrap()
    );
}

#[test]
fn hash_price_follows_the_formula() {
    let series = daily_series(10);
    let price = derive::spot_hash_price(&series).unwrap();
    let v = series.values(VOLUME_MINED_SUM).unwrap();
    let f = series.values(REVENUE_FROM_FEES).unwrap();
    let p = series.values(PRICE_USD_CLOSE).unwrap();
    let h = series.values(HASH_RATE_MEAN).unwrap();
    for (i, got) in price.values(HASH_PRICE).unwrap().into_iter().enumerate() {
        let (v, f, p, h) = (v[i].unwrap(), f[i].unwrap(), p[i].unwrap(), h[i].unwrap());
        let expected = ((v * f / (1.0 - f) + v) * p * 1e15) / h;
        assert_eq!(got, Some(expected));
    }
}

#[test]
fn growth_on_a_linear_ramp() {
    let ramp: Vec<Option<f64>> = (0..30).map(|i| Some(100.0 * (i as f64 + 1.0))).collect();
    let series = series_with(&[(DIFFICULTY_LATEST, ramp)]);
    let growth = derive::difficulty_growth(&series).unwrap();

    assert_eq!(growth.dates().unwrap(), vec![day(14), day(28)]);
    let values = growth.values(DIFFICULTY_GROWTH).unwrap();
    assert!(close(values[0].unwrap(), (1500.0 / 100.0 - 1.0) * 100.0));
    assert!(close(values[1].unwrap(), (2900.0 / 1500.0 - 1.0) * 100.0));
}

#[test]
fn growth_rows_sit_on_multiples_of_14() {
    let series = daily_series(100);
    let growth = derive::difficulty_growth(&series).unwrap();
    let positions: Vec<usize> = growth
        .dates()
        .unwrap()
        .iter()
        .map(|d| series.dates().iter().position(|s| s == d).unwrap())
        .collect();
    assert_eq!(positions, vec![14, 28, 42, 56, 70, 84, 98]);
}

#[test]
fn growth_is_positional_after_filtering() {
    let series = daily_series(60);
    let window = series.filter(day(10), day(59)).unwrap();
    let growth = derive::difficulty_growth(&window).unwrap();
    assert_eq!(growth.dates().unwrap(), vec![day(24), day(38), day(52)]);
}

#[test]
fn unit_views_convert_back_to_raw() {
    let series = daily_series(12);
    let ph = derive::unit_column(&series, &DisplayColumn::HashRatePh).unwrap();
    let th = derive::unit_column(&series, &DisplayColumn::DifficultyTh).unwrap();
    let raw_h = series.values(HASH_RATE_MEAN).unwrap();
    let raw_d = series.values(DIFFICULTY_LATEST).unwrap();

    for (ph, h) in ph.values("hash_rate_ph").unwrap().iter().zip(&raw_h) {
        assert!(close(ph.unwrap() * 1e15, h.unwrap()));
    }
    for (th, d) in th.values("difficulty_th").unwrap().iter().zip(&raw_d) {
        assert!(close(th.unwrap() * 1e12, d.unwrap()));
    }
}

#[test]
fn every_derivation_reports_a_missing_fee_column() {
    let series = series_with(&[
        (VOLUME_MINED_SUM, vec![Some(450.0)]),
        (PRICE_USD_CLOSE, vec![Some(60_000.0)]),
        (HASH_RATE_MEAN, vec![Some(6e20)]),
    ]);
    for result in [
        derive::ex_fees_volume(&series).map(|_| ()),
        derive::spot_hash_price(&series).map(|_| ()),
    ] {
        assert!(matches!(
            result,
            Err(MetricsError::MissingColumn(c)) if c == REVENUE_FROM_FEES
        ));
    }
}

#[test]
fn empty_range_gives_empty_frames_but_no_snapshot() {
    let series = daily_series(30).filter(day(100), day(200)).unwrap();
    assert!(derive::target_hash_rate(&series).unwrap().is_empty());
    assert!(derive::hash_rate_comparison(&series).unwrap().is_empty());
    assert!(derive::spot_hash_price(&series).unwrap().is_empty());
    assert!(derive::difficulty_growth(&series).unwrap().is_empty());
    assert!(matches!(
        derive::latest_snapshot(&series),
        Err(MetricsError::EmptySeries)
    ));
}

#[test]
fn numeric_columns_include_unit_views() {
    let columns = derive::numeric_columns(&daily_series(2));
    assert!(columns.contains(&DisplayColumn::Raw(PRICE_USD_CLOSE.into())));
    assert!(columns.contains(&DisplayColumn::HashRatePh));
    assert!(columns.contains(&DisplayColumn::DifficultyTh));
    assert!(!columns.iter().any(|c| c.name() == "time"));
}
