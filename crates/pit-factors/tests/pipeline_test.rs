//! End-to-end evaluation: frame loader, registry and factors together.

use approx::assert_relative_eq;
use chrono::{Days, NaiveDate};
use pit_factors::{
    Asset, ChainPredicates, ColumnRef, ColumnRegistry, Factor, FactorCategory, FactorError,
    FactorRegistry, FrameLoader, InputWindow, Latest, Standardization, WindowLoader,
    extract_window_checked, standardize_frame,
    growth::{PreviousYear, YoYGrowth},
    liquidity::TradingDays,
    momentum::Momentum,
    volatility::MaxReturns,
};
use polars::prelude::*;
use std::sync::Arc;

const DAYS: u64 = 320;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

fn day(i: u64) -> NaiveDate {
    start().checked_add_days(Days::new(i)).unwrap()
}

/// Two assets over 320 consecutive trading days.
///
/// `A` grows 0.1% a day, trades every day and discloses `tot_assets` every 60
/// days (100, 110, 120, ...). `B` is flat, trades every other day and
/// discloses every 120 days.
fn frame() -> DataFrame {
    let mut symbol = Vec::new();
    let mut date = Vec::new();
    let mut close = Vec::new();
    let mut volume = Vec::new();
    let mut assets_value = Vec::new();
    let mut assets_asof = Vec::new();

    for i in 0..DAYS {
        let a_report = i / 60;
        symbol.push("A");
        date.push(day(i).to_string());
        close.push(100.0 * 1.001f64.powi(i as i32));
        volume.push(1000.0);
        assets_value.push(100.0 + 10.0 * a_report as f64);
        assets_asof.push(Some(day(a_report * 60).to_string()));

        let b_report = i / 120;
        symbol.push("B");
        date.push(day(i).to_string());
        close.push(50.0);
        volume.push(if i % 2 == 0 { 500.0 } else { 0.0 });
        assets_value.push(200.0);
        assets_asof.push(Some(day(b_report * 120).to_string()));
    }

    df![
        "symbol" => symbol,
        "date" => date,
        "close" => close,
        "volume" => volume,
        "tot_assets" => assets_value,
        "tot_assets_asof" => assets_asof,
    ]
    .unwrap()
}

fn assets() -> Vec<Asset> {
    vec![
        Asset::new(1u64, "A"),
        Asset::new(2u64, "B"),
        Asset::new(3u64, "C"),
    ]
}

fn today() -> NaiveDate {
    day(DAYS - 1)
}

#[test]
fn test_growth_from_frame() {
    let loader = FrameLoader::new(frame()).unwrap();
    let growth = YoYGrowth::new("tot_assets");

    let inputs = loader.load_inputs(&growth, today(), &assets()).unwrap();
    let out = growth.evaluate(today(), &assets(), &inputs).unwrap();

    // Window covers days 20..=319: six disclosures for A, three for B.
    assert_relative_eq!(out[0], 150.0 / 110.0 - 1.0, epsilon = 1e-12);
    assert!(out[1].is_nan());
    assert!(out[2].is_nan());

    let previous = PreviousYear::new("tot_assets");
    let inputs = loader.load_inputs(&previous, today(), &assets()).unwrap();
    let out = previous.evaluate(today(), &assets(), &inputs).unwrap();
    assert_relative_eq!(out[0], 110.0);
}

#[test]
fn test_loaded_disclosures_are_point_in_time() {
    let loader = FrameLoader::new(frame()).unwrap();
    let column = ColumnRef::asof("tot_assets");

    let (InputWindow::AsOf(asof), InputWindow::Values(values)) = (
        loader.load(&column, today(), &assets(), 300).unwrap(),
        loader
            .load(&ColumnRef::fundamental("tot_assets"), today(), &assets(), 300)
            .unwrap(),
    ) else {
        panic!("unexpected window kinds");
    };

    let series = extract_window_checked(today(), asof.view(), values.view());

    assert_eq!(series.len(), 3);
    assert_eq!(series[0].len(), 6);
    assert_eq!(series[0].dates()[0], day(0));
    assert_eq!(series[0].latest(), Some(150.0));
    assert_eq!(series[1].values(), &[200.0, 200.0, 200.0]);
    assert!(series[2].is_empty());
}

#[test]
fn test_price_factors_from_frame() {
    let loader = FrameLoader::new(frame()).unwrap();
    let assets = assets();

    let momentum = Momentum::default();
    let inputs = loader.load_inputs(&momentum, today(), &assets).unwrap();
    let out = momentum.evaluate(today(), &assets, &inputs).unwrap();
    // Rows 0 and 223 of a 244-day window ending on day 319.
    assert_relative_eq!(out[0], 1.001f64.powi(223) - 1.0, epsilon = 1e-9);
    assert_relative_eq!(out[1], 0.0);

    // Returns are derived from close.
    let max = MaxReturns::default();
    let inputs = loader.load_inputs(&max, today(), &assets).unwrap();
    let out = max.evaluate(today(), &assets, &inputs).unwrap();
    assert_relative_eq!(out[0], 0.001, epsilon = 1e-9);

    let days = TradingDays::default();
    let inputs = loader.load_inputs(&days, today(), &assets).unwrap();
    let out = days.evaluate(today(), &assets, &inputs).unwrap();
    assert_eq!(out.to_vec(), vec![20.0, 10.0, 0.0]);
}

#[test]
fn test_registry_frame() {
    let loader = FrameLoader::new(frame()).unwrap();
    let mut registry = FactorRegistry::new();
    registry.register(Arc::new(YoYGrowth::new("tot_assets")));
    registry.register(Arc::new(Momentum::default()));
    registry.register(Arc::new(TradingDays::default()));

    let df = registry
        .compute_all(&loader, today(), &loader.universe())
        .unwrap();

    assert_eq!(df.shape(), (2, 4));
    let symbols = df.column("symbol").unwrap().str().unwrap();
    assert_eq!(symbols.get(0), Some("A"));
    let growth = df.column("tot_assets_yoy_growth").unwrap().f64().unwrap();
    assert_relative_eq!(growth.get(0).unwrap(), 150.0 / 110.0 - 1.0, epsilon = 1e-12);
    assert!(growth.get(1).unwrap().is_nan());
}

#[test]
fn test_registry_reports_missing_columns() {
    let loader = FrameLoader::new(frame()).unwrap();
    let registry = FactorRegistry::with_defaults();

    assert!(matches!(
        registry.compute("pb_ratio", &loader, today(), &assets()),
        Err(FactorError::MissingColumn(name)) if name == "mkt_cap_ard"
    ));
}

#[test]
fn test_standardized_registry_frame() {
    let loader = FrameLoader::new(frame()).unwrap();
    let mut registry = FactorRegistry::new();
    registry.register(Arc::new(Momentum::default()));
    registry.register(Arc::new(TradingDays::default()));

    let df = registry
        .compute_all(&loader, today(), &loader.universe())
        .unwrap();
    let df = standardize_frame(&df, Standardization::ZScore).unwrap();

    // Two assets: population z-scores are +1 and -1.
    let momentum = df.column("momentum").unwrap().f64().unwrap();
    assert_relative_eq!(momentum.get(0).unwrap(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(momentum.get(1).unwrap(), -1.0, epsilon = 1e-12);
    let days = df.column("trading_days").unwrap().f64().unwrap();
    assert_relative_eq!(days.get(1).unwrap(), -1.0, epsilon = 1e-12);
}

#[test]
fn test_loader_serves_registered_columns_only() {
    let mut df = frame();
    let height = df.height();
    df.with_column(Column::new("dividend".into(), vec![1.5; height]))
        .unwrap();
    let latest = Latest::new(ColumnRef::pricing("dividend"), FactorCategory::Value);

    let loader = FrameLoader::new(df.clone()).unwrap();
    assert!(matches!(
        loader.load_inputs(&latest, today(), &assets()),
        Err(FactorError::UnknownColumn(name)) if name == "dividend"
    ));

    let mut columns = ColumnRegistry::with_defaults();
    columns.add_pricing("dividend");
    let loader = FrameLoader::new(df).unwrap().with_columns(columns);
    let inputs = loader.load_inputs(&latest, today(), &assets()).unwrap();
    let out = latest.evaluate(today(), &assets(), &inputs).unwrap();
    assert_eq!(out[0], 1.5);
    assert!(out[2].is_nan());
}

#[test]
fn test_csv_round_trip() {
    let path = std::env::temp_dir().join(format!("pit-factors-{}.csv", std::process::id()));
    let mut df = frame();
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();

    let loader = FrameLoader::from_csv(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let growth = YoYGrowth::new("tot_assets");
    let inputs = loader.load_inputs(&growth, today(), &assets()).unwrap();
    let out = growth.evaluate(today(), &assets(), &inputs).unwrap();
    assert_relative_eq!(out[0], 150.0 / 110.0 - 1.0, epsilon = 1e-12);
}

#[test]
fn test_default_factor_inputs_are_known_columns() {
    let columns = ColumnRegistry::with_defaults();

    for info in FactorRegistry::with_defaults().all_info() {
        for input in &info.inputs {
            assert!(columns.lookup(input).is_ok(), "{}: {input}", info.name);
        }
    }
}

#[test]
fn test_chain_filtering() {
    let predicates = ChainPredicates::with_defaults();
    let listed = [
        "I2101.XDCE",
        "I2102.XDCE",
        "I2103.XDCE",
        "I2104.XDCE",
        "I2105.XDCE",
        "I2109.XDCE",
    ];

    let chain: Vec<&str> = listed
        .into_iter()
        .filter(|contract| predicates.is_eligible("I", contract).unwrap())
        .collect();

    assert_eq!(chain, ["I2101.XDCE", "I2105.XDCE", "I2109.XDCE"]);
}
