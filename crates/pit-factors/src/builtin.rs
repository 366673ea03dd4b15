//! Named factors built from the parameterized library.
//!
//! Valuation multiples are [`PositiveDivide`] over market cap; yields and
//! accounting ratios are [`Ratio`]s of latest disclosures; growth factors are
//! [`YoYGrowth`] over one fundamental field.

use crate::{
    columns::ColumnRef,
    growth::{PreviousYear, YoYGrowth},
    registry::FactorCategory,
    size::Size,
    value::{PositiveDivide, Ratio},
    volatility::{AnnualizedVolatility, SimpleBeta},
};

const MARKET_CAP: &str = "mkt_cap_ard";

fn market_cap_over(name: &str, denominator: &str) -> PositiveDivide {
    PositiveDivide::new(
        name,
        ColumnRef::fundamental(MARKET_CAP),
        ColumnRef::fundamental(denominator),
    )
}

fn over_market_cap(name: &str, numerator: &str) -> Ratio {
    ratio(name, FactorCategory::Value, numerator, MARKET_CAP)
}

fn ratio(name: &str, category: FactorCategory, numerator: &str, denominator: &str) -> Ratio {
    Ratio::new(
        name,
        category,
        ColumnRef::fundamental(numerator),
        ColumnRef::fundamental(denominator),
    )
}

fn quality(name: &str, numerator: &str, denominator: &str) -> Ratio {
    ratio(name, FactorCategory::Quality, numerator, denominator)
}

// Valuation

/// Price to earnings: market cap over net profit.
pub fn pe_ratio() -> PositiveDivide {
    market_cap_over("pe_ratio", "net_profit_is")
}

/// Price to operating cash flow.
pub fn pcf_ratio() -> PositiveDivide {
    market_cap_over("pcf_ratio", "net_cash_flows_oper_act")
}

/// Price to sales.
pub fn ps_ratio() -> PositiveDivide {
    market_cap_over("ps_ratio", "tot_oper_rev")
}

/// Price to book.
pub fn pb_ratio() -> PositiveDivide {
    market_cap_over("pb_ratio", "tot_equity")
}

/// Net profit over market cap.
pub fn earnings_yield() -> Ratio {
    over_market_cap("earnings_yield", "net_profit_is")
}

/// Book equity over market cap.
pub fn book_yield() -> Ratio {
    over_market_cap("book_yield", "tot_equity")
}

/// Operating cash flow over market cap.
pub fn cash_flow_yield() -> Ratio {
    over_market_cap("cash_flow_yield", "net_cash_flows_oper_act")
}

/// Operating revenue over market cap.
pub fn sales_yield() -> Ratio {
    over_market_cap("sales_yield", "tot_oper_rev")
}

/// Cash received from sales over market cap.
pub fn cash_yield() -> Ratio {
    over_market_cap("cash_yield", "cash_recp_sg_and_rs")
}

// Solvency

/// Cash over current liabilities.
pub fn cash_ratio() -> Ratio {
    quality("cash_ratio", "monetary_cap", "tot_cur_liab")
}

/// Cash plus receivables over current liabilities.
pub fn quick_ratio() -> Ratio {
    Ratio::sum_over(
        "quick_ratio",
        FactorCategory::Quality,
        vec![
            ColumnRef::fundamental("monetary_cap"),
            ColumnRef::fundamental("acct_rcv"),
        ],
        ColumnRef::fundamental("tot_cur_liab"),
    )
}

/// Current assets over current liabilities.
pub fn current_ratio() -> Ratio {
    quality("current_ratio", "tot_cur_assets", "tot_cur_liab")
}

/// Operating cash flow over current liabilities.
pub fn cash_flow_from_operating_ratio() -> Ratio {
    quality(
        "cash_flow_from_operating_ratio",
        "net_cash_flows_oper_act",
        "tot_cur_liab",
    )
}

// Operating efficiency

/// Revenue over total assets.
pub fn total_asset_turnover() -> Ratio {
    quality("total_asset_turnover", "tot_oper_rev", "tot_assets")
}

/// Revenue over equity.
pub fn equity_turnover() -> Ratio {
    quality("equity_turnover", "tot_oper_rev", "tot_equity")
}

/// Operating cost over inventories.
pub fn inventory_turnover() -> Ratio {
    quality("inventory_turnover", "tot_oper_cost", "inventories")
}

/// Revenue over accounts receivable.
pub fn receivables_turnover() -> Ratio {
    quality("receivables_turnover", "tot_oper_rev", "acct_rcv")
}

// Profitability

/// Operating profit over revenue.
pub fn gross_profit_margin() -> Ratio {
    quality("gross_profit_margin", "opprofit", "tot_oper_rev")
}

/// Net profit over revenue.
pub fn net_profit_margin() -> Ratio {
    quality("net_profit_margin", "net_profit_is", "tot_oper_rev")
}

/// Return on assets.
pub fn roa() -> Ratio {
    quality("roa", "net_profit_is", "tot_assets")
}

/// Return on equity.
pub fn roe() -> Ratio {
    quality("roe", "net_profit_is", "tot_equity")
}

// Financial risk, negated so that less leverage scores higher

/// Negative liabilities over equity.
pub fn debt_to_equity_ratio() -> Ratio {
    quality("debt_to_equity_ratio", "tot_liab", "tot_equity").negated()
}

/// Negative liabilities over assets.
pub fn total_debt_ratio() -> Ratio {
    quality("total_debt_ratio", "tot_liab", "tot_assets").negated()
}

/// Negative assets over equity.
pub fn financial_leverage() -> Ratio {
    quality("financial_leverage", "tot_assets", "tot_equity").negated()
}

// Growth

/// Growth of total assets.
pub fn total_asset_growth() -> YoYGrowth {
    YoYGrowth::new("tot_assets")
}

/// Asset growth under its investment-factor name.
pub fn investment() -> YoYGrowth {
    total_asset_growth().named("investment")
}

/// Growth of total equity.
pub fn total_equity_growth() -> YoYGrowth {
    YoYGrowth::new("tot_equity")
}

/// Growth of operating revenue.
pub fn revenue_growth() -> YoYGrowth {
    YoYGrowth::new("tot_oper_rev")
}

/// Growth of operating profit.
pub fn operating_profit_growth() -> YoYGrowth {
    YoYGrowth::new("opprofit")
}

/// Growth of net profit.
pub fn net_profit_growth() -> YoYGrowth {
    YoYGrowth::new("net_profit_is")
}

/// Growth of operating cash flow.
pub fn cfo_growth() -> YoYGrowth {
    YoYGrowth::new("net_cash_flows_oper_act")
}

/// Growth of basic EPS.
pub fn eps_growth() -> YoYGrowth {
    YoYGrowth::new("eps_basic")
}

/// Net profit disclosed a year before the latest report.
pub fn previous_year_net_profit() -> PreviousYear {
    PreviousYear::new("net_profit_is")
}

// Size and risk

/// Negative log of A-share market cap.
pub fn mkt_cap() -> Size {
    Size::named("mkt_cap", ColumnRef::fundamental("mkt_cap_ashare"))
}

/// Negative log of the close price.
pub fn price() -> Size {
    Size::named("price", ColumnRef::pricing("close"))
}

/// Annualized volatility over 244 days.
pub fn risk() -> AnnualizedVolatility {
    AnnualizedVolatility::default()
}

/// Beta to the benchmark over 244 days.
pub fn beta() -> SimpleBeta {
    SimpleBeta::default()
}
