//! Marketing and personal finance calculators

use crate::formula::{Category, Constraint, FormulaSpec};
use crate::units::Dimension::{Count, Currency, Ratio, Time};

pub(super) fn formulas() -> Vec<FormulaSpec> {
    vec![
        cpm(),
        roas(),
        ctr(),
        markup(),
        pay_raise(),
        appreciation(),
        overtime(),
    ]
}

fn cpm() -> FormulaSpec {
    FormulaSpec::new("cpm", "CPM (Cost per Mille)", Category::Finance)
        .describe("Advertising cost per thousand impressions.")
        .variable("spend", "ad spend", Currency, "$")
        .variable("impressions", "impressions", Count, "")
        .variable("cpm", "cost per mille", Currency, "$")
        .solve(
            "cpm",
            "spend / impressions * 1000.0",
            vec![Constraint::denominator("impressions")
                .with_message("impressions must not be zero")],
        )
        .solve("spend", "cpm * impressions / 1000.0", vec![])
        .solve(
            "impressions",
            "spend / cpm * 1000.0",
            vec![Constraint::denominator("cpm").with_message("CPM must not be zero")],
        )
        .constraint(Constraint::non_negative("spend"))
        .constraint(Constraint::non_negative("impressions"))
        .constraint(Constraint::non_negative("cpm"))
}

fn roas() -> FormulaSpec {
    FormulaSpec::new("roas", "ROAS (Return on Ad Spend)", Category::Finance)
        .describe("Revenue earned per unit of advertising spend.")
        .variable("revenue", "revenue", Currency, "$")
        .variable("spend", "ad spend", Currency, "$")
        .variable("roas", "return on ad spend", Ratio, "x")
        .solve(
            "roas",
            "revenue / spend",
            vec![Constraint::denominator("spend").with_message("ad spend must not be zero")],
        )
        .solve("revenue", "roas * spend", vec![])
        .solve(
            "spend",
            "revenue / roas",
            vec![Constraint::denominator("roas").with_message("ROAS must not be zero")],
        )
        .constraint(Constraint::non_negative("revenue"))
        .constraint(Constraint::non_negative("spend"))
        .constraint(Constraint::non_negative("roas"))
        .derive("net", "net return", Currency, "$", "revenue - spend")
}

fn ctr() -> FormulaSpec {
    FormulaSpec::new("ctr", "CTR (Click-Through Rate)", Category::Finance)
        .describe("Share of impressions that resulted in a click.")
        .variable("clicks", "clicks", Count, "")
        .variable("impressions", "impressions", Count, "")
        .variable("ctr", "click-through rate", Ratio, "%")
        .solve(
            "ctr",
            "clicks / impressions",
            vec![Constraint::denominator("impressions")
                .with_message("impressions must not be zero")],
        )
        .solve("clicks", "ctr * impressions", vec![])
        .solve(
            "impressions",
            "clicks / ctr",
            vec![Constraint::denominator("ctr").with_message("CTR must not be zero")],
        )
        .constraint(Constraint::non_negative("clicks"))
        .constraint(Constraint::non_negative("impressions"))
        .constraint(Constraint::non_negative("ctr"))
        .constraint(
            Constraint::at_most("ctr", "1.0").with_message("CTR cannot be above 100%"),
        )
        .constraint(
            Constraint::at_most("clicks", "impressions")
                .with_message("clicks cannot exceed impressions"),
        )
}

fn markup() -> FormulaSpec {
    FormulaSpec::new("markup", "Markup", Category::Finance)
        .describe("Price increase over cost, as a share of cost.")
        .variable("cost", "cost", Currency, "$")
        .variable("price", "selling price", Currency, "$")
        .variable("markup", "markup", Ratio, "%")
        .solve(
            "markup",
            "(price - cost) / cost",
            vec![Constraint::denominator("cost").with_message("cost must not be zero")],
        )
        .solve("price", "cost * (1.0 + markup)", vec![])
        .solve(
            "cost",
            "price / (1.0 + markup)",
            vec![Constraint::denominator("1.0 + markup")
                .with_message("markup must not be -100%")],
        )
        .constraint(Constraint::non_negative("cost"))
        .constraint(Constraint::non_negative("price"))
        .derive("profit", "profit", Currency, "$", "price - cost")
        .derive("margin", "gross margin", Ratio, "%", "(price - cost) / price")
}

fn pay_raise() -> FormulaSpec {
    FormulaSpec::new("pay-raise", "Pay Raise", Category::Finance)
        .describe("New salary from a percentage raise, or the raise from two salaries.")
        .variable("salary", "current salary", Currency, "$")
        .variable("new_salary", "new salary", Currency, "$")
        .variable("raise", "raise", Ratio, "%")
        .solve(
            "raise",
            "(new_salary - salary) / salary",
            vec![Constraint::denominator("salary")
                .with_message("current salary must not be zero")],
        )
        .solve("new_salary", "salary * (1.0 + raise)", vec![])
        .solve(
            "salary",
            "new_salary / (1.0 + raise)",
            vec![Constraint::denominator("1.0 + raise")
                .with_message("raise must not be -100%")],
        )
        .constraint(Constraint::non_negative("salary"))
        .constraint(Constraint::non_negative("new_salary"))
        .derive(
            "raise_amount",
            "raise amount",
            Currency,
            "$",
            "new_salary - salary",
        )
}

fn appreciation() -> FormulaSpec {
    FormulaSpec::new("appreciation", "Appreciation", Category::Finance)
        .describe("Compound annual growth between an initial and a final value.")
        .variable("V0", "initial value", Currency, "$")
        .variable("V1", "final value", Currency, "$")
        .variable("r", "annual rate", Ratio, "%")
        .variable("t", "holding period", Time, "yr")
        .solve(
            "r",
            "(V1 / V0)^(YEAR / t) - 1.0",
            vec![
                Constraint::denominator("V0"),
                Constraint::denominator("t"),
            ],
        )
        .solve("V1", "V0 * (1.0 + r)^(t / YEAR)", vec![])
        .solve(
            "V0",
            "V1 / (1.0 + r)^(t / YEAR)",
            vec![Constraint::denominator("1.0 + r").with_message("rate must not be -100%")],
        )
        .solve(
            "t",
            "YEAR * ln(V1 / V0) / ln(1.0 + r)",
            vec![
                Constraint::denominator("V0"),
                Constraint::denominator("ln(1.0 + r)")
                    .with_message("a zero rate never reaches a different value"),
            ],
        )
        .constraint(Constraint::positive("V0").with_message("initial value must be positive"))
        .constraint(Constraint::positive("V1").with_message("final value must be positive"))
        .constraint(Constraint::positive("t").with_message("holding period must be positive"))
        .constraint(
            Constraint::positive("1.0 + r").with_message("rate must be greater than -100%"),
        )
        .derive("gain", "total gain", Currency, "$", "V1 - V0")
        .derive("change", "total change", Ratio, "%", "(V1 - V0) / V0")
}

/// Rates are per hour; `HOUR` turns the base-unit hours (seconds) back into hours.
fn overtime() -> FormulaSpec {
    FormulaSpec::new("overtime", "Overtime Pay", Category::Finance)
        .describe("Gross pay for regular hours plus overtime at a multiple of the hourly rate.")
        .variable("pay", "total pay", Currency, "$")
        .variable("rate", "hourly rate", Currency, "$")
        .variable("hours", "regular hours", Time, "h")
        .variable("overtime", "overtime hours", Time, "h")
        .variable("multiplier", "overtime multiplier", Ratio, "x")
        .solve("pay", "rate * (hours + multiplier * overtime) / HOUR", vec![])
        .solve(
            "rate",
            "pay * HOUR / (hours + multiplier * overtime)",
            vec![Constraint::denominator("hours + multiplier * overtime")
                .with_message("no hours were worked")],
        )
        .solve(
            "hours",
            "pay * HOUR / rate - multiplier * overtime",
            vec![Constraint::denominator("rate")],
        )
        .solve(
            "overtime",
            "(pay * HOUR / rate - hours) / multiplier",
            vec![
                Constraint::denominator("rate"),
                Constraint::denominator("multiplier"),
            ],
        )
        .solve(
            "multiplier",
            "(pay * HOUR / rate - hours) / overtime",
            vec![
                Constraint::denominator("rate"),
                Constraint::denominator("overtime")
                    .with_message("the multiplier needs overtime hours"),
            ],
        )
        .constraint(Constraint::non_negative("pay").with_message("pay cannot be negative"))
        .constraint(Constraint::positive("rate").with_message("hourly rate must be positive"))
        .constraint(Constraint::non_negative("hours").with_message("hours cannot be negative"))
        .constraint(
            Constraint::non_negative("overtime").with_message("overtime hours cannot be negative"),
        )
        .constraint(
            Constraint::at_most("1.0", "multiplier")
                .with_message("overtime multiplier cannot be below 1"),
        )
        .derive("regular_pay", "regular pay", Currency, "$", "rate * hours / HOUR")
        .derive(
            "overtime_pay",
            "overtime pay",
            Currency,
            "$",
            "rate * multiplier * overtime / HOUR",
        )
}
