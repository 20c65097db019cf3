use crate::formula::{Category, Constraint, FormulaSpec};
use crate::units::Dimension::{Area, Length};

pub(super) fn formulas() -> Vec<FormulaSpec> {
    vec![pythagorean()]
}

fn pythagorean() -> FormulaSpec {
    FormulaSpec::new("pythagorean", "Pythagorean Theorem", Category::Math)
        .describe("Sides of a right triangle: a² + b² = c².")
        .variable("a", "side a", Length, "m")
        .variable("b", "side b", Length, "m")
        .variable("c", "hypotenuse", Length, "m")
        .solve("c", "sqrt(a^2 + b^2)", vec![])
        .solve(
            "a",
            "sqrt(c^2 - b^2)",
            vec![Constraint::less("b", "c").with_message("hypotenuse must be the longest side")],
        )
        .solve(
            "b",
            "sqrt(c^2 - a^2)",
            vec![Constraint::less("a", "c").with_message("hypotenuse must be the longest side")],
        )
        .constraint(Constraint::non_negative("a").with_message("sides cannot be negative"))
        .constraint(Constraint::non_negative("b").with_message("sides cannot be negative"))
        .constraint(Constraint::non_negative("c").with_message("sides cannot be negative"))
        .derive("area", "area", Area, "m²", "0.5 * a * b")
        .derive("perimeter", "perimeter", Length, "m", "a + b + c")
}
