//! quanta-calc - Unit-aware formula evaluation
//!
//! Solves closed-form formulas (finance, physics, geometry) for any one of
//! their variables, with inputs and outputs in any unit of the variable's
//! dimension.
//!
//! # Features
//!
//! - **Unit tables**: one static table per dimension, base unit first
//! - **Formulas as data**: variables, one solve branch per variable, domain constraints
//! - **Expression engine**: evalexpr with math functions and physical constants
//! - **Formatter**: fixed or exponential notation, idempotent on its own output
//!
//! # Example
//!
//! ```rust
//! use quanta_calc::{evaluate, Quantity};
//!
//! let result = evaluate(
//!     "cpm",
//!     "cpm",
//!     [
//!         ("spend", Quantity::new(3500.0, "$")),
//!         ("impressions", Quantity::new(250_000.0, "")),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(result.display, "14");
//! assert_eq!(result.steps[0], "cpm = spend / impressions * 1000.0");
//! ```
//!
//! # Built-in Functions
//!
//! | Function | Signature | Description |
//! |----------|-----------|-------------|
//! | `sqrt`, `ln`, `exp` | `f(x)` | Roots and logarithms |
//! | `sin`, `cos`, `tan`, `atan` | `f(x)` | Trigonometry in radians |
//! | `asin`, `acos` | `f(x)` | Argument clamped to [-1, 1] |
//! | `abs` | `abs(x)` | Absolute value |
//! | `min`, `max` | `f(a, b)` | Smaller / larger of two values |
//! | `clamp` | `clamp(x, min, max)` | Limit to range |

pub mod builtin_functions;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod formula;
mod formulas;
pub mod quantity;
pub mod registry;
pub mod units;

pub use engine::CalcEngine;
pub use error::{CalcError, ErrorKind, Result};
pub use evaluator::{evaluate, DerivedResult, EvaluationRequest, EvaluationResult, Evaluator};
pub use format::{format_value, FormatOptions, Formatter};
pub use formula::{Category, Constraint, FormulaSpec, Rule, Variable};
pub use quantity::Quantity;
pub use registry::FormulaRegistry;
pub use units::{convert, Dimension, UnitTable};
