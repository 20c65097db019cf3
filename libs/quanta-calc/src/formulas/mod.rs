//! Built-in calculator catalogue
//!
//! Every formula here is solvable for each of its variables. Expressions work
//! in base units.

mod electrical;
mod finance;
mod gas_laws;
mod math;
mod physics;

use crate::formula::FormulaSpec;

/// All built-in formulas, unvalidated.
pub fn builtin() -> Vec<FormulaSpec> {
    let mut specs = finance::formulas();
    specs.extend(physics::formulas());
    specs.extend(electrical::formulas());
    specs.extend(gas_laws::formulas());
    specs.extend(math::formulas());
    specs
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_builtin_validates() {
        for spec in builtin() {
            if let Err(e) = spec.validate() {
                panic!("{} failed validation: {}", spec.name, e);
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let specs = builtin();
        let names: HashSet<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), specs.len());
    }

    #[test]
    fn test_catalogue_is_complete() {
        let names: HashSet<_> = builtin().into_iter().map(|s| s.name).collect();
        for expected in [
            "cpm",
            "roas",
            "ctr",
            "markup",
            "pay-raise",
            "appreciation",
            "overtime",
            "capacitor",
            "ohms-law",
            "hookes-law",
            "youngs-modulus",
            "kinetic-energy",
            "photon-energy",
            "rydberg",
            "skin-depth",
            "radar-horizon",
            "horizon-distance",
            "wind-correction",
            "snells-law",
            "work",
            "momentum",
            "density-mass-volume",
            "wavelength-to-frequency",
            "capacitor-energy",
            "capacitive-reactance",
            "inductive-reactance",
            "electrical-power",
            "watts-to-amps",
            "watt-hour",
            "boyles-law",
            "charles-law",
            "gay-lussacs-law",
            "pythagorean",
        ] {
            assert!(names.contains(expected), "missing {}", expected);
        }
        assert_eq!(names.len(), 33);
    }
}
