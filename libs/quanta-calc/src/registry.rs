//! Formula registry
//!
//! Name-indexed set of validated [`FormulaSpec`]s. The built-in catalogue is
//! assembled once per process and shared; callers that add custom formulas
//! work on an owned copy from [`FormulaRegistry::with_builtins`].

use crate::error::{CalcError, Result};
use crate::formula::{Category, FormulaSpec};
use crate::formulas;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, error};

static BUILTIN: LazyLock<FormulaRegistry> = LazyLock::new(|| {
    let mut registry = FormulaRegistry::new();
    for spec in formulas::builtin() {
        let name = spec.name.clone();
        if let Err(e) = registry.register(spec) {
            error!("Built-in formula {} rejected: {}", name, e);
        }
    }
    debug!(count = registry.len(), "built-in formulas registered");
    registry
});

/// Page slugs carry this suffix (`cpm-calculator`)
const PAGE_SUFFIX: &str = "-calculator";

fn normalize(name: &str) -> String {
    let key = name.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    match key.strip_suffix(PAGE_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => key,
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormulaRegistry {
    formulas: BTreeMap<String, FormulaSpec>,
}

impl FormulaRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared built-in catalogue
    pub fn builtin() -> &'static FormulaRegistry {
        &BUILTIN
    }

    /// Owned copy of the built-in catalogue, open for registration
    pub fn with_builtins() -> Self {
        Self::builtin().clone()
    }

    /// Validate and add a formula. Names are unique.
    pub fn register(&mut self, spec: FormulaSpec) -> Result<()> {
        spec.validate()?;
        let key = normalize(&spec.name);
        if self.formulas.contains_key(&key) {
            return Err(CalcError::invalid_formula(
                &spec.name,
                "a formula with this name is already registered",
            ));
        }
        self.formulas.insert(key, spec);
        Ok(())
    }

    /// Look up by name, ignoring case and a trailing `-calculator`
    pub fn get(&self, name: &str) -> Result<&FormulaSpec> {
        self.formulas
            .get(&normalize(name))
            .ok_or_else(|| CalcError::unknown_formula(name.trim()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formulas.contains_key(&normalize(name))
    }

    /// All formulas in name order
    pub fn iter(&self) -> impl Iterator<Item = &FormulaSpec> {
        self.formulas.values()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &FormulaSpec> {
        self.iter().filter(move |spec| spec.category == category)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|spec| spec.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::formula::Constraint;
    use crate::units::Dimension;

    fn density() -> FormulaSpec {
        FormulaSpec::new("density", "Density", Category::Custom)
            .variable("m", "mass", Dimension::Mass, "kg")
            .variable("n", "count", Dimension::Count, "")
            .variable("per", "mass per item", Dimension::Mass, "kg")
            .solve("per", "m / n", vec![Constraint::denominator("n")])
            .solve("m", "per * n", vec![])
            .solve("n", "m / per", vec![Constraint::denominator("per")])
    }

    #[test]
    fn test_builtin_is_shared_and_populated() {
        let a = FormulaRegistry::builtin();
        let b = FormulaRegistry::builtin();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.len(), formulas::builtin().len());
    }

    #[test]
    fn test_lookup_is_lenient() {
        let registry = FormulaRegistry::builtin();
        assert_eq!(registry.get("CPM").unwrap().name, "cpm");
        assert_eq!(registry.get("ohms-law-calculator").unwrap().name, "ohms-law");
        assert_eq!(registry.get(" Pay_Raise ").unwrap().name, "pay-raise");
        assert!(registry.contains("skin depth"));
    }

    #[test]
    fn test_unknown_formula() {
        let err = FormulaRegistry::builtin().get("warp-drive").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownFormula);
        assert_eq!(err.to_string(), "Unknown formula: warp-drive");
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = FormulaRegistry::new();
        registry.register(density()).unwrap();
        let err = registry.register(density()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormula);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_invalid() {
        let mut registry = FormulaRegistry::new();
        let mut spec = density();
        spec.solve.remove("n");
        assert!(registry.register(spec).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_with_builtins_does_not_touch_shared_copy() {
        let mut registry = FormulaRegistry::with_builtins();
        registry.register(density()).unwrap();
        assert!(registry.contains("density"));
        assert!(!FormulaRegistry::builtin().contains("density"));
    }

    #[test]
    fn test_iteration_order_and_categories() {
        let registry = FormulaRegistry::builtin();
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);

        let finance: Vec<_> = registry
            .by_category(Category::Finance)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            finance,
            vec!["appreciation", "cpm", "ctr", "markup", "overtime", "pay-raise", "roas"]
        );
        assert_eq!(registry.by_category(Category::Math).count(), 1);
    }
}
