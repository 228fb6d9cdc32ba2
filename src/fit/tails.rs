//! Tail fixing: carrying calibrated shape parameters into a downstream fit.
//!
//! Shape parameters (resolution, tail slopes) calibrated on an auxiliary
//! sample are transplanted into the model as fixed inputs before the real
//! data fit, while yields and floating-by-design parameters stay free.

use tracing::{debug, info};

use crate::models::{Model, ParamRole};
use crate::params::ParameterSet;

/// Apply calibrated parameters to a model.
///
/// For every model parameter:
/// - not present in `fitted`: skipped (it belongs to another component of a
///   joint model, or never floated);
/// - [`ParamRole::Floating`]: skipped regardless of `freeze` — these are
///   never fixed;
/// - otherwise: value set to the fitted value, floating flag set to
///   `!freeze`.
///
/// Pure parameter mutation; applying it twice with the same inputs leaves
/// the model in the same state as applying it once.
pub fn fix_tails(model: &mut dyn Model, fitted: &ParameterSet, freeze: bool) {
    info!(freeze, "fixing calibrated shape parameters");

    for param in model.params_mut() {
        let Some(estimate) = fitted.get(&param.name) else {
            debug!(name = %param.name, "skipping parameter not in fit result");
            continue;
        };

        if param.role == ParamRole::Floating {
            debug!(name = %param.name, "not fixing floating-by-design parameter");
            continue;
        }

        param.value = estimate.value;
        param.floating = !freeze;
        info!(name = %param.name, value = estimate.value, fixed = freeze, "parameter set");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gaussian, Observable, Param};

    fn calibrated_set() -> ParameterSet {
        let mut set = ParameterSet::new();
        set.insert("mu", 5299.5, 0.2);
        set.insert("sg", 10.3, 0.15);
        set
    }

    fn model_with_floating_mean() -> Gaussian {
        Gaussian::new(
            Observable::new("mass", 5200.0, 5400.0),
            Param::floating("mu", 5300.0, 5200.0, 5400.0),
            Param::fixable("sg", 15.0, 1.0, 100.0),
        )
    }

    #[test]
    fn freeze_fixes_shape_and_skips_floating_role() {
        let mut model = model_with_floating_mean();
        fix_tails(&mut model, &calibrated_set(), true);

        let params = model.params();
        // mu has the floating role: untouched.
        assert_eq!(params[0].value, 5300.0);
        assert!(params[0].floating);
        // sg is fixable: value applied, frozen.
        assert_eq!(params[1].value, 10.3);
        assert!(!params[1].floating);
    }

    #[test]
    fn release_keeps_parameters_floating_at_calibrated_values() {
        let mut model = model_with_floating_mean();
        fix_tails(&mut model, &calibrated_set(), false);

        let params = model.params();
        assert_eq!(params[1].value, 10.3);
        assert!(params[1].floating);
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let mut once = model_with_floating_mean();
        fix_tails(&mut once, &calibrated_set(), true);

        let mut twice = model_with_floating_mean();
        fix_tails(&mut twice, &calibrated_set(), true);
        fix_tails(&mut twice, &calibrated_set(), true);

        for (a, b) in once.params().iter().zip(twice.params().iter()) {
            assert_eq!(a.value, b.value);
            assert_eq!(a.floating, b.floating);
        }
    }

    #[test]
    fn parameters_missing_from_the_set_are_left_alone() {
        let mut set = ParameterSet::new();
        set.insert("sg", 10.3, 0.15);

        let mut model = Gaussian::new(
            Observable::new("mass", 5200.0, 5400.0),
            Param::fixable("mu", 5310.0, 5200.0, 5400.0),
            Param::fixable("sg", 15.0, 1.0, 100.0),
        );
        fix_tails(&mut model, &set, true);

        let params = model.params();
        assert_eq!(params[0].value, 5310.0);
        assert!(params[0].floating);
        assert!(!params[1].floating);
    }
}
