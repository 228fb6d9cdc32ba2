//! Fit parameters and their roles.

/// How the tail-fixing policy is allowed to treat a parameter.
///
/// The role is set at model construction time. This replaces the older
/// convention of tagging always-floating parameters through a name suffix,
/// which was easy to get silently wrong when renaming parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRole {
    /// A shape parameter: may be frozen to its calibrated value before a
    /// downstream fit.
    Fixable,
    /// Floating by design (yields, deliberately free means): never frozen,
    /// regardless of calibration results.
    Floating,
}

/// A named model parameter with its current value and fit state.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub value: f64,
    /// Whether the minimizer varies this parameter.
    pub floating: bool,
    pub role: ParamRole,
    pub lower: f64,
    pub upper: f64,
}

impl Param {
    /// A shape parameter, floating until calibrated and fixed.
    pub fn fixable(name: impl Into<String>, value: f64, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            value,
            floating: true,
            role: ParamRole::Fixable,
            lower,
            upper,
        }
    }

    /// An always-floating parameter (yield or floating-by-design shape).
    pub fn floating(name: impl Into<String>, value: f64, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            value,
            floating: true,
            role: ParamRole::Floating,
            lower,
            upper,
        }
    }

    /// Clamp a proposed value into the parameter's bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }
}
