//! Special functions needed for truncated-PDF normalizations.
//!
//! The Gaussian density is normalized over a finite observable window, which
//! needs the normal CDF and therefore `erf`. `std` has no `erf`, and pulling in
//! a full special-functions crate for one function is not worth it, so we use
//! the Abramowitz & Stegun 7.1.26 rational approximation. Maximum absolute
//! error is about 1.5e-7, far below the statistical precision of any fit this
//! crate performs.

/// Error function via Abramowitz & Stegun 7.1.26.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal CDF.
pub fn std_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}
