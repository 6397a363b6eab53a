//! Basis functions for the piecewise-linear trend.
//!
//! The trend is `k·t + m + Σ δ_j (t - s_j)+` in scaled time, so the only
//! non-trivial basis function is the hinge `(t - s)+`.

/// Affine map from calendar years to the unit interval over the observed span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub origin: f64,
    pub span: f64,
}

impl TimeScale {
    /// Build a scale over `[min, max]`.
    ///
    /// Returns `None` when the span is empty or not finite.
    pub fn fit(min: f64, max: f64) -> Option<Self> {
        let span = max - min;
        if !(min.is_finite() && span.is_finite() && span > 0.0) {
            return None;
        }
        Some(Self { origin: min, span })
    }

    pub fn scale(&self, year: f64) -> f64 {
        (year - self.origin) / self.span
    }
}

/// Hinge `(t - s)+`.
pub fn hinge(t: f64, s: f64) -> f64 {
    (t - s).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_scale_maps_span_to_unit_interval() {
        let ts = TimeScale::fit(2015.0, 2025.0).unwrap();
        assert_eq!(ts.scale(2015.0), 0.0);
        assert_eq!(ts.scale(2025.0), 1.0);
        assert!((ts.scale(2026.0) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn time_scale_rejects_empty_span() {
        assert!(TimeScale::fit(2020.0, 2020.0).is_none());
        assert!(TimeScale::fit(f64::NAN, 2020.0).is_none());
    }

    #[test]
    fn hinge_is_zero_before_knot() {
        assert_eq!(hinge(0.2, 0.5), 0.0);
        assert!((hinge(0.8, 0.5) - 0.3).abs() < 1e-12);
    }
}
