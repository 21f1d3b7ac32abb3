//! # Settings
//!
//! Parameters of the exact LP that stay fixed between solves.
use crate::interface::Pricing;

/// Methods to certify a dual bound without solving the LP exactly.
///
/// These are only carried along: the exact LP reports them to the caller, which decides how to
/// recover when a certificate turns out to be invalid.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BoundCertification {
    /// Project an approximate dual solution onto the dual feasible set and shift it.
    pub project_and_shift: bool,
    /// Shift the bounds of an approximate dual solution.
    pub bound_shift: bool,
}

/// Configuration of the exact LP.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Total time budget in seconds, measured from the creation of the LP. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Maximum number of simplex iterations per solve. `None` means no limit.
    pub iteration_limit: Option<usize>,
    /// Verify the primal solution of the backend in exact arithmetic.
    pub check_primal_feasibility: bool,
    /// Verify complementary slackness of the dual solution of the backend in exact arithmetic.
    pub check_dual_feasibility: bool,
    /// Never warm start the backend.
    pub from_scratch: bool,
    /// Pricing rule of the backend.
    pub pricing: Pricing,
    /// Let the backend scale the LP.
    pub scaling: bool,
    /// Methods available for bound certification.
    pub bound_certification: BoundCertification,
    /// Write exact solutions into the floating point shadow after every solve.
    pub overwrite_shadow: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_limit: None,
            iteration_limit: None,
            check_primal_feasibility: true,
            check_dual_feasibility: true,
            from_scratch: false,
            pricing: Pricing::Auto,
            scaling: false,
            bound_certification: BoundCertification::default(),
            overwrite_shadow: false,
        }
    }
}

impl Settings {
    /// Create settings with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total time budget in seconds.
    #[must_use]
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the iteration limit of a single solve.
    #[must_use]
    pub fn with_iteration_limit(mut self, iterations: usize) -> Self {
        self.iteration_limit = Some(iterations);
        self
    }

    /// Enable or disable the exact feasibility checks of backend solutions.
    #[must_use]
    pub fn with_feasibility_checks(mut self, primal: bool, dual: bool) -> Self {
        self.check_primal_feasibility = primal;
        self.check_dual_feasibility = dual;
        self
    }

    /// Enable or disable solving without warm start.
    #[must_use]
    pub fn with_from_scratch(mut self, enabled: bool) -> Self {
        self.from_scratch = enabled;
        self
    }

    /// Set the pricing rule.
    #[must_use]
    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Enable or disable scaling.
    #[must_use]
    pub fn with_scaling(mut self, enabled: bool) -> Self {
        self.scaling = enabled;
        self
    }

    /// Set the available bound certification methods.
    #[must_use]
    pub fn with_bound_certification(mut self, methods: BoundCertification) -> Self {
        self.bound_certification = methods;
        self
    }

    /// Enable or disable writing solutions into the shadow by default.
    #[must_use]
    pub fn with_overwrite_shadow(mut self, enabled: bool) -> Self {
        self.overwrite_shadow = enabled;
        self
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::lp::settings::{BoundCertification, Settings};
    use crate::interface::Pricing;

    #[test]
    fn defaults() {
        let settings = Settings::new();
        assert_eq!(settings.time_limit, None);
        assert!(settings.check_primal_feasibility && settings.check_dual_feasibility);
        assert!(!settings.overwrite_shadow);
        assert_eq!(settings.pricing, Pricing::Auto);
    }

    #[test]
    fn builder() {
        let methods = BoundCertification { project_and_shift: true, bound_shift: false };
        let settings = Settings::new()
            .with_time_limit(10.0)
            .with_iteration_limit(100)
            .with_feasibility_checks(false, true)
            .with_pricing(Pricing::Devex)
            .with_bound_certification(methods);

        assert_eq!(settings.time_limit, Some(10.0));
        assert_eq!(settings.iteration_limit, Some(100));
        assert!(!settings.check_primal_feasibility);
        assert!(settings.check_dual_feasibility);
        assert_eq!(settings.pricing, Pricing::Devex);
        assert_eq!(settings.bound_certification, methods);
    }
}
