//! Configuration for the analytic Meeus ephemeris searches.

/// Scan and refinement parameters for event searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeeusConfig {
    /// Coarse scan step for rise/set/transit searches, in days.
    pub scan_step_days: f64,
    /// How far ahead a rise/set/transit search looks before reporting
    /// that the event never occurs, in days.
    pub scan_horizon_days: f64,
    /// Coarse scan step for the new-moon search, in days.
    pub new_moon_step_days: f64,
    /// How far back the new-moon search looks, in days.
    pub new_moon_horizon_days: f64,
    /// Maximum bisection iterations per event.
    pub max_iterations: u32,
    /// Bisection stops when the bracket is narrower than this, in days.
    pub convergence_days: f64,
}

impl Default for MeeusConfig {
    fn default() -> Self {
        Self {
            scan_step_days: 1.0 / 72.0,
            scan_horizon_days: 2.0,
            new_moon_step_days: 0.5,
            new_moon_horizon_days: 35.0,
            max_iterations: 50,
            convergence_days: 1.0e-6,
        }
    }
}

impl MeeusConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.scan_step_days > 0.0) {
            return Err("scan_step_days must be positive");
        }
        // Coarser steps can straddle a whole rise/set pair.
        if self.scan_step_days > 1.0 / 12.0 {
            return Err("scan_step_days must be at most 2 hours");
        }
        if !(self.scan_horizon_days >= 1.1) {
            return Err("scan_horizon_days must cover at least one lunar day");
        }
        if !(self.new_moon_step_days > 0.0) || self.new_moon_step_days > 2.0 {
            return Err("new_moon_step_days must be in (0, 2]");
        }
        if !(self.new_moon_horizon_days >= 29.6) {
            return Err("new_moon_horizon_days must cover a synodic month");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        if !(self.convergence_days > 0.0) {
            return Err("convergence_days must be positive");
        }
        Ok(())
    }
}
