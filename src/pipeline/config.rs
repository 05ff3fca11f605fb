#[cfg(feature = "serde")]
use anyhow::Context;
#[cfg(feature = "serde")]
use std::path::Path;

use crate::error::IvError;
use crate::models::utils::DAYS_PER_YEAR;
use crate::parse::NumberFormat;

/// Brent solver settings and the credibility ceiling applied to its output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Lowest volatility searched
    pub lower_bound: f64,
    /// Highest volatility searched
    pub upper_bound: f64,
    /// Iteration budget; acts as the per-quote deadline
    pub max_iterations: usize,
    /// Convergence tolerance on σ and on the price residual
    pub tolerance: f64,
    /// Roots at or above this value are reported as out of range (5.0 = 500%)
    pub iv_ceiling: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            lower_bound: 1e-6,
            upper_bound: 5.0,
            max_iterations: 200,
            tolerance: 1e-10,
            iv_ceiling: 5.0,
        }
    }
}

/// Main configuration for the implied-volatility pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvConfig {
    /// Continuously compounded risk-free rate
    #[cfg_attr(feature = "serde", serde(default))]
    pub rate: f64,

    /// Days per year for `T = days / basis`
    #[cfg_attr(feature = "serde", serde(default = "default_day_count_basis"))]
    pub day_count_basis: f64,

    /// Horizon used when a quote's expiry or observation date is unusable
    #[cfg_attr(feature = "serde", serde(default = "default_days_to_expiry"))]
    pub default_days_to_expiry: u32,

    /// How textual prices and strikes are written
    #[cfg_attr(feature = "serde", serde(default))]
    pub number_format: NumberFormat,

    #[cfg_attr(feature = "serde", serde(default))]
    pub solver: SolverConfig,
}

impl Default for IvConfig {
    fn default() -> Self {
        Self {
            rate: 0.0,
            day_count_basis: default_day_count_basis(),
            default_days_to_expiry: default_days_to_expiry(),
            number_format: NumberFormat::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl IvConfig {
    /// Default bracket [1e-6, 5], 200 iterations, 500% ceiling
    pub fn standard() -> Self {
        Self::default()
    }

    /// Looser tolerance and a smaller iteration budget for interactive use
    pub fn fast() -> Self {
        Self {
            solver: SolverConfig {
                max_iterations: 100,
                tolerance: 1e-8,
                ..SolverConfig::default()
            },
            ..Self::default()
        }
    }

    /// Tight tolerance for research and regression comparisons
    pub fn precise() -> Self {
        Self {
            solver: SolverConfig {
                max_iterations: 500,
                tolerance: 1e-14,
                ..SolverConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check that the values describe a usable solver setup.
    pub fn validate(&self) -> Result<(), IvError> {
        let s = &self.solver;
        let invalid = |message: String| Err(IvError::InvalidConfig { message });

        if !(s.lower_bound > 0.0 && s.lower_bound < s.upper_bound) {
            return invalid(format!(
                "bracket must satisfy 0 < lower_bound < upper_bound, got [{}, {}]",
                s.lower_bound, s.upper_bound
            ));
        }
        if s.max_iterations == 0 {
            return invalid("max_iterations must be positive".into());
        }
        if !(s.tolerance > 0.0) {
            return invalid(format!("tolerance must be positive, got {}", s.tolerance));
        }
        if !(s.iv_ceiling > 0.0) {
            return invalid(format!("iv_ceiling must be positive, got {}", s.iv_ceiling));
        }
        if !(self.day_count_basis > 0.0) {
            return invalid(format!(
                "day_count_basis must be positive, got {}",
                self.day_count_basis
            ));
        }
        if self.default_days_to_expiry == 0 {
            return invalid("default_days_to_expiry must be at least 1".into());
        }
        if !self.rate.is_finite() {
            return invalid(format!("rate must be finite, got {}", self.rate));
        }
        Ok(())
    }

    /// Parse a TOML document; absent keys take their defaults.
    ///
    /// ```rust
    /// # use iv_smile_lib::IvConfig;
    /// let config = IvConfig::from_toml_str("[solver]\niv_ceiling = 3.0\n").unwrap();
    /// assert_eq!(config.solver.iv_ceiling, 3.0);
    /// assert_eq!(config.default_days_to_expiry, 30);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text).context("failed to parse IV configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("invalid config in {}", path.display()))
    }
}

fn default_day_count_basis() -> f64 {
    DAYS_PER_YEAR
}

fn default_days_to_expiry() -> u32 {
    30
}
