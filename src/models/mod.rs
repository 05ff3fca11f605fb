pub mod bs;
pub mod implied;

/// European option class priced by the models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OptionClass {
    Call,
    Put,
}

impl OptionClass {
    /// Resolve one of the labels used by the scrapers (`call`, `calls`, `c`,
    /// `put`, `puts`, `p`), case-insensitively. Anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "call" | "calls" | "c" => Some(Self::Call),
            "put" | "puts" | "p" => Some(Self::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Utility functions shared by the pricer and the solver
pub mod utils {
    /// Days per year used when no basis is configured (ACT/365)
    pub const DAYS_PER_YEAR: f64 = 365.0;

    /// Convert whole days to a year fraction
    pub fn years_from_days(days: u32, basis: f64) -> f64 {
        days as f64 / basis
    }
}
