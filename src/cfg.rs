#[cfg(feature = "serde")]
use serde::Deserialize;

use nalgebra::DMatrix;

/// Residual definition of the least squares solver that consumes our
/// design matrix. Every column is the partial derivative of this residual
/// with respect to its parameter, which defines the sign of all partials.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum Residual {
    /// Residual is observed minus computed.
    /// Site partials are the site to satellite line of sight
    /// unit vector, (sat - site) / range, receiver clock partials are -1.
    #[default]
    ObservedMinusComputed,
    /// Residual is computed minus observed: all partials are negated.
    ComputedMinusObserved,
}

impl std::fmt::Display for Residual {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ObservedMinusComputed => write!(fmt, "O-C"),
            Self::ComputedMinusObserved => write!(fmt, "C-O"),
        }
    }
}

impl Residual {
    /// Sign of the partial derivatives, relative to
    /// the observed minus computed convention.
    pub(crate) fn sign(&self) -> f64 {
        match self {
            Self::ObservedMinusComputed => 1.0,
            Self::ComputedMinusObserved => -1.0,
        }
    }

    /// Applies this sign convention to partial derivatives expressed
    /// in the observed minus computed convention.
    pub(crate) fn apply(&self, partials: &mut DMatrix<f64>) {
        if *self == Self::ComputedMinusObserved {
            partials.neg_mut();
        }
    }
}

fn default_providers() -> Vec<String> {
    vec!["gnss_site_pos".to_string(), "gnss_rcv_clock".to_string()]
}

/// Partial derivatives [Config]uration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Solver [Residual] convention, defining the partials sign.
    #[cfg_attr(feature = "serde", serde(default))]
    pub residual: Residual,

    /// Minimal range (in meters) below which an observation geometry
    /// is considered degenerate. Zero and non finite ranges are always
    /// rejected, this only tightens the criteria. Disabled by default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_range_m: Option<f64>,

    /// Ordered list of providers that contribute to the design matrix.
    #[cfg_attr(feature = "serde", serde(default = "default_providers"))]
    pub providers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            residual: Residual::default(),
            min_range_m: None,
            providers: default_providers(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated [Residual] convention.
    pub fn with_residual(&self, residual: Residual) -> Self {
        let mut s = self.clone();
        s.residual = residual;
        s
    }

    /// Copies and returns [Config] with minimal range threshold (meters).
    pub fn with_min_range_m(&self, min_range_m: f64) -> Self {
        let mut s = self.clone();
        s.min_range_m = Some(min_range_m);
        s
    }

    /// Copies and returns [Config] with the ordered list of
    /// providers that form the design matrix.
    pub fn with_providers(&self, providers: &[&str]) -> Self {
        let mut s = self.clone();
        s.providers = providers.iter().map(|name| name.to_string()).collect();
        s
    }
}
