use log::trace;

use crate::{
    prelude::{Config, Dataset, Error, Residual, Unit},
    provider::{line_of_sight, Partials, Provider, GEOMETRY_FIELDS},
};

/// Satellite position (orbit correction) partial derivatives.
/// The satellite sits at the other end of the line of sight, so
/// these are the opposite of the [SitePosition](super::SitePosition) partials.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SatellitePosition {
    residual: Residual,
    min_range_m: Option<f64>,
}

impl SatellitePosition {
    /// Column names
    pub const COLUMNS: [&'static str; 3] = ["x", "y", "z"];

    /// Creates [SatellitePosition] provider from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            residual: cfg.residual,
            min_range_m: cfg.min_range_m,
        }
    }
}

impl Provider for SatellitePosition {
    fn dependencies(&self) -> &'static [&'static str] {
        GEOMETRY_FIELDS
    }

    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error> {
        let mut partials = line_of_sight(dataset, self.min_range_m)?;
        partials.neg_mut();
        self.residual.apply(&mut partials);

        trace!(
            "satellite position partials ({}): {}x{}",
            self.residual,
            partials.nrows(),
            partials.ncols()
        );

        Partials::new(
            partials,
            Self::COLUMNS.iter().map(|c| c.to_string()).collect(),
            Unit::Dimensionless,
        )
    }
}
