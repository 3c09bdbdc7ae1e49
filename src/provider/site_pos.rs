use log::trace;

use crate::{
    prelude::{Config, Dataset, Error, Residual, Unit},
    provider::{line_of_sight, Partials, Provider, GEOMETRY_FIELDS},
};

/// Site (station) coordinates partial derivatives.
///
/// The partial derivative of the observed minus computed range, with respect
/// to the site position correction, is the site to satellite line of sight
/// unit vector: (sat - site) / range, projected on the X, Y and Z axes of
/// the frame the positions are expressed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SitePosition {
    residual: Residual,
    min_range_m: Option<f64>,
}

impl SitePosition {
    /// Column names
    pub const COLUMNS: [&'static str; 3] = ["x", "y", "z"];

    /// Creates [SitePosition] provider from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            residual: cfg.residual,
            min_range_m: cfg.min_range_m,
        }
    }
}

impl Provider for SitePosition {
    fn dependencies(&self) -> &'static [&'static str] {
        GEOMETRY_FIELDS
    }

    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error> {
        let mut partials = line_of_sight(dataset, self.min_range_m)?;
        self.residual.apply(&mut partials);

        trace!(
            "site position partials ({}): {}x{}",
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
