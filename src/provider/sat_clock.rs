use itertools::Itertools;
use log::trace;
use nalgebra::DMatrix;

use crate::{
    dataset::{fields, satellites},
    prelude::{Config, Dataset, Error, Residual, Unit},
    provider::{Partials, Provider},
};

/// Satellite clock offset partial derivatives, the clock offsets
/// being expressed in meters (c * dt).
/// One column per satellite, sorted by [SV](crate::prelude::SV) and named after it.
/// Each observation only depends on the clock of the satellite it was sampled from.
/// The satellite clock offset is subtracted from the computed range, so the
/// observed minus computed partial is +1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SatelliteClock {
    residual: Residual,
}

impl SatelliteClock {
    /// Creates [SatelliteClock] provider from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            residual: cfg.residual,
        }
    }
}

impl Provider for SatelliteClock {
    fn dependencies(&self) -> &'static [&'static str] {
        &[fields::SATELLITE]
    }

    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error> {
        let observed = satellites(dataset, fields::SATELLITE)?;
        let columns = observed.iter().copied().unique().sorted().collect::<Vec<_>>();

        let mut partials = DMatrix::<f64>::zeros(observed.len(), columns.len());

        for (row, sv) in observed.iter().enumerate() {
            if let Ok(col) = columns.binary_search(sv) {
                partials[(row, col)] = self.residual.sign();
            }
        }

        trace!(
            "satellite clock partials ({}): {} satellites",
            self.residual,
            columns.len()
        );

        Partials::new(
            partials,
            columns.iter().map(|sv| sv.to_string()).collect(),
            Unit::Dimensionless,
        )
    }
}
