use nalgebra::DMatrix;

use crate::{
    dataset::{fields, scalar_vector},
    prelude::{Config, Dataset, Error, Residual, Unit},
    provider::{Partials, Provider},
};

/// Receiver clock offset partial derivative, the clock
/// offset being expressed in meters (c * dt). The clock offset adds up
/// to the computed range, so the observed minus computed partial is -1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReceiverClock {
    residual: Residual,
}

impl ReceiverClock {
    /// Column name
    pub const COLUMN: &'static str = "clock";

    /// Creates [ReceiverClock] provider from [Config]uration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            residual: cfg.residual,
        }
    }
}

impl Provider for ReceiverClock {
    fn dependencies(&self) -> &'static [&'static str] {
        &[fields::GNSS_RANGE]
    }

    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error> {
        // the clock applies to every valid observation
        let range_m = scalar_vector(dataset, fields::GNSS_RANGE)?;

        let mut partials = DMatrix::from_element(range_m.nrows(), 1, -1.0);
        self.residual.apply(&mut partials);

        Partials::new(partials, vec![Self::COLUMN.to_string()], Unit::Dimensionless)
    }
}
