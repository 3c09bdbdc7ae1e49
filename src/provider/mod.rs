//! Partial derivatives providers
use itertools::Itertools;
use log::error;
use nalgebra::DMatrix;

use crate::{
    dataset::{fields, scalar_vector, vector3_matrix},
    prelude::{Dataset, Error, Unit},
};

mod rcv_clock;
mod sat_clock;
mod sat_pos;
mod site_pos;

pub use rcv_clock::ReceiverClock;
pub use sat_clock::SatelliteClock;
pub use sat_pos::SatellitePosition;
pub use site_pos::SitePosition;

/// Partial derivatives contributed by one [Provider]:
/// one row per observation, one column per estimated parameter,
/// and a single [Unit] that applies to all columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Partials {
    matrix: DMatrix<f64>,
    columns: Vec<String>,
    unit: Unit,
}

impl Partials {
    /// Builds new [Partials].
    /// ## Input
    /// - matrix: NxK partial derivatives
    /// - columns: K unique column names
    /// - unit: [Unit] of all K columns
    pub fn new(matrix: DMatrix<f64>, columns: Vec<String>, unit: Unit) -> Result<Self, Error> {
        if matrix.ncols() != columns.len() {
            return Err(Error::ColumnMismatch {
                columns: matrix.ncols(),
                names: columns.len(),
            });
        }

        if let Some(duplicate) = columns.iter().duplicates().next() {
            return Err(Error::DuplicateColumn(duplicate.clone()));
        }

        Ok(Self {
            matrix,
            columns,
            unit,
        })
    }

    /// NxK partial derivatives
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Ordered column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// [Unit] of every column
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Number of rows (observations)
    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns (parameters)
    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Decomposes [Partials] into (matrix, column names, unit)
    pub fn into_parts(self) -> (DMatrix<f64>, Vec<String>, Unit) {
        (self.matrix, self.columns, self.unit)
    }
}

/// [Provider] computes the design matrix columns of one group of parameters.
///
/// [Provider]s must be pure: they only read the [Dataset] fields they depend on,
/// and invoking them twice on the same [Dataset] must return the exact same [Partials].
/// They must fail rather than return non finite values.
pub trait Provider: Send + Sync {
    /// [Dataset] fields this [Provider] reads.
    fn dependencies(&self) -> &'static [&'static str];

    /// Computes the [Partials] over this [Dataset].
    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error>;
}

/// Any function may serve as [Provider], which is convenient
/// for parameters that are defined outside of this crate.
/// Plain functions do not declare the [Dataset] fields they read:
/// wrap them in a [FnProvider] to do so.
impl<F> Provider for F
where
    F: Fn(&dyn Dataset) -> Result<Partials, Error> + Send + Sync,
{
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error> {
        self(dataset)
    }
}

/// [FnProvider] is a function based [Provider] that declares its dependencies.
#[derive(Debug, Clone)]
pub struct FnProvider<F> {
    dependencies: &'static [&'static str],
    f: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&dyn Dataset) -> Result<Partials, Error> + Send + Sync,
{
    /// Creates a new [FnProvider] that reads these [Dataset] fields.
    pub fn new(dependencies: &'static [&'static str], f: F) -> Self {
        Self { dependencies, f }
    }
}

impl<F> Provider for FnProvider<F>
where
    F: Fn(&dyn Dataset) -> Result<Partials, Error> + Send + Sync,
{
    fn dependencies(&self) -> &'static [&'static str] {
        self.dependencies
    }

    fn compute(&self, dataset: &dyn Dataset) -> Result<Partials, Error> {
        (self.f)(dataset)
    }
}

/// Geometric dependencies
pub(crate) const GEOMETRY_FIELDS: &[&str] =
    &[fields::SAT_POS, fields::SITE_POS, fields::GNSS_RANGE];

/// Returns the Nx3 site to satellite line of sight unit vectors,
/// (sat - site) / range, evaluated as a whole.
/// Zero, non finite or ranges smaller than `min_range_m` are rejected,
/// as are non finite positions.
pub(crate) fn line_of_sight(
    dataset: &dyn Dataset,
    min_range_m: Option<f64>,
) -> Result<DMatrix<f64>, Error> {
    let sat_pos = vector3_matrix(dataset, fields::SAT_POS)?;
    let site_pos = vector3_matrix(dataset, fields::SITE_POS)?;
    let range_m = scalar_vector(dataset, fields::GNSS_RANGE)?;

    let mut los = sat_pos - site_pos;

    for mut column in los.column_iter_mut() {
        column.component_div_assign(&range_m);
    }

    let degenerate = range_m
        .iter()
        .zip(los.row_iter())
        .positions(|(r, row)| {
            *r == 0.0
                || !r.is_finite()
                || min_range_m.is_some_and(|min_m| r.abs() < min_m)
                || row.iter().any(|value| !value.is_finite())
        })
        .collect::<Vec<_>>();

    if !degenerate.is_empty() {
        match dataset.epoch(degenerate[0]) {
            Some(t) => error!(
                "{} - degenerate geometry (range={}m), {} observation(s) concerned",
                t,
                range_m[degenerate[0]],
                degenerate.len()
            ),
            None => error!(
                "degenerate geometry (range={}m), {} observation(s) concerned",
                range_m[degenerate[0]],
                degenerate.len()
            ),
        }
        return Err(Error::DegenerateGeometry {
            indices: degenerate,
        });
    }

    Ok(los)
}
