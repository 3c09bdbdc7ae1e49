//! Observation dataset
use std::collections::HashMap;

use log::error;
use nalgebra::{DMatrix, DVector};

use crate::prelude::{Epoch, Error, Vector3, SV};

/// Field names our providers rely on.
pub mod fields {
    /// Satellite position, ECEF meters
    pub const SAT_POS: &str = "sat_pos";

    /// Site (receiver) position, ECEF meters
    pub const SITE_POS: &str = "site_pos";

    /// Computed range between satellite and site, in meters
    pub const GNSS_RANGE: &str = "gnss_range";

    /// Satellite identity
    pub const SATELLITE: &str = "satellite";
}

/// Ordered collection of observations, with named per-observation fields.
/// Row i of every field refers to the same observation. Any field entry
/// may be missing for a specific observation.
///
/// [Dataset] is read-only from the providers point of view.
pub trait Dataset: Sync {
    /// Number of observations.
    fn num_obs(&self) -> usize;

    /// 3D vector field, or None if this field does not exist.
    fn vector3(&self, field: &str) -> Option<&[Option<Vector3<f64>>]>;

    /// Scalar field, or None if this field does not exist.
    fn scalar(&self, field: &str) -> Option<&[Option<f64>]>;

    /// [SV] field, or None if this field does not exist.
    fn satellites(&self, field: &str) -> Option<&[Option<SV>]>;

    /// Sampling [Epoch] of this observation, if known.
    fn epoch(&self, _index: usize) -> Option<Epoch> {
        None
    }
}

/// In memory [Dataset], where fields are stored column wise.
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    num_obs: usize,
    epochs: Vec<Epoch>,
    vectors: HashMap<String, Vec<Option<Vector3<f64>>>>,
    scalars: HashMap<String, Vec<Option<f64>>>,
    satellites: HashMap<String, Vec<Option<SV>>>,
}

impl Dataset for ObservationSet {
    fn num_obs(&self) -> usize {
        self.num_obs
    }

    fn vector3(&self, field: &str) -> Option<&[Option<Vector3<f64>>]> {
        self.vectors.get(field).map(|values| values.as_slice())
    }

    fn scalar(&self, field: &str) -> Option<&[Option<f64>]> {
        self.scalars.get(field).map(|values| values.as_slice())
    }

    fn satellites(&self, field: &str) -> Option<&[Option<SV>]> {
        self.satellites.get(field).map(|values| values.as_slice())
    }

    fn epoch(&self, index: usize) -> Option<Epoch> {
        self.epochs.get(index).copied()
    }
}

impl ObservationSet {
    /// Creates an empty [ObservationSet] of `num_obs` observations.
    /// Every field added later on must have `num_obs` entries.
    pub fn new(num_obs: usize) -> Self {
        Self {
            num_obs,
            ..Default::default()
        }
    }

    /// Creates a GNSS [ObservationSet] from satellite positions,
    /// site positions (both ECEF meters) and computed ranges (meters).
    pub fn gnss(
        sat_pos: Vec<Vector3<f64>>,
        site_pos: Vec<Vector3<f64>>,
        range_m: Vec<f64>,
    ) -> Result<Self, Error> {
        Self::new(sat_pos.len())
            .with_vector3(fields::SAT_POS, sat_pos)?
            .with_vector3(fields::SITE_POS, site_pos)?
            .with_scalar(fields::GNSS_RANGE, range_m)
    }

    fn checked_len(&self, field: &str, found: usize) -> Result<(), Error> {
        if found != self.num_obs {
            return Err(Error::FieldLength {
                field: field.to_string(),
                expected: self.num_obs,
                found,
            });
        }
        Ok(())
    }

    /// Returns [ObservationSet] with sampling [Epoch]s.
    pub fn with_epochs(mut self, epochs: Vec<Epoch>) -> Result<Self, Error> {
        self.checked_len("epoch", epochs.len())?;
        self.epochs = epochs;
        Ok(self)
    }

    /// Returns [ObservationSet] with a new (fully defined) 3D vector field.
    pub fn with_vector3(self, field: &str, values: Vec<Vector3<f64>>) -> Result<Self, Error> {
        self.with_partial_vector3(field, values.into_iter().map(Some).collect())
    }

    /// Returns [ObservationSet] with a new 3D vector field, that may
    /// not be defined for every observation.
    pub fn with_partial_vector3(
        mut self,
        field: &str,
        values: Vec<Option<Vector3<f64>>>,
    ) -> Result<Self, Error> {
        self.checked_len(field, values.len())?;
        self.vectors.insert(field.to_string(), values);
        Ok(self)
    }

    /// Returns [ObservationSet] with a new (fully defined) scalar field.
    pub fn with_scalar(self, field: &str, values: Vec<f64>) -> Result<Self, Error> {
        self.with_partial_scalar(field, values.into_iter().map(Some).collect())
    }

    /// Returns [ObservationSet] with a new scalar field, that may
    /// not be defined for every observation.
    pub fn with_partial_scalar(
        mut self,
        field: &str,
        values: Vec<Option<f64>>,
    ) -> Result<Self, Error> {
        self.checked_len(field, values.len())?;
        self.scalars.insert(field.to_string(), values);
        Ok(self)
    }

    /// Returns [ObservationSet] with a new [SV] field.
    pub fn with_satellites(mut self, field: &str, values: Vec<SV>) -> Result<Self, Error> {
        self.checked_len(field, values.len())?;
        self.satellites
            .insert(field.to_string(), values.into_iter().map(Some).collect());
        Ok(self)
    }
}

/// Collects a fully defined field, or reports which observations are missing.
fn required<T: Copy>(
    dataset: &dyn Dataset,
    field: &str,
    values: Option<&[Option<T>]>,
) -> Result<Vec<T>, Error> {
    let num_obs = dataset.num_obs();

    let values = values.ok_or_else(|| Error::MissingField {
        field: field.to_string(),
        indices: Vec::new(),
    })?;

    if values.len() != num_obs {
        return Err(Error::FieldLength {
            field: field.to_string(),
            expected: num_obs,
            found: values.len(),
        });
    }

    let missing = values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| if value.is_none() { Some(i) } else { None })
        .collect::<Vec<_>>();

    if !missing.is_empty() {
        if let Some(t) = dataset.epoch(missing[0]) {
            error!("{} - missing \"{}\" field", t, field);
        }
        return Err(Error::MissingField {
            field: field.to_string(),
            indices: missing,
        });
    }

    Ok(values.iter().flatten().copied().collect())
}

/// Returns this 3D vector field as a Nx3 matrix.
pub(crate) fn vector3_matrix(dataset: &dyn Dataset, field: &str) -> Result<DMatrix<f64>, Error> {
    let values = required(dataset, field, dataset.vector3(field))?;
    Ok(DMatrix::from_fn(values.len(), 3, |i, j| values[i][j]))
}

/// Returns this scalar field as a column vector.
pub(crate) fn scalar_vector(dataset: &dyn Dataset, field: &str) -> Result<DVector<f64>, Error> {
    let values = required(dataset, field, dataset.scalar(field))?;
    Ok(DVector::from_vec(values))
}

/// Returns this [SV] field.
pub(crate) fn satellites(dataset: &dyn Dataset, field: &str) -> Result<Vec<SV>, Error> {
    required(dataset, field, dataset.satellites(field))
}
