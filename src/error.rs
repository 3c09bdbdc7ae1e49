use itertools::Itertools;
use thiserror::Error;

/// Maximal number of observation indices reported in error messages
const MAX_REPORTED_INDICES: usize = 16;

/// Formats the offending observation indices, in a human readable manner.
/// An empty list means the entire dataset is concerned.
fn fmt_indices(indices: &[usize]) -> String {
    if indices.is_empty() {
        return "(all observations)".to_string();
    }

    let listed = indices.iter().take(MAX_REPORTED_INDICES).join(", ");

    if indices.len() > MAX_REPORTED_INDICES {
        format!(
            "(observations #{}, ... {} more)",
            listed,
            indices.len() - MAX_REPORTED_INDICES
        )
    } else {
        format!("(observations #{})", listed)
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// A [Provider](crate::prelude::Provider) is already registered under this name.
    /// Registration never overwrites an existing entry.
    #[error("provider \"{0}\" is already registered")]
    DuplicateProvider(String),

    /// No [Provider](crate::prelude::Provider) registered under this name:
    /// most likely a configuration error.
    #[error("unknown provider \"{0}\"")]
    UnknownProvider(String),

    /// The dataset does not satisfy the provider dependencies.
    /// Empty indices means the field does not exist at all.
    #[error("missing \"{field}\" field {}", fmt_indices(.indices))]
    MissingField { field: String, indices: Vec<usize> },

    /// Unusable geometry: zero, non finite or too small range.
    /// We never return a column poisoned with NaN or infinite values.
    #[error("degenerate geometry {}", fmt_indices(.indices))]
    DegenerateGeometry { indices: Vec<usize> },

    /// Dataset field does not have one entry per observation.
    #[error("\"{field}\" field has {found} entries but dataset has {expected} observations")]
    FieldLength {
        field: String,
        expected: usize,
        found: usize,
    },

    /// Provider did not return one row per observation.
    #[error("invalid number of rows: {found} (expecting {expected})")]
    RowCount { expected: usize, found: usize },

    /// Number of matrix columns does not match the number of column names.
    #[error("{columns} columns but {names} column names")]
    ColumnMismatch { columns: usize, names: usize },

    /// Column names must be unique.
    #[error("duplicate column \"{0}\"")]
    DuplicateColumn(String),

    /// Unit tag that is not part of our vocabulary.
    #[error("unknown unit \"{0}\"")]
    UnknownUnit(String),

    /// Any failure of a registered provider, tagged with the provider name.
    #[error("provider \"{provider}\": {source}")]
    Provider {
        provider: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Offending observation indices, if any.
    pub fn indices(&self) -> &[usize] {
        match self {
            Self::MissingField { indices, .. } | Self::DegenerateGeometry { indices } => {
                indices.as_slice()
            },
            Self::Provider { source, .. } => source.indices(),
            _ => &[],
        }
    }

    /// Name of the offending provider, if known.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Provider { provider, .. } => Some(provider.as_str()),
            _ => None,
        }
    }
}
