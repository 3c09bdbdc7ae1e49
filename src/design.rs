//! Design matrix assembly
use itertools::Itertools;
use log::debug;
use std::ops::Range;
use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::prelude::{Config, Dataset, Error, Registry, Unit};

/// [DesignMatrix] gathers the [Partials](crate::prelude::Partials) of several providers,
/// in the requested order. Row i is observation i for every column.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// NxΣK matrix
    h: DMatrix<f64>,
    /// Column names, formatted as "{provider}-{column}"
    columns: Vec<String>,
    /// [Unit] of each column
    units: Vec<Unit>,
    /// Columns contributed by each provider, in request order
    blocks: Vec<(String, Range<usize>)>,
}

impl DesignMatrix {
    /// Assembles a [DesignMatrix] from the [Registry] providers selected in [Config].
    pub fn from_config(
        registry: &Registry,
        cfg: &Config,
        dataset: &dyn Dataset,
    ) -> Result<Self, Error> {
        Self::assemble(registry, &cfg.providers, dataset)
    }

    /// Assembles a [DesignMatrix] by invoking these providers, in this order.
    /// Any provider failure aborts the whole process: we never
    /// return a partial design matrix.
    pub fn assemble<S: AsRef<str> + Sync>(
        registry: &Registry,
        names: &[S],
        dataset: &dyn Dataset,
    ) -> Result<Self, Error> {
        let num_obs = dataset.num_obs();

        #[cfg(feature = "parallel")]
        let blocks = names
            .par_iter()
            .map(|name| registry.compute(name.as_ref(), dataset))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let blocks = names
            .iter()
            .map(|name| registry.compute(name.as_ref(), dataset))
            .collect::<Result<Vec<_>, _>>()?;

        let columns = names
            .iter()
            .zip(blocks.iter())
            .flat_map(|(name, block)| {
                block
                    .columns()
                    .iter()
                    .map(move |column| format!("{}-{}", name.as_ref(), column))
            })
            .collect::<Vec<_>>();

        if let Some(duplicate) = columns.iter().duplicates().next() {
            return Err(Error::DuplicateColumn(duplicate.clone()));
        }

        let units = blocks
            .iter()
            .flat_map(|block| std::iter::repeat(block.unit()).take(block.ncols()))
            .collect::<Vec<_>>();

        let mut h = DMatrix::<f64>::zeros(num_obs, columns.len());
        let mut ranges = Vec::with_capacity(blocks.len());
        let mut offset = 0;

        for (name, block) in names.iter().zip(blocks.iter()) {
            h.columns_mut(offset, block.ncols()).copy_from(block.matrix());
            ranges.push((name.as_ref().to_string(), offset..offset + block.ncols()));
            offset += block.ncols();
        }

        debug!(
            "design matrix: {}x{} ({})",
            h.nrows(),
            h.ncols(),
            names.iter().map(|name| name.as_ref()).join(", ")
        );

        Ok(Self {
            h,
            columns,
            units,
            blocks: ranges,
        })
    }

    /// NxΣK design matrix
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.h
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// [Unit] of each column
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Number of rows (observations)
    pub fn nrows(&self) -> usize {
        self.h.nrows()
    }

    /// Number of columns (parameters)
    pub fn ncols(&self) -> usize {
        self.h.ncols()
    }

    /// Returns the columns contributed by this provider.
    /// Empty if this provider did not contribute.
    pub fn provider_columns(&self, provider: &str) -> Vec<usize> {
        self.blocks
            .iter()
            .find(|(name, _)| name == provider)
            .map(|(_, range)| range.clone().collect())
            .unwrap_or_default()
    }

    /// Decomposes [DesignMatrix] into (matrix, column names, units)
    pub fn into_parts(self) -> (DMatrix<f64>, Vec<String>, Vec<Unit>) {
        (self.h, self.columns, self.units)
    }
}
