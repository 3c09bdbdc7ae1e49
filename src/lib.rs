#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod design;
mod error;
mod provider;
mod registry;
mod unit;

pub mod dataset;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, Residual};
    pub use crate::dataset::{fields, Dataset, ObservationSet};
    pub use crate::design::DesignMatrix;
    pub use crate::error::Error;
    pub use crate::provider::{
        FnProvider, Partials, Provider, ReceiverClock, SatelliteClock, SatellitePosition,
        SitePosition,
    };
    pub use crate::registry::Registry;
    pub use crate::unit::Unit;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::Epoch;
    pub use nalgebra::{DMatrix, Vector3};
}

// pub export
pub use error::Error;
