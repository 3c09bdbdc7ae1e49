mod site_pos;

use log::LevelFilter;
use std::str::FromStr;
use std::sync::Once;

use crate::prelude::{fields, Constellation, Epoch, ObservationSet, Vector3, SV};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Reference site coordinates (ECEF m)
pub const REFERENCE_COORDS_ECEF_M: (f64, f64, f64) = (3628427.9118, 562059.0936, 5197872.215);

/// WGS84 semi major axis (m)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

pub const G01: SV = SV {
    prn: 1,
    constellation: Constellation::GPS,
};

pub const G02: SV = SV {
    prn: 2,
    constellation: Constellation::GPS,
};

pub const G03: SV = SV {
    prn: 3,
    constellation: Constellation::GPS,
};

pub const G04: SV = SV {
    prn: 4,
    constellation: Constellation::GPS,
};

pub fn reference_site() -> Vector3<f64> {
    Vector3::new(
        REFERENCE_COORDS_ECEF_M.0,
        REFERENCE_COORDS_ECEF_M.1,
        REFERENCE_COORDS_ECEF_M.2,
    )
}

/// Satellites in sight of the reference site (ECEF m)
pub fn sky() -> Vec<(SV, Vector3<f64>)> {
    vec![
        (G01, Vector3::new(15600000.0, 7540000.0, 20140000.0)),
        (G02, Vector3::new(18760000.0, 2750000.0, 18610000.0)),
        (G03, Vector3::new(17610000.0, 14630000.0, 13480000.0)),
        (G04, Vector3::new(19170000.0, 610000.0, 18390000.0)),
    ]
}

/// Builds a GNSS [ObservationSet], sampled from the reference site,
/// with geometric ranges, over a few epochs.
pub fn reference_dataset(num_epochs: usize) -> ObservationSet {
    let t0 = Epoch::from_str("2020-06-25T00:00:00 GPST").unwrap();

    let site = reference_site();

    let (mut epochs, mut satellites) = (Vec::new(), Vec::new());
    let (mut sat_pos, mut site_pos, mut range_m) = (Vec::new(), Vec::new(), Vec::new());

    for epoch in 0..num_epochs {
        let t = t0 + (30.0 * epoch as f64) * hifitime::Unit::Second;

        for (sv, position) in sky() {
            // slowly moving satellite
            let position = position + Vector3::new(1.0E3, -2.0E3, 5.0E2) * epoch as f64;

            epochs.push(t);
            satellites.push(sv);
            sat_pos.push(position);
            site_pos.push(site);
            range_m.push((position - site).norm());
        }
    }

    ObservationSet::gnss(sat_pos, site_pos, range_m)
        .unwrap()
        .with_satellites(fields::SATELLITE, satellites)
        .unwrap()
        .with_epochs(epochs)
        .unwrap()
}
