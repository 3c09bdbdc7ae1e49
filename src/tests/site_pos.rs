use rstest::*;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::{
    prelude::{
        fields, Config, Error, ObservationSet, Partials, Provider, Residual, SatellitePosition,
        SitePosition, Unit, Vector3,
    },
    tests::{init_logger, reference_dataset, EARTH_SEMI_MAJOR_AXIS_WGS84},
};

#[fixture]
fn build_provider() -> SitePosition {
    SitePosition::new(&Config::default())
}

fn single_observation(sat: Vector3<f64>, site: Vector3<f64>, range_m: f64) -> ObservationSet {
    ObservationSet::gnss(vec![sat], vec![site], vec![range_m]).unwrap()
}

#[test]
fn site_pos_along_x_axis() {
    init_logger();

    let provider = build_provider();

    let dataset = single_observation(
        Vector3::new(20_000_000.0, 0.0, 0.0),
        Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84, 0.0, 0.0),
        13_621_863.0,
    );

    let partials = provider.compute(&dataset).unwrap();

    assert_eq!(partials.unit(), Unit::Dimensionless);
    assert_eq!(partials.unit().to_string(), "dimensionless");
    assert_eq!(partials.columns(), &["x", "y", "z"]);
    assert_eq!(partials.matrix().shape(), (1, 3));

    let row = partials.matrix().row(0);
    assert!((row[0] - 1.0).abs() < 1.0E-12);
    assert_eq!(row[1], 0.0);
    assert_eq!(row[2], 0.0);
}

#[rstest]
#[case(
    Vector3::new(0.0, 26_000_000.0, 0.0),
    Vector3::new(0.0, 6_400_000.0, 0.0),
    (0.0, 1.0, 0.0)
)]
#[case(
    Vector3::new(0.0, 0.0, -26_000_000.0),
    Vector3::new(0.0, 0.0, -6_400_000.0),
    (0.0, 0.0, -1.0)
)]
#[case(
    Vector3::new(1.0, 1.0, 0.0),
    Vector3::new(0.0, 0.0, 0.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0)
)]
fn site_pos_line_of_sight(
    #[case] sat: Vector3<f64>,
    #[case] site: Vector3<f64>,
    #[case] expected: (f64, f64, f64),
) {
    let provider = build_provider();

    let dataset = single_observation(sat, site, (sat - site).norm());
    let partials = provider.compute(&dataset).unwrap();

    let row = partials.matrix().row(0);

    assert!((row[0] - expected.0).abs() < 1.0E-12, "x: {}", row[0]);
    assert!((row[1] - expected.1).abs() < 1.0E-12, "y: {}", row[1]);
    assert!((row[2] - expected.2).abs() < 1.0E-12, "z: {}", row[2]);
}

#[test]
fn site_pos_unit_vectors() {
    init_logger();

    let provider = build_provider();
    let dataset = reference_dataset(10);

    let partials = provider.compute(&dataset).unwrap();

    assert_eq!(partials.nrows(), 40);
    assert_eq!(partials.ncols(), 3);

    for (i, row) in partials.matrix().row_iter().enumerate() {
        let norm = row.norm_squared();
        assert!((norm - 1.0).abs() < 1.0E-12, "row #{}: |los|²={}", i, norm);
    }
}

#[test]
fn site_pos_is_deterministic() {
    let provider = build_provider();
    let dataset = reference_dataset(5);

    let first = provider.compute(&dataset).unwrap();
    let second = provider.compute(&dataset).unwrap();

    for (a, b) in first.matrix().iter().zip(second.matrix().iter()) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[rstest]
#[case(0.0)]
#[case(-0.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn site_pos_degenerate_range(#[case] range_m: f64) {
    init_logger();

    let provider = build_provider();

    let dataset = ObservationSet::gnss(
        vec![Vector3::new(20_000_000.0, 0.0, 0.0); 3],
        vec![Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84, 0.0, 0.0); 3],
        vec![13_621_863.0, range_m, 13_621_863.0],
    )
    .unwrap();

    assert_eq!(
        provider.compute(&dataset),
        Err(Error::DegenerateGeometry { indices: vec![1] })
    );
}

#[rstest]
#[case(
    Vector3::new(f64::NAN, 0.0, 0.0),
    Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84, 0.0, 0.0)
)]
#[case(
    Vector3::new(20_000_000.0, 0.0, 0.0),
    Vector3::new(0.0, f64::INFINITY, 0.0)
)]
#[case(
    Vector3::new(20_000_000.0, 0.0, f64::NEG_INFINITY),
    Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84, 0.0, 0.0)
)]
fn site_pos_non_finite_position(#[case] sat: Vector3<f64>, #[case] site: Vector3<f64>) {
    init_logger();

    let dataset = ObservationSet::gnss(
        vec![Vector3::new(20_000_000.0, 0.0, 0.0), sat],
        vec![Vector3::new(EARTH_SEMI_MAJOR_AXIS_WGS84, 0.0, 0.0), site],
        vec![13_621_863.0; 2],
    )
    .unwrap();

    let expected = Err(Error::DegenerateGeometry { indices: vec![1] });

    let cfg = Config::default();
    assert_eq!(SitePosition::new(&cfg).compute(&dataset), expected);
    assert_eq!(SatellitePosition::new(&cfg).compute(&dataset), expected);
}

#[test]
fn site_pos_min_range() {
    let dataset = ObservationSet::gnss(
        vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0E7, 0.0, 0.0)],
        vec![Vector3::zeros(), Vector3::zeros()],
        vec![1.0, 1.0E7],
    )
    .unwrap();

    // reference behavior: tiny ranges are accepted
    let partials = build_provider().compute(&dataset).unwrap();
    assert_eq!(partials.matrix()[(0, 0)], 1.0);

    let cfg = Config::default().with_min_range_m(1.0E3);
    let provider = SitePosition::new(&cfg);

    assert_eq!(
        provider.compute(&dataset),
        Err(Error::DegenerateGeometry { indices: vec![0] })
    );
}

#[test]
fn site_pos_missing_fields() {
    init_logger();

    let provider = build_provider();

    let dataset = ObservationSet::new(3)
        .with_vector3(fields::SAT_POS, vec![Vector3::new(1.0, 0.0, 0.0); 3])
        .unwrap()
        .with_partial_vector3(
            fields::SITE_POS,
            vec![Some(Vector3::zeros()), None, Some(Vector3::zeros())],
        )
        .unwrap()
        .with_scalar(fields::GNSS_RANGE, vec![1.0; 3])
        .unwrap();

    assert_eq!(
        provider.compute(&dataset),
        Err(Error::MissingField {
            field: fields::SITE_POS.to_string(),
            indices: vec![1],
        })
    );

    let dataset = ObservationSet::new(3)
        .with_vector3(fields::SAT_POS, vec![Vector3::new(1.0, 0.0, 0.0); 3])
        .unwrap()
        .with_vector3(fields::SITE_POS, vec![Vector3::zeros(); 3])
        .unwrap();

    assert_eq!(
        provider.compute(&dataset),
        Err(Error::MissingField {
            field: fields::GNSS_RANGE.to_string(),
            indices: vec![],
        })
    );
}

#[test]
fn site_pos_residual_convention() {
    let dataset = reference_dataset(2);

    let omc = SitePosition::new(&Config::default())
        .compute(&dataset)
        .unwrap();

    let cmo = SitePosition::new(&Config::default().with_residual(Residual::ComputedMinusObserved))
        .compute(&dataset)
        .unwrap();

    assert_eq!(cmo.columns(), omc.columns());
    assert_eq!(cmo.unit(), omc.unit());
    assert_eq!(cmo.matrix(), &(-omc.matrix()));
}

#[test]
fn sat_pos_opposes_site_pos() {
    let cfg = Config::default();
    let dataset = reference_dataset(3);

    let site = SitePosition::new(&cfg).compute(&dataset).unwrap();
    let sat = SatellitePosition::new(&cfg).compute(&dataset).unwrap();

    assert_eq!(sat.columns(), &["x", "y", "z"]);
    assert_eq!(sat.unit(), Unit::Dimensionless);
    assert_eq!(sat.matrix(), &(-site.matrix()));

    assert_eq!(
        SatellitePosition::new(&cfg).dependencies(),
        SitePosition::new(&cfg).dependencies()
    );
}

#[test]
fn partials_contract() {
    use nalgebra::DMatrix;

    assert_eq!(
        Partials::new(
            DMatrix::zeros(2, 2),
            vec!["a".to_string()],
            Unit::Meter
        ),
        Err(Error::ColumnMismatch {
            columns: 2,
            names: 1
        })
    );

    assert_eq!(
        Partials::new(
            DMatrix::zeros(2, 2),
            vec!["a".to_string(), "a".to_string()],
            Unit::Meter
        ),
        Err(Error::DuplicateColumn("a".to_string()))
    );

    let partials = Partials::new(
        DMatrix::from_element(2, 1, 3.0),
        vec!["a".to_string()],
        Unit::Second,
    )
    .unwrap();

    let (matrix, columns, unit) = partials.into_parts();
    assert_eq!(matrix, DMatrix::from_element(2, 1, 3.0));
    assert_eq!(columns, vec!["a".to_string()]);
    assert_eq!(unit, Unit::Second);
}
