#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use oxsdatatypes::Double;
use sparexpr::{
    ArgumentKind, EvalError, FunctionRegistry, FunctionSignature, NativeValue, deg_to_rad,
};
use sparterm::vocab::xsd;
use sparterm::{Literal, NamedNodeRef, Term};

/// Mean radius of the Earth used by [`great_circle_distance`], in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6372.795;

/// Registers the geodistance extension functions in the [`FunctionRegistry`]
pub fn register_geo_functions(registry: FunctionRegistry) -> FunctionRegistry {
    registry.with_function(
        gcd_functions::GCDISTANCE,
        FunctionSignature::new([ArgumentKind::Numeric; 4]),
        gcdistance,
    )
}

/// List of extension functions registered by [`register_geo_functions`]
pub const GEO_EXTENSION_FUNCTIONS: [NamedNodeRef<'static>; 1] = [gcd_functions::GCDISTANCE];

/// Returns the great-circle distance in kilometers between two points given by their
/// latitude and longitude in degrees.
///
/// Coordinates are not range checked.
///
/// ```
/// use spargcd::{EARTH_RADIUS_KM, great_circle_distance};
///
/// assert_eq!(great_circle_distance(48.85, 2.35, 48.85, 2.35), 0.);
/// let pole_to_pole = great_circle_distance(90., 0., -90., 0.);
/// assert!((pole_to_pole - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
/// ```
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = deg_to_rad(lat1);
    let lat2 = deg_to_rad(lat2);
    let delta_lat = lat2 - lat1;
    let delta_lon = deg_to_rad((lon2 - lon1).abs());
    let h = (delta_lat / 2.).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.).sin().powi(2);
    // rounding may push h slightly above 1 for antipodal points
    2. * h.sqrt().min(1.).asin() * EARTH_RADIUS_KM
}

fn gcdistance(args: &[NativeValue]) -> Result<Term, EvalError> {
    let [lat1, lon1, lat2, lon2] = args else {
        return Err(EvalError::ArityMismatch {
            name: gcd_functions::GCDISTANCE.into(),
            expected: 4,
            actual: args.len(),
        });
    };
    let distance = great_circle_distance(
        lat1.numeric()?,
        lon1.numeric()?,
        lat2.numeric()?,
        lon2.numeric()?,
    );
    tracing::trace!(distance, "computed great-circle distance");
    Ok(Literal::new_typed_literal(Double::from(distance).to_string(), xsd::FLOAT).into())
}

mod gcd_functions {
    use sparterm::NamedNodeRef;

    pub const GCDISTANCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://kasei.us/code/rdf-query/functions/gcdistance");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(args: [f64; 4]) -> Literal {
        match gcdistance(&args.map(NativeValue::Numeric)).unwrap() {
            Term::Literal(literal) => literal,
            term => panic!("expected a literal, got {term}"),
        }
    }

    #[test]
    fn washington_dc_points_are_close() {
        let distance = great_circle_distance(38.898, -77.037, 38.897, -77.036);
        assert!(distance > 0.);
        assert!((distance - 0.140_941_926).abs() < 1e-6, "{distance}");
    }

    #[test]
    fn symmetry() {
        let there = great_circle_distance(48.8566, 2.3522, 51.5074, -0.1278);
        let back = great_circle_distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 343.6).abs() < 1., "{there}");
    }

    #[test]
    fn quarter_meridian() {
        let distance = great_circle_distance(0., 0., 0., 90.);
        assert!((distance - std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let distance = great_circle_distance(0., 0., 0., 180.);
        assert!(!distance.is_nan());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01);
    }

    #[test]
    fn result_is_a_float_literal() {
        let literal = call([38.898, -77.037, 38.897, -77.036]);
        assert_eq!(literal.datatype(), xsd::FLOAT);
        assert_eq!(
            literal.value().parse::<f64>().unwrap(),
            great_circle_distance(38.898, -77.037, 38.897, -77.036)
        );
        assert_eq!(call([10., 20., 10., 20.]).value(), "0");
    }

    #[test]
    fn wrong_argument_count() {
        assert!(matches!(
            gcdistance(&[NativeValue::Numeric(1.)]),
            Err(EvalError::ArityMismatch {
                expected: 4,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn registration() {
        let registry = register_geo_functions(FunctionRegistry::new());
        for name in GEO_EXTENSION_FUNCTIONS {
            assert_eq!(registry.lookup(&name.into(), 4).unwrap().signature().arity(), 4);
        }
    }
}
