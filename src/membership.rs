use crate::error::{Error, Result};
use crate::math::interp_one;

/// Maps a crisp value to a degree of membership in `[0, 1]`
///
/// Construct through the validating constructors; evaluation is total and never
/// divides by zero.
#[derive(Clone, Debug, PartialEq)]
pub enum MembershipFunction {
    /// Rises from 0 at `a` to 1 at `b`, falls back to 0 at `c`
    Triangular { a: f64, b: f64, c: f64 },
    /// 1 on `[b, c]`, linear edges down to 0 at `a` and `d`
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { mean: f64, sigma: f64 },
    /// Linear interpolation between `(x, degree)` points, flat beyond the ends
    Piecewise(Vec<(f64, f64)>),
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        ensure_finite(&[a, b, c])?;

        if a > b || b > c {
            return Err(Error::invalid_shape(format!(
                "triangular parameters must satisfy a <= b <= c, got ({a}, {b}, {c})"
            )));
        }

        Ok(Self::Triangular { a, b, c })
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        ensure_finite(&[a, b, c, d])?;

        if a > b || b > c || c > d {
            return Err(Error::invalid_shape(format!(
                "trapezoidal parameters must satisfy a <= b <= c <= d, got ({a}, {b}, {c}, {d})"
            )));
        }

        Ok(Self::Trapezoidal { a, b, c, d })
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Result<Self> {
        ensure_finite(&[mean, sigma])?;

        if sigma <= 0. {
            return Err(Error::invalid_shape(format!("gaussian sigma must be positive, got {sigma}")));
        }

        Ok(Self::Gaussian { mean, sigma })
    }

    pub fn piecewise(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let points: Vec<_> = points.into_iter().collect();

        if points.is_empty() {
            return Err(Error::invalid_shape("piecewise membership needs at least one point"));
        }

        for &(x, y) in &points {
            ensure_finite(&[x, y])?;

            if !(0. ..=1.).contains(&y) {
                return Err(Error::invalid_shape(format!("degree {y} at {x} is outside [0, 1]")));
            }
        }

        if points.windows(2).any(|w| w[0].0 > w[1].0) {
            return Err(Error::invalid_shape("piecewise points must be sorted by x"));
        }

        Ok(Self::Piecewise(points))
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let degree = match *self {
            Self::Triangular { a, b, c } => {
                if x == b {
                    1.
                } else if x <= a || x >= c {
                    0.
                } else if x < b {
                    // a < x < b, so b > a
                    (x - a) / (b - a)
                } else {
                    // b < x < c, so c > b
                    (c - x) / (c - b)
                }
            },
            Self::Trapezoidal { a, b, c, d } => {
                if b <= x && x <= c {
                    1.
                } else if x <= a || x >= d {
                    0.
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            },
            Self::Gaussian { mean, sigma } => (-(x - mean).powi(2) / (2. * sigma * sigma)).exp(),
            Self::Piecewise(ref points) => interp_one(x, points),
        };

        degree.clamp(0., 1.)
    }
}

fn ensure_finite(params: &[f64]) -> Result<()> {
    if params.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(Error::invalid_shape(format!("parameters must be finite, got {params:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangular_edges() {
        let mf = MembershipFunction::triangular(25., 50., 75.).unwrap();

        assert_eq!(mf.evaluate(25.), 0.);
        assert_eq!(mf.evaluate(37.5), 0.5);
        assert_eq!(mf.evaluate(50.), 1.);
        assert_eq!(mf.evaluate(62.5), 0.5);
        assert_eq!(mf.evaluate(75.), 0.);
        assert_eq!(mf.evaluate(-1000.), 0.);
        assert_eq!(mf.evaluate(1000.), 0.);
    }

    #[test]
    fn test_triangular_degenerate_edges() {
        let left_step = MembershipFunction::triangular(0., 0., 50.).unwrap();

        assert_eq!(left_step.evaluate(0.), 1.);
        assert_eq!(left_step.evaluate(-0.001), 0.);
        assert_eq!(left_step.evaluate(30.), 0.4);

        let right_step = MembershipFunction::triangular(50., 100., 100.).unwrap();

        assert_eq!(right_step.evaluate(100.), 1.);
        assert_eq!(right_step.evaluate(100.001), 0.);
        assert_eq!(right_step.evaluate(75.), 0.5);

        let spike = MembershipFunction::triangular(5., 5., 5.).unwrap();

        assert_eq!(spike.evaluate(5.), 1.);
        assert_eq!(spike.evaluate(5.1), 0.);
        assert_eq!(spike.evaluate(4.9), 0.);
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(matches!(MembershipFunction::triangular(2., 1., 3.), Err(Error::InvalidShape(_))));
        assert!(matches!(MembershipFunction::triangular(0., 3., 2.), Err(Error::InvalidShape(_))));
        assert!(matches!(MembershipFunction::triangular(0., f64::NAN, 2.), Err(Error::InvalidShape(_))));
        assert!(matches!(
            MembershipFunction::trapezoidal(0., 2., 1., 3.),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(MembershipFunction::gaussian(0., 0.), Err(Error::InvalidShape(_))));
        assert!(matches!(MembershipFunction::piecewise(Vec::<(f64, f64)>::new()), Err(Error::InvalidShape(_))));
        assert!(matches!(
            MembershipFunction::piecewise([(1., 0.), (0., 1.)]),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            MembershipFunction::piecewise([(0., 1.5)]),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_trapezoidal() {
        let mf = MembershipFunction::trapezoidal(0., 10., 20., 40.).unwrap();

        assert_eq!(mf.evaluate(5.), 0.5);
        assert_eq!(mf.evaluate(10.), 1.);
        assert_eq!(mf.evaluate(15.), 1.);
        assert_eq!(mf.evaluate(30.), 0.5);
        assert_eq!(mf.evaluate(40.), 0.);

        let shoulder = MembershipFunction::trapezoidal(0., 0., 10., 20.).unwrap();

        assert_eq!(shoulder.evaluate(0.), 1.);
    }

    #[test]
    fn test_gaussian() {
        let mf = MembershipFunction::gaussian(50., 10.).unwrap();

        assert_eq!(mf.evaluate(50.), 1.);
        assert!((mf.evaluate(60.) - (-0.5f64).exp()).abs() < 1e-12);
        assert_eq!(mf.evaluate(40.), mf.evaluate(60.));
    }

    #[test]
    fn test_piecewise() {
        let mf = MembershipFunction::piecewise([(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]).unwrap();

        assert_eq!(mf.evaluate(150.), 0.);
        assert!((mf.evaluate(182.5) - 0.45).abs() < 1e-12);
        assert_eq!(mf.evaluate(200.), 1.);
    }
}
