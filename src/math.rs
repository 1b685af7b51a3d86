use num::Float;

/// Similar to numpy.interp for a single point: values left of the first coordinate take
/// the first `y`, values right of the last take the last `y`.
///
/// `coords` must be sorted by `x`. With no coordinates the result is zero.
pub fn interp_one<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(first_x, first_y)), Some(&(last_x, last_y))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    if x <= first_x {
        return first_y;
    }
    if x >= last_x {
        return last_y;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        // Half-open so a vertical segment resolves to its right-hand value
        if x1 <= x && x < x2 {
            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Only reachable for NaN, which compares false everywhere above
    x
}

/// Similar to numpy.interp
pub fn interp<F: Float>(x_input: &[F], coords: &[(F, F)]) -> Vec<F> {
    x_input.iter().map(|&x| interp_one(x, coords)).collect()
}

/// Center of gravity of a sampled fuzzy set: `Σ(p * d) / Σ(d)`
///
/// Returns `None` when the set has no mass.
pub fn centroid<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    debug_assert_eq!(universe.len(), membership.len());

    let (num, den) = universe
        .iter()
        .zip(membership)
        .fold((F::zero(), F::zero()), |(num, den), (&p, &d)| (num + p * d, den + d));

    if den == F::zero() {
        None
    } else {
        Some(num / den)
    }
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let coords = [(1., 3.), (2., 2.), (3., 0.)];

    assert_eq!(interp(&x, &coords), vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(interp(&x, &coords), vec![4., 0., 2.]);
}

#[test]
fn test_interp_vertical_segment() {
    let coords = [(0., 0.), (5., 0.), (5., 1.), (10., 1.)];

    assert_eq!(interp_one(5., &coords), 1.);
    assert_eq!(interp_one(2.5, &coords), 0.);
}

#[test]
fn test_interp_no_coords() {
    assert_eq!(interp_one(3., &[]), 0.);
    assert_eq!(interp(&[1., 2.], &[]), vec![0., 0.]);
}

#[test]
fn test_centroid() {
    let universe = [0., 1., 2., 3., 4.];

    assert_eq!(centroid(&universe, &[0., 1., 1., 1., 0.]), Some(2.));
    assert_eq!(centroid(&universe, &[1., 0., 0., 0., 0.]), Some(0.));
    assert_eq!(centroid(&universe, &[0.; 5]), None);
}
