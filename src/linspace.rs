use crate::error::{Error, Result};

// Absorbs float noise in (max - min) / step so that e.g. 0..=1 step 0.1 keeps its endpoint
const GRID_EPSILON: f64 = 1e-9;

/// Largest number of samples a grid may hold
pub const MAX_GRID_POINTS: usize = 1 << 24;

/// Lazily generated grid `start + i * step` for `i` in `0..len`
#[derive(Clone, Debug)]
pub struct Linspace {
    start: f64,
    step: f64,
    next: usize,
    len: usize,
}

impl Linspace {
    /// `n` evenly spaced points from `min` to `max` inclusive, like numpy.linspace
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = match n {
            0 | 1 => 0.,
            _ => (max - min) / (n - 1) as f64,
        };

        Linspace {
            start: min,
            step,
            next: 0,
            len: n,
        }
    }

    /// Points `min, min + step, ...` that do not pass `max`, like numpy.arange with an
    /// inclusive end
    ///
    /// Fails when the bounds or step are unusable, or when the grid would exceed
    /// [`MAX_GRID_POINTS`] samples.
    pub fn stepped(min: f64, max: f64, step: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::invalid_universe(format!("bounds must be finite, got {min}..{max}")));
        }
        if !(step.is_finite() && step > 0.) {
            return Err(Error::invalid_universe(format!("step must be positive, got {step}")));
        }
        if max < min {
            return Err(Error::invalid_universe(format!("max {max} is below min {min}")));
        }

        let span = max - min;

        if !span.is_finite() {
            return Err(Error::invalid_universe(format!("span of {min}..{max} overflows")));
        }

        let intervals = (span / step + GRID_EPSILON).floor();

        if !intervals.is_finite() || intervals >= MAX_GRID_POINTS as f64 {
            return Err(Error::invalid_universe(format!(
                "{min}..{max} by {step} needs more than {MAX_GRID_POINTS} points"
            )));
        }

        let len = (intervals as usize)
            .checked_add(1)
            .ok_or_else(|| Error::invalid_universe(format!("{min}..{max} by {step} has too many points")))?;

        Ok(Linspace {
            start: min,
            step,
            next: 0,
            len,
        })
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.next == self.len {
            return None;
        }

        let point = self.start + self.step * self.next as f64;

        self.next += 1;

        Some(point)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;

        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Linspace {}

/// An ordered, strictly increasing, finite sequence of sample points
///
/// Immutable once built. Used both to discretize membership functions and to
/// integrate numerically during defuzzification.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    points: Vec<f64>,
}

impl Universe {
    /// Points `min, min + step, ...` up to and including `max` when it lies on the grid
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        let points: Vec<f64> = Linspace::stepped(min, max, step)?.collect();

        // A step below the float spacing at this magnitude collapses neighbours
        if points.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::invalid_universe(format!(
                "step {step} is too small to separate points near {min}"
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a universe holds at least one point
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.points[0]
    }

    pub fn max(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}

#[test]
fn test_linspace() {
    let points: Vec<_> = Linspace::new(0., 1., 5).collect();

    assert_eq!(points, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3., 3., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(Linspace::new(0., 1., 0).len(), 0);
}

#[test]
fn test_linspace_stepped() {
    let grid = Linspace::stepped(0., 10., 2.5).unwrap();

    assert_eq!(grid.len(), 5);
    assert_eq!(grid.collect::<Vec<_>>(), vec![0., 2.5, 5., 7.5, 10.]);
    assert!(Linspace::stepped(0., 1e9, 1e-6).is_err());
}

#[test]
fn test_universe_inclusive_grid() {
    let universe = Universe::new(0., 100., 1.).unwrap();

    assert_eq!(universe.len(), 101);
    assert_eq!(universe.min(), 0.);
    assert_eq!(universe.max(), 100.);

    let universe = Universe::new(0., 1., 0.1).unwrap();

    assert_eq!(universe.len(), 11);
    assert!((universe.max() - 1.).abs() < 1e-12);
    assert!(universe.points().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_universe_off_grid_max() {
    // 0, 3, 6, 9: 10 is not on the grid
    let universe = Universe::new(0., 10., 3.).unwrap();

    assert_eq!(universe.points(), &[0., 3., 6., 9.]);
}

#[test]
fn test_universe_rejects_bad_parameters() {
    assert!(matches!(Universe::new(0., 10., 0.), Err(Error::InvalidUniverse(_))));
    assert!(matches!(Universe::new(0., 10., -1.), Err(Error::InvalidUniverse(_))));
    assert!(matches!(Universe::new(10., 0., 1.), Err(Error::InvalidUniverse(_))));
    assert!(matches!(Universe::new(f64::NAN, 0., 1.), Err(Error::InvalidUniverse(_))));
    // max - min overflows to infinity
    assert!(matches!(Universe::new(-1e308, 1e308, 1.), Err(Error::InvalidUniverse(_))));
    // ~1e15 samples
    assert!(matches!(Universe::new(0., 1e9, 1e-6), Err(Error::InvalidUniverse(_))));
    // span / step overflows
    assert!(matches!(Universe::new(0., 1., f64::MIN_POSITIVE), Err(Error::InvalidUniverse(_))));
    // 1e16 + 1 rounds back to 1e16
    assert!(matches!(Universe::new(1e16, 1e16 + 8., 1.), Err(Error::InvalidUniverse(_))));
    assert_eq!(Universe::new(5., 5., 1.).unwrap().points(), &[5.]);
}
