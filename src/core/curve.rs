use serde::{Deserialize, Serialize};

/// Curve used to connect consecutive points of a band edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Smoothed uniform cubic B-spline; does not pass through inner points.
    Basis,
    #[default]
    Linear,
    /// Step-after: horizontal run, then vertical jump at the next x.
    Step,
}

impl Interpolation {
    pub const ALL: [Self; 3] = [Self::Basis, Self::Linear, Self::Step];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basis => "basis",
            Self::Linear => "linear",
            Self::Step => "step",
        }
    }
}

/// Segments sampled per B-spline span.
const BASIS_SAMPLES_PER_SPAN: usize = 8;

/// Expands `points` into the polyline drawn for `interpolation`.
#[must_use]
pub fn interpolate(points: &[(f64, f64)], interpolation: Interpolation) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return points.to_vec();
    }

    match interpolation {
        Interpolation::Linear => points.to_vec(),
        Interpolation::Step => {
            let mut out = Vec::with_capacity(points.len() * 2 - 1);
            out.push(points[0]);
            for pair in points.windows(2) {
                out.push((pair[1].0, pair[0].1));
                out.push(pair[1]);
            }
            out
        }
        Interpolation::Basis => basis(points),
    }
}

fn basis(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    // Clamp both ends by repeating the end points so the curve starts and
    // ends exactly on them.
    let mut control = Vec::with_capacity(points.len() + 4);
    control.push(points[0]);
    control.push(points[0]);
    control.extend_from_slice(points);
    let last = points[points.len() - 1];
    control.push(last);
    control.push(last);

    let mut out = Vec::with_capacity((control.len() - 3) * BASIS_SAMPLES_PER_SPAN + 1);
    for window in control.windows(4) {
        for step in 0..BASIS_SAMPLES_PER_SPAN {
            let t = step as f64 / BASIS_SAMPLES_PER_SPAN as f64;
            out.push(basis_point(window, t));
        }
    }
    out.push(last);
    dedup_consecutive(out)
}

fn basis_point(p: &[(f64, f64)], t: f64) -> (f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let b0 = (1.0 - t).powi(3) / 6.0;
    let b1 = (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0;
    let b2 = (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0;
    let b3 = t3 / 6.0;
    (
        b0 * p[0].0 + b1 * p[1].0 + b2 * p[2].0 + b3 * p[3].0,
        b0 * p[0].1 + b1 * p[1].1 + b2 * p[2].1 + b3 * p[3].1,
    )
}

fn dedup_consecutive(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    for point in points {
        let duplicate = out.last().is_some_and(|last| {
            (last.0 - point.0).abs() <= 1e-9 && (last.1 - point.1).abs() <= 1e-9
        });
        if !duplicate {
            out.push(point);
        }
    }
    out
}
