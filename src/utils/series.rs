//! Maps numeric series onto a 100x100 plot box for sparkline rendering.
//!
//! Each series is scaled on its own min/max, so amplitudes of different series are not
//! comparable on screen. `y` grows downward (0 is the top edge) to match SVG coordinates.

pub const PLOT_EXTENT: f64 = 100.0;
pub const MIDPOINT: f64 = PLOT_EXTENT / 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Normalized coordinates for one series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sparkline {
    pub points: Vec<PlotPoint>,
}

impl Sparkline {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            points: normalize(values),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `points` attribute for an SVG polyline.
    pub fn polyline(&self) -> String {
        to_polyline(&self.points)
    }
}

/// Finite min and max of the series, `None` when there is no finite value.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// `x` is spread evenly over 0..=100 by index; `y` is `100 - (v - min) / (max - min) * 100`.
/// A flat series and non-finite samples sit on the midpoint. A single sample is placed at x = 0.
pub fn normalize(values: &[f64]) -> Vec<PlotPoint> {
    let Some((min, max)) = value_range(values) else {
        return values
            .iter()
            .enumerate()
            .map(|(i, _)| PlotPoint { x: x_position(i, values.len()), y: MIDPOINT })
            .collect();
    };
    let span = max - min;

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let y = if span == 0.0 || !v.is_finite() {
                MIDPOINT
            } else {
                PLOT_EXTENT - ((v - min) / span) * PLOT_EXTENT
            };
            PlotPoint { x: x_position(i, values.len()), y }
        })
        .collect()
}

fn x_position(index: usize, len: usize) -> f64 {
    if len <= 1 {
        0.0
    } else {
        index as f64 / (len - 1) as f64 * PLOT_EXTENT
    }
}

pub fn to_polyline(points: &[PlotPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
