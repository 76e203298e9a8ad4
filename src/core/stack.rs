//! Stack layout for area bands.
//!
//! Mirrors the classic stack layout: an *order* decides which series sits
//! closest to the baseline and an *offset* decides where the baseline is.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::series::SeriesSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StackOffset {
    /// Baseline at zero.
    #[default]
    Zero,
    /// Every column normalized to sum to one.
    Expand,
    /// Baseline shifted so every column is centered on half the tallest column.
    Silhouette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StackOrder {
    /// Input order.
    #[default]
    Default,
    /// Series peaking earliest sit in the middle, later peaks alternate outwards.
    InsideOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

/// Stacked geometry of one visible series, in data units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBand {
    pub key: String,
    /// Position of the series in the full (unfiltered by disabled flags) list.
    pub series_index: usize,
    pub points: Vec<BandPoint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackLayout {
    /// Visible bands in series order.
    pub bands: Vec<StackedBand>,
}

impl StackLayout {
    /// `(min, max)` over every finite band edge; `(0, 1)` when there is none.
    #[must_use]
    pub fn value_extent(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let edges = self
            .bands
            .iter()
            .flat_map(|band| band.points.iter().flat_map(|point| [point.y0, point.y1]))
            .filter(|edge| edge.is_finite());
        for edge in edges {
            min = min.min(edge);
            max = max.max(edge);
        }
        if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (0.0, 1.0)
        }
    }

    /// `(min, max)` over finite x values, `None` when there are none.
    #[must_use]
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let mut xs = self
            .bands
            .iter()
            .flat_map(|band| band.points.iter().map(|point| point.x))
            .filter(|x| x.is_finite())
            .peekable();
        xs.peek()?;
        let (min, max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        Some((min, max))
    }
}

/// Stacks the series whose `disabled` flag is not set.
///
/// All series must share the same x positions, which holds for output of
/// `SeriesBuilder::build`. Missing samples contribute zero height. Edges
/// whose sum overflows are clamped to the largest finite value.
#[must_use]
pub fn stack_series(
    series: &[SeriesSpec],
    disabled: &[bool],
    order: StackOrder,
    offset: StackOffset,
) -> StackLayout {
    let visible: Vec<usize> = (0..series.len())
        .filter(|&index| !disabled.get(index).copied().unwrap_or(false))
        .collect();
    if visible.is_empty() {
        return StackLayout::default();
    }

    let columns = visible
        .iter()
        .map(|&index| series[index].values.len())
        .min()
        .unwrap_or(0);

    // heights[v][j]: value of visible series v at column j.
    let mut heights: Vec<Vec<f64>> = visible
        .iter()
        .map(|&index| {
            series[index].values[..columns]
                .iter()
                .map(|point| point.stack_value())
                .collect()
        })
        .collect();

    let baseline = apply_offset(&mut heights, columns, offset);
    let stack_order = resolve_order(&heights, order);

    let mut lower: Vec<Vec<f64>> = vec![vec![0.0; columns]; visible.len()];
    for column in 0..columns {
        let mut running = baseline[column];
        for &v in &stack_order {
            lower[v][column] = running;
            running = clamp_finite(running + heights[v][column]);
        }
    }

    let bands = visible
        .iter()
        .enumerate()
        .map(|(v, &index)| {
            let source = &series[index];
            let points = (0..columns)
                .map(|column| BandPoint {
                    x: source.values[column].x,
                    y0: lower[v][column],
                    y1: clamp_finite(lower[v][column] + heights[v][column]),
                })
                .collect();
            StackedBand {
                key: source.key.clone(),
                series_index: index,
                points,
            }
        })
        .collect();

    StackLayout { bands }
}

fn apply_offset(heights: &mut [Vec<f64>], columns: usize, offset: StackOffset) -> Vec<f64> {
    let sums: Vec<f64> = (0..columns)
        .map(|column| heights.iter().map(|row| row[column]).sum())
        .collect();

    match offset {
        StackOffset::Zero => vec![0.0; columns],
        StackOffset::Expand => {
            let count = heights.len() as f64;
            for (column, &sum) in sums.iter().enumerate() {
                // Rescale by the largest magnitude so an overflowing sum still divides.
                let (scale, sum) = if sum.is_finite() {
                    (1.0, sum)
                } else {
                    let largest = heights
                        .iter()
                        .map(|row| row[column].abs())
                        .fold(0.0, f64::max);
                    let scaled: f64 = heights.iter().map(|row| row[column] / largest).sum();
                    (largest, scaled)
                };
                for row in heights.iter_mut() {
                    row[column] = if sum != 0.0 {
                        row[column] / scale / sum
                    } else {
                        1.0 / count
                    };
                }
            }
            vec![0.0; columns]
        }
        StackOffset::Silhouette => {
            let sums: Vec<f64> = sums.into_iter().map(clamp_finite).collect();
            let max = sums
                .iter()
                .copied()
                .map(OrderedFloat)
                .max()
                .map_or(0.0, |max| max.0);
            sums.iter().map(|sum| max / 2.0 - sum / 2.0).collect()
        }
    }
}

fn clamp_finite(value: f64) -> f64 {
    value.clamp(-f64::MAX, f64::MAX)
}

fn resolve_order(heights: &[Vec<f64>], order: StackOrder) -> Vec<usize> {
    match order {
        StackOrder::Default => (0..heights.len()).collect(),
        StackOrder::InsideOut => {
            let peak: Vec<usize> = heights
                .iter()
                .map(|row| {
                    row.iter()
                        .enumerate()
                        .max_by_key(|(position, value)| {
                            (OrderedFloat(**value), std::cmp::Reverse(*position))
                        })
                        .map_or(0, |(position, _)| position)
                })
                .collect();
            let sums: Vec<f64> = heights.iter().map(|row| row.iter().sum()).collect();

            let mut by_peak: Vec<usize> = (0..heights.len()).collect();
            by_peak.sort_by_key(|&index| peak[index]);

            let mut top = 0.0;
            let mut bottom = 0.0;
            let mut tops = Vec::new();
            let mut bottoms = Vec::new();
            for index in by_peak {
                if top < bottom {
                    top += sums[index];
                    tops.push(index);
                } else {
                    bottom += sums[index];
                    bottoms.push(index);
                }
            }
            bottoms.reverse();
            bottoms.extend(tops);
            bottoms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StackOffset, StackOrder, apply_offset, clamp_finite, resolve_order};

    #[test]
    fn inside_out_alternates_around_the_earliest_peak() {
        let heights = vec![
            vec![0.0, 0.0, 5.0],
            vec![5.0, 0.0, 0.0],
            vec![0.0, 5.0, 0.0],
        ];
        // Peaks: series 1 at 0, series 2 at 1, series 0 at 2.
        // 1 -> bottom, 2 -> top, 0 -> bottom; bottoms are reversed.
        let order = resolve_order(&heights, StackOrder::InsideOut);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn overflowing_columns_stay_finite() {
        assert_eq!(clamp_finite(f64::INFINITY), f64::MAX);
        assert_eq!(clamp_finite(f64::NEG_INFINITY), -f64::MAX);

        let mut heights = vec![vec![1e308, 1.0], vec![1e308, 3.0]];
        let baseline = apply_offset(&mut heights, 2, StackOffset::Expand);
        assert_eq!(baseline, vec![0.0, 0.0]);
        assert!((heights[0][0] - 0.5).abs() < 1e-12);
        assert!((heights[1][1] - 0.75).abs() < 1e-12);

        let mut heights = vec![vec![1e308, 1.0], vec![1e308, 1.0]];
        let baseline = apply_offset(&mut heights, 2, StackOffset::Silhouette);
        assert!(baseline.iter().all(|value| value.is_finite()));
        assert_eq!(baseline[0], 0.0);
    }
}
