// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! View limits and tick location

use super::{Axis, AxesId, Figure};
use smallvec::SmallVec;

/// Fraction of the data range added on each side of auto-scaled limits
const MARGIN: f64 = 0.05;

/// Upper bound on the number of intervals between auto-located ticks
const MAX_INTERVALS: f64 = 6.0;

const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Tick locations beyond this count are not generated
const MAX_TICKS: f64 = 1000.0;

/// Resolved ticks for one axis of a plot area
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisTicks {
    /// View limits `(lo, hi)`
    pub limits: (f64, f64),
    /// Major tick positions with labels
    pub major: Vec<(f64, String)>,
    /// Minor tick positions (empty unless minor ticks are enabled)
    pub minor: Vec<f64>,
}

impl Figure {
    /// View limits of `axis` for plot area `id`
    ///
    /// Explicit limits win (own first, then those of axes sharing this axis).
    /// Otherwise the union of data ranges across the share group is padded
    /// by a 5% margin. Empty plots get `(0, 1)`.
    pub fn view_limits(&self, id: AxesId, axis: Axis) -> (f64, f64) {
        let settings = |ax: &super::Axes| match axis {
            Axis::X => ax.x.limits,
            Axis::Y => ax.y.limits,
        };
        if let Some(limits) = settings(&self[id]) {
            return limits;
        }
        if let Some(limits) = self.share_peers(id, axis).find_map(settings) {
            return limits;
        }

        let range = self
            .share_peers(id, axis)
            .filter_map(|ax| ax.data_range(axis))
            .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)));
        match range {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => {
                let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
                (lo - pad, hi + pad)
            }
            Some((lo, hi)) => {
                let pad = (hi - lo) * MARGIN;
                (lo - pad, hi + pad)
            }
        }
    }

    /// Resolve tick positions and labels of `axis` for plot area `id`
    pub fn axis_ticks(&self, id: AxesId, axis: Axis) -> AxisTicks {
        let ax = &self[id];
        let settings = match axis {
            Axis::X => &ax.x,
            Axis::Y => &ax.y,
        };
        let limits = self.view_limits(id, axis);
        let (lo, hi) = (limits.0.min(limits.1), limits.0.max(limits.1));

        let (positions, step): (SmallVec<[f64; 8]>, Option<f64>) = match &settings.ticks {
            Some(ticks) => {
                let step = match ticks.as_slice() {
                    [a, b, ..] if b > a => Some(b - a),
                    _ => None,
                };
                (ticks.iter().copied().collect(), step)
            }
            None => {
                let step = nice_step(hi - lo);
                (locate(lo, hi, step), Some(step))
            }
        };

        let major: Vec<(f64, String)> = match &settings.tick_labels {
            Some(labels) => positions
                .iter()
                .enumerate()
                .map(|(i, v)| (*v, labels.get(i).cloned().unwrap_or_default()))
                .collect(),
            None => {
                let decimals = step.map(decimals_for).unwrap_or(0);
                positions
                    .iter()
                    .map(|v| (*v, format_tick(*v, decimals)))
                    .collect()
            }
        };

        let minor = match step {
            Some(step) if ax.minor_visible => {
                let minor_step = step / minor_divisions(step);
                locate(lo, hi, minor_step)
                    .into_iter()
                    .filter(|v| !positions.iter().any(|p| (p - v).abs() < minor_step * 1e-6))
                    .collect()
            }
            _ => vec![],
        };

        AxisTicks {
            limits,
            major,
            minor,
        }
    }
}

fn nice_step(range: f64) -> f64 {
    if !(range > 0.0) || !range.is_finite() {
        return 1.0;
    }
    let raw = range / MAX_INTERVALS;
    let magnitude = 10f64.powf(raw.log10().floor());
    NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

fn locate(lo: f64, hi: f64, step: f64) -> SmallVec<[f64; 8]> {
    let mut ticks = SmallVec::new();
    if !(step > 0.0) || !lo.is_finite() || !hi.is_finite() {
        return ticks;
    }
    if (hi - lo) / step > MAX_TICKS {
        log::warn!("locate: step {step} over [{lo}, {hi}] exceeds {MAX_TICKS} ticks; none drawn");
        return ticks;
    }
    let eps = step * 1e-9;
    let first = ((lo - eps) / step).ceil() as i64;
    let last = ((hi + eps) / step).floor() as i64;
    for i in first..=last {
        let v = i as f64 * step;
        // avoid "-0" and accumulated float noise near zero
        ticks.push(if v.abs() < eps { 0.0 } else { v });
    }
    ticks
}

fn minor_divisions(step: f64) -> f64 {
    let mantissa = 10f64.powf(step.log10().rem_euclid(1.0));
    if [1.0, 2.5, 5.0, 10.0]
        .iter()
        .any(|m| (mantissa - m).abs() < 1e-6)
    {
        5.0
    } else {
        4.0
    }
}

fn decimals_for(step: f64) -> usize {
    (0..10)
        .find(|d| {
            let scaled = step * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.abs().max(1.0)
        })
        .unwrap_or(10)
}

fn format_tick(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    // "-0", "-0.0"
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::figure::Share;
    use crate::RcParams;

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(10.0), 2.0);
        assert!((nice_step(1.0) - 0.2).abs() < 1e-12);
        assert_eq!(nice_step(100.0), 20.0);
        assert_eq!(nice_step(13.0), 2.5);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn locate_ticks() {
        assert_eq!(
            locate(-0.45, 10.45, 2.0).as_slice(),
            &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
        assert_eq!(locate(0.0, 1.0, 0.25).len(), 5);
    }

    #[test]
    fn labels() {
        assert_eq!(decimals_for(2.0), 0);
        assert_eq!(decimals_for(0.25), 2);
        assert_eq!(decimals_for(0.2), 1);
        assert_eq!(format_tick(-0.0, 1), "0.0");
        assert_eq!(format_tick(2.5, 2), "2.50");
        assert_eq!(format_tick(-3.0, 0), "-3");
    }

    #[test]
    fn minor() {
        assert_eq!(minor_divisions(1.0), 5.0);
        assert_eq!(minor_divisions(0.5), 5.0);
        assert_eq!(minor_divisions(2.0), 4.0);
        assert_eq!(minor_divisions(25.0), 5.0);
    }

    #[test]
    fn explicit_ticks_and_labels() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let id = fig.subplots(1, 1, Share::None, Share::None).unwrap()[0];
        fig[id].set_xlim(0.0, 11.0);
        fig[id].set_xticks(&[0.0, 5.0, 10.0]);
        fig[id].set_xticklabels(&["zero", "five"]);
        let ticks = fig.axis_ticks(id, Axis::X);
        assert_eq!(ticks.limits, (0.0, 11.0));
        assert_eq!(
            ticks.major,
            [
                (0.0, "zero".to_string()),
                (5.0, "five".to_string()),
                (10.0, String::new())
            ]
        );
        assert!(ticks.minor.is_empty());
    }

    #[test]
    fn auto_limits_and_minor() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let id = fig.subplots(1, 1, Share::None, Share::None).unwrap()[0];
        assert_eq!(fig.view_limits(id, Axis::Y), (0.0, 1.0));

        fig[id].plot(&[0.0, 10.0], &[5.0, 5.0]).unwrap();
        assert_eq!(fig.view_limits(id, Axis::X), (-0.5, 10.5));
        let (lo, hi) = fig.view_limits(id, Axis::Y);
        assert!(lo < 5.0 && hi > 5.0);

        fig[id].minorticks_on();
        let ticks = fig.axis_ticks(id, Axis::X);
        let majors: Vec<f64> = ticks.major.iter().map(|(v, _)| *v).collect();
        assert_eq!(majors, [0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks.major[1].1, "2");
        assert!(ticks.minor.contains(&0.5));
        assert!(!ticks.minor.contains(&2.0));
    }

    #[test]
    fn too_many_ticks() {
        assert!(locate(0.0, 1e6, 1e-3).is_empty());
        assert_eq!(locate(0.0, 1000.0, 1.0).len(), 1001);

        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let id = fig.subplots(1, 1, Share::None, Share::None).unwrap()[0];
        fig[id].set_xlim(0.0, 1e6);
        fig[id].set_xticks(&[0.0, 1e-3]);
        fig[id].minorticks_on();
        let ticks = fig.axis_ticks(id, Axis::X);
        assert_eq!(ticks.major.len(), 2);
        assert!(ticks.minor.is_empty());
    }

    #[test]
    fn shared_limits() {
        let mut fig = Figure::new(4.0, 3.0, RcParams::default());
        let grid = fig.subplots(1, 2, Share::All, Share::All).unwrap();
        fig[grid[0]].plot(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        fig[grid[1]].plot(&[0.0, 1.0], &[0.0, 9.0]).unwrap();
        assert_eq!(
            fig.view_limits(grid[0], Axis::Y),
            fig.view_limits(grid[1], Axis::Y)
        );
        fig[grid[1]].set_xlim(-2.0, 2.0);
        assert_eq!(fig.view_limits(grid[0], Axis::X), (-2.0, 2.0));
    }
}
