// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Polyline clipping and dashing

use crate::figure::Rect;

pub type Point = (f64, f64);

/// Clip segment `a → b` to `rect` (Liang–Barsky)
pub fn clip_segment(a: Point, b: Point, rect: &Rect) -> Option<(Point, Point)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    let checks = [
        (-dx, a.0 - rect.x),
        (dx, rect.right() - a.0),
        (-dy, a.1 - rect.y),
        (dy, rect.bottom() - a.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Clip a polyline to `rect`, splitting where it leaves the rect
///
/// Non-finite points break the line.
pub fn clip_polyline(points: &[Point], rect: &Rect) -> Vec<Vec<Point>> {
    let mut out: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let finite = a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite();
        match clip_segment(a, b, rect).filter(|_| finite) {
            Some((p, q)) => {
                if current.last() != Some(&p) {
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                current.push(q);
            }
            None => {
                if current.len() > 1 {
                    out.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        out.push(current);
    }
    out
}

/// Split a polyline into the "on" pieces of a dash `pattern`
pub fn dash_polyline(points: &[Point], pattern: &[f64]) -> Vec<Vec<Point>> {
    let total: f64 = pattern.iter().sum();
    if pattern.is_empty() || !(total > 0.0) {
        return vec![points.to_vec()];
    }

    let mut out = Vec::new();
    let mut index = 0;
    let mut remaining = pattern[0];
    let mut current = points.first().map(|p| vec![*p]).unwrap_or_default();

    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        while len > remaining {
            let t = remaining / len;
            let p = (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1));
            if index % 2 == 0 {
                current.push(p);
                out.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            len -= remaining;
            a = p;
            index = (index + 1) % pattern.len();
            remaining = pattern[index];
        }
        remaining -= len;
        if index % 2 == 0 {
            current.push(b);
        }
    }
    if index % 2 == 0 && current.len() > 1 {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn clip_inside_and_outside() {
        let r = rect();
        assert_eq!(
            clip_segment((1.0, 1.0), (9.0, 9.0), &r),
            Some(((1.0, 1.0), (9.0, 9.0)))
        );
        assert_eq!(
            clip_segment((-5.0, 5.0), (15.0, 5.0), &r),
            Some(((0.0, 5.0), (10.0, 5.0)))
        );
        assert_eq!(clip_segment((11.0, 0.0), (20.0, 5.0), &r), None);
        assert_eq!(clip_segment((-1.0, -1.0), (-1.0, 20.0), &r), None);
    }

    #[test]
    fn polyline_splits_on_exit() {
        let points = [(1.0, 1.0), (5.0, 5.0), (5.0, 25.0), (8.0, 25.0), (8.0, 0.0)];
        let parts = clip_polyline(&points, &rect());
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], [(1.0, 1.0), (5.0, 5.0), (5.0, 10.0)]);
        assert_eq!(parts[1], [(8.0, 10.0), (8.0, 0.0)]);

        let gap = [(1.0, 1.0), (f64::NAN, 2.0), (3.0, 3.0), (4.0, 4.0)];
        assert_eq!(clip_polyline(&gap, &rect()), [vec![(3.0, 3.0), (4.0, 4.0)]]);
    }

    #[test]
    fn dashes() {
        let line = [(0.0, 0.0), (10.0, 0.0)];
        let parts = dash_polyline(&line, &[2.0, 3.0]);
        assert_eq!(
            parts,
            [
                vec![(0.0, 0.0), (2.0, 0.0)],
                vec![(5.0, 0.0), (7.0, 0.0)],
            ]
        );
        assert_eq!(dash_polyline(&line, &[]), [line.to_vec()]);
    }
}
