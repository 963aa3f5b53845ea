// src/trace/simplify.rs
//! Упрощение контуров (Douglas–Peucker)
//!
//! Допуск задаётся в процентах от периметра контура: `ε = P × S / 100`.
//! Замкнутое кольцо делится на две цепочки опорными точками: первой точкой
//! контура и самой удалённой от неё, дальше каждая цепочка упрощается
//! независимо. Точки с отклонением от хорды меньше `ε` отбрасываются.
//!
//! Опорные точки и выбор точки разбиения не зависят от `ε`, поэтому с ростом
//! силы упрощения число точек не растёт.

use crate::trace::contour::{BorderKind, Contour};

/// Упрощённый многоугольник (не меньше трёх точек)
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedPolygon {
    pub points: Vec<(f64, f64)>,
    pub kind: BorderKind,
    /// Площадь исходного контура со знаком (дыры отрицательны), в пикселях буфера
    pub source_area: f64,
}

/// Упрощает контур с силой `strength` (проценты периметра).
///
/// # Возвращает
/// `None`, если после упрощения осталось меньше трёх точек: такой контур
/// не ограничивает площадь и просто отбрасывается.
#[must_use]
pub fn simplify_contour(contour: &Contour, strength: f64) -> Option<SimplifiedPolygon> {
    let epsilon = contour.perimeter() * (strength.max(0.0) / 100.0);
    let ring: Vec<(f64, f64)> = contour
        .points
        .iter()
        .map(|&(x, y)| (f64::from(x), f64::from(y)))
        .collect();

    let points = simplify_ring(&ring, epsilon);
    if points.len() < 3 {
        return None;
    }
    Some(SimplifiedPolygon {
        points,
        kind: contour.kind,
        source_area: contour.signed_area(),
    })
}

/// Douglas–Peucker для замкнутого кольца (последняя точка соединяется с первой)
#[must_use]
pub fn simplify_ring(ring: &[(f64, f64)], epsilon: f64) -> Vec<(f64, f64)> {
    let n = ring.len();
    if n < 3 {
        return ring.to_vec();
    }

    let first = ring[0];
    let (far, far_dist) = ring
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &p)| (i, distance(first, p)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far_dist <= 0.0 {
        return vec![first];
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[far] = true;

    // индекс n означает снова точку 0
    let mut stack = vec![(0, far), (far, n)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let a = ring[start];
        let b = ring[end % n];

        let mut split = start;
        let mut max_dev = -1.0;
        for (i, &p) in ring.iter().enumerate().take(end).skip(start + 1) {
            let dev = deviation(p, a, b);
            if dev > max_dev {
                max_dev = dev;
                split = i;
            }
        }

        if max_dev >= epsilon {
            keep[split] = true;
            stack.push((start, split));
            stack.push((split, end));
        }
    }

    ring.iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Перпендикулярное отклонение точки `p` от прямой `ab`
fn deviation(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let chord = distance(a, b);
    if chord < f64::EPSILON {
        return distance(a, p);
    }
    ((b.0 - a.0) * (a.1 - p.1) - (a.0 - p.0) * (b.1 - a.1)).abs() / chord
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ступенчатая "окружность" радиуса `r`: центры пикселей границы диска
    fn pixel_circle(r: i32) -> Contour {
        let mut pts = Vec::new();
        let steps = 8 * r;
        for k in 0..steps {
            let t = f64::from(k) / f64::from(steps) * std::f64::consts::TAU;
            let p = (
                (f64::from(r) * t.cos()).round() as i32,
                (f64::from(r) * t.sin()).round() as i32,
            );
            if pts.last() != Some(&p) {
                pts.push(p);
            }
        }
        Contour {
            points: pts,
            kind: BorderKind::Outer,
            parent: None,
        }
    }

    #[test]
    fn square_collapses_to_corners() {
        let c = Contour {
            points: vec![
                (0, 0), (1, 0), (2, 0), (3, 0),
                (3, 1), (3, 2), (3, 3),
                (2, 3), (1, 3), (0, 3),
                (0, 2), (0, 1),
            ],
            kind: BorderKind::Outer,
            parent: None,
        };
        let poly = simplify_contour(&c, 0.3).unwrap();
        assert_eq!(poly.points, [(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0)]);
        assert!((poly.source_area - 16.0).abs() < 1e-9);
    }

    #[test]
    fn zero_strength_keeps_every_point() {
        let c = pixel_circle(6);
        let poly = simplify_contour(&c, 0.0).unwrap();
        assert_eq!(poly.points.len(), c.points.len());
    }

    #[test]
    fn stronger_simplification_never_adds_points() {
        let c = pixel_circle(25);
        let mut previous = usize::MAX;
        for strength in [0.0, 0.05, 0.1, 0.3, 0.5, 1.0, 2.0, 5.0, 10.0, 25.0] {
            let count = simplify_contour(&c, strength).map_or(0, |p| p.points.len());
            assert!(
                count <= previous,
                "strength {strength}: {count} points after {previous}"
            );
            previous = count;
        }
        assert!(previous < c.points.len());
    }

    #[test]
    fn degenerate_contours_are_dropped() {
        let dot = Contour {
            points: vec![(4, 4)],
            kind: BorderKind::Outer,
            parent: None,
        };
        assert!(simplify_contour(&dot, 0.3).is_none());

        let line = Contour {
            points: vec![(0, 0), (1, 0), (2, 0), (3, 0), (2, 0), (1, 0)],
            kind: BorderKind::Outer,
            parent: None,
        };
        assert!(simplify_contour(&line, 0.3).is_none());
    }

    #[test]
    fn deviation_is_perpendicular_distance() {
        assert!((deviation((1.0, 2.0), (0.0, 0.0), (4.0, 0.0)) - 2.0).abs() < 1e-12);
        assert!((deviation((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)) - 5.0).abs() < 1e-12);
    }
}
