// src/trace/contour.rs
//! Контуры связных областей маски
//!
//! Контур — замкнутая цепочка центров пикселей границы, полученная обходом
//! границы (Suzuki–Abe). Соседние точки цепочки отстоят друг от друга на один
//! шаг по 8-связности. Иерархия двухуровневая: внешние границы и дыры, у дыры
//! `parent` указывает на внешнюю границу, внутри которой она лежит.

/// Тип границы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

/// Замкнутый контур в целочисленных координатах (пиксельная сетка буфера)
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<(i32, i32)>,
    pub kind: BorderKind,
    /// Индекс внешнего контура для дыры; `None` у внешних контуров
    pub parent: Option<usize>,
}

impl Contour {
    #[must_use]
    pub fn is_hole(&self) -> bool {
        self.kind == BorderKind::Hole
    }

    /// Длина замкнутой ломаной (диагональный шаг = √2)
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        closed_edges(&self.points)
            .map(|((x0, y0), (x1, y1))| f64::from(x1 - x0).hypot(f64::from(y1 - y0)))
            .sum()
    }

    /// Ориентированная площадь многоугольника по центрам пикселей (формула шнурков)
    #[must_use]
    pub fn shoelace_area(&self) -> f64 {
        let twice: i64 = closed_edges(&self.points)
            .map(|((x0, y0), (x1, y1))| i64::from(x0) * i64::from(y1) - i64::from(x1) * i64::from(y0))
            .sum();
        twice as f64 / 2.0
    }

    /// Площадь в пикселях, которую ограничивает контур.
    ///
    /// По теореме Пика для цепочки с единичными и диагональными шагами:
    /// - внешняя граница охватывает `S + B/2 + 1` пикселей (сама граница входит),
    /// - дыра содержит `S - B/2 + 1` пикселей фона (граница принадлежит области),
    ///
    /// где `S` — площадь по формуле шнурков, `B` — число шагов цепочки.
    /// Квадрат 4×4 даёт ровно 16, одиночный пиксель — 1.
    #[must_use]
    pub fn enclosed_area(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let area = self.shoelace_area().abs();
        // одиночный пиксель: цепочка без шагов
        let steps = if self.points.len() == 1 { 0 } else { self.points.len() };
        let half_steps = steps as f64 / 2.0;
        match self.kind {
            BorderKind::Outer => area + half_steps + 1.0,
            BorderKind::Hole => (area - half_steps + 1.0).max(0.0),
        }
    }

    /// Площадь со знаком: внешние контуры положительны, дыры отрицательны
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        match self.kind {
            BorderKind::Outer => self.enclosed_area(),
            BorderKind::Hole => -self.enclosed_area(),
        }
    }
}

/// Рёбра замкнутой ломаной, включая замыкающее
fn closed_edges(points: &[(i32, i32)]) -> impl Iterator<Item = ((i32, i32), (i32, i32))> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Обход границы квадрата `side×side` с левым верхним углом в `(x0, y0)`
    fn square_ring(x0: i32, y0: i32, side: i32) -> Vec<(i32, i32)> {
        let s = side - 1;
        let mut pts = Vec::new();
        for x in 0..s {
            pts.push((x0 + x, y0));
        }
        for y in 0..s {
            pts.push((x0 + s, y0 + y));
        }
        for x in (1..=s).rev() {
            pts.push((x0 + x, y0 + s));
        }
        for y in (1..=s).rev() {
            pts.push((x0, y0 + y));
        }
        pts
    }

    #[test]
    fn square_outer_counts_its_pixels() {
        let c = Contour {
            points: square_ring(3, 3, 4),
            kind: BorderKind::Outer,
            parent: None,
        };
        assert_eq!(c.points.len(), 12);
        assert!((c.shoelace_area().abs() - 9.0).abs() < 1e-9);
        assert!((c.enclosed_area() - 16.0).abs() < 1e-9);
        assert!((c.perimeter() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn single_pixel_and_thin_line() {
        let dot = Contour {
            points: vec![(5, 5)],
            kind: BorderKind::Outer,
            parent: None,
        };
        assert!((dot.enclosed_area() - 1.0).abs() < 1e-9);
        assert!(dot.perimeter().abs() < 1e-9);

        // горизонтальная линия из 4 пикселей обходится туда и обратно
        let line = Contour {
            points: vec![(0, 0), (1, 0), (2, 0), (3, 0), (2, 0), (1, 0)],
            kind: BorderKind::Outer,
            parent: None,
        };
        assert!((line.enclosed_area() - 4.0).abs() < 1e-9);

        // два соседних пикселя: шаг туда и шаг обратно
        let pair = Contour {
            points: vec![(0, 0), (1, 1)],
            kind: BorderKind::Outer,
            parent: None,
        };
        assert!((pair.enclosed_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn hole_counts_background_pixels() {
        // кольцо вокруг одного пикселя фона, углы срезаны (8-связный обход)
        let diamond = Contour {
            points: vec![(5, 4), (6, 5), (5, 6), (4, 5)],
            kind: BorderKind::Hole,
            parent: Some(0),
        };
        assert!((diamond.enclosed_area() - 1.0).abs() < 1e-9);
        assert!((diamond.signed_area() + 1.0).abs() < 1e-9);

        // то же кольцо с углами
        let full = Contour {
            points: square_ring(4, 4, 3),
            kind: BorderKind::Hole,
            parent: Some(0),
        };
        assert!((full.enclosed_area() - 1.0).abs() < 1e-9);
    }
}
