// src/province/path.rs
//! Построение формы региона из упрощённых многоугольников
//!
//! ## Формат пути
//!
//! Каждый многоугольник — отдельный подпуть `M x y L x y … Z`, подпути
//! склеиваются через пробел. Внешние контуры и дыры идут в одном атрибуте `d`,
//! поэтому при `fill-rule="evenodd"` дыры вырезаются из заливки.
//! Координаты печатаются с одним знаком после запятой.
//!
//! ## Метрики
//!
//! - Рамка — по всем точкам всех многоугольников, после деления на масштаб
//! - Площадь — сумма площадей исходных (не упрощённых) контуров, дыры со знаком
//!   минус, делённая на квадрат масштаба

use std::fmt::Write as _;

use crate::lookup::ColorKey;
use crate::lookup::catalog::RegionId;
use crate::province::{BBox, RegionShape};
use crate::trace::simplify::SimplifiedPolygon;

/// Собирает форму региона; `None`, если многоугольников нет.
///
/// `divisor` — коэффициент суперсэмплинга (1.0 без него).
#[must_use]
pub fn build_shape(
    id: RegionId,
    color: ColorKey,
    polygons: &[SimplifiedPolygon],
    divisor: f64,
) -> Option<RegionShape> {
    let rings: Vec<Vec<(f64, f64)>> = polygons
        .iter()
        .map(|poly| {
            poly.points
                .iter()
                .map(|&(x, y)| (x / divisor, y / divisor))
                .collect()
        })
        .collect();

    let bbox = BBox::around(rings.iter().flatten().copied())?;
    let area = polygons.iter().map(|p| p.source_area).sum::<f64>() / (divisor * divisor);

    Some(RegionShape {
        id,
        color,
        polygons: rings,
        bbox,
        area,
    })
}

/// Атрибут `d` для набора замкнутых колец
#[must_use]
pub fn path_data(rings: &[Vec<(f64, f64)>]) -> String {
    let mut d = String::new();
    for ring in rings.iter().filter(|r| !r.is_empty()) {
        if !d.is_empty() {
            d.push(' ');
        }
        for (i, (x, y)) in ring.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                d.push(' ');
            }
            // запись в String не может завершиться ошибкой
            let _ = write!(d, "{cmd}{x:.1} {y:.1}");
        }
        d.push_str(" Z");
    }
    d
}
