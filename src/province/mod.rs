// src/province/mod.rs
//! Векторные провинции: итог трассировки и их метаданные
//!
//! - `RegionShape` — многоугольники одного региона в координатах исходного
//!   изображения, его рамка и площадь
//! - `ProvinceRecord` — запись `provinces.json`
//! - `path` — построение SVG-пути и метрик из упрощённых многоугольников
//! - `svg` — документ `provinces.svg`

pub mod path;
pub mod svg;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::lookup::ColorKey;
use crate::lookup::catalog::RegionId;

/// Ограничивающий прямоугольник `(x0, y0) – (x1, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    /// Рамка набора точек; `None` для пустого набора
    pub fn around(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Self {
                    x0: x,
                    y0: y,
                    x1: x,
                    y1: y,
                },
                Some(b) => Self {
                    x0: b.x0.min(x),
                    y0: b.y0.min(y),
                    x1: b.x1.max(x),
                    y1: b.y1.max(y),
                },
            })
        })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// Векторная форма одного региона
///
/// Все координаты и площадь уже приведены к масштабу исходного изображения
/// (разделены на коэффициент суперсэмплинга).
#[derive(Debug, Clone, PartialEq)]
pub struct RegionShape {
    pub id: RegionId,
    pub color: ColorKey,
    /// Внешние контуры и дыры, каждый — замкнутое кольцо
    pub polygons: Vec<Vec<(f64, f64)>>,
    pub bbox: BBox,
    /// Площадь в пикселях исходного изображения (дыры вычтены)
    pub area: f64,
}

impl RegionShape {
    /// Атрибут `d` SVG-пути: подпути всех многоугольников подряд
    #[must_use]
    pub fn path_data(&self) -> String {
        path::path_data(&self.polygons)
    }
}

/// Запись `provinces.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceRecord {
    pub id: RegionId,
    /// Локализованное название региона, иначе его ключ
    pub name: String,
    pub color: ColorKey,
    pub area_px: f64,
    pub bbox: BBox,
}

impl ProvinceRecord {
    #[must_use]
    pub fn from_shape(shape: &RegionShape, names: &BTreeMap<String, String>) -> Self {
        Self {
            id: shape.id.clone(),
            name: names.get(&shape.id).unwrap_or(&shape.id).clone(),
            color: shape.color,
            area_px: shape.area,
            bbox: shape.bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_of_points() {
        let b = BBox::around([(3.0, 7.0), (1.5, 9.0), (4.0, 8.0)]).unwrap();
        assert_eq!(
            b,
            BBox {
                x0: 1.5,
                y0: 7.0,
                x1: 4.0,
                y1: 9.0
            }
        );
        assert!((b.width() - 2.5).abs() < 1e-12);
        assert!(BBox::around(std::iter::empty()).is_none());
    }

    #[test]
    fn record_prefers_localized_name() {
        let shape = RegionShape {
            id: "att_reg_italia_roma".to_string(),
            color: ColorKey::rgb(1, 2, 3),
            polygons: vec![vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]],
            bbox: BBox {
                x0: 0.0,
                y0: 0.0,
                x1: 2.0,
                y1: 2.0,
            },
            area: 6.0,
        };
        let mut names = BTreeMap::new();
        assert_eq!(ProvinceRecord::from_shape(&shape, &names).name, "att_reg_italia_roma");

        names.insert("att_reg_italia_roma".to_string(), "Roma".to_string());
        let record = ProvinceRecord::from_shape(&shape, &names);
        assert_eq!(record.name, "Roma");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["color"]["a"], 255);
        assert_eq!(json["bbox"]["x1"], 2.0);
        assert_eq!(json["area_px"], 6.0);
    }
}
