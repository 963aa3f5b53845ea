// src/lookup/catalog.rs
//! Каталог цветов: какие регионы из таблицы реально есть на карте
//!
//! Буфер обходится ровно один раз, после чего пересечение с таблицей
//! цветов строится по множеству различных цветов: O(пиксели + цвета),
//! а не O(пиксели × регионы).

use std::collections::{HashMap, HashSet};

use crate::lookup::{ColorKey, PixelBuffer};

/// Идентификатор региона (колонка `key` таблицы регионов)
pub type RegionId = String;

/// Регион, цвет которого найден на карте
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub color: ColorKey,
    pub region: RegionId,
}

/// Множество различных цветов буфера
#[must_use]
pub fn distinct_colors(buffer: &PixelBuffer) -> HashSet<ColorKey> {
    buffer.pixels().collect()
}

/// Оставляет из таблицы `mapping` только регионы, цвет которых есть на карте.
///
/// Результат отсортирован по идентификатору региона, чтобы порядок вывода
/// не зависел от хеширования.
#[must_use]
pub fn present_regions(
    buffer: &PixelBuffer,
    mapping: &HashMap<ColorKey, RegionId>,
) -> Vec<CatalogEntry> {
    let colors = distinct_colors(buffer);
    tracing::debug!("На карте {} различных цветов", colors.len());

    let mut entries: Vec<CatalogEntry> = colors
        .iter()
        .filter_map(|color| {
            mapping.get(color).map(|region| CatalogEntry {
                color: *color,
                region: region.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.region.cmp(&b.region));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn striped() -> PixelBuffer {
        // три вертикальные полосы: красная, зелёная, синяя
        PixelBuffer::from_image(ImageBuffer::from_fn(9, 4, |x, _| match x / 3 {
            0 => Rgba([255, 0, 0, 255]),
            1 => Rgba([0, 255, 0, 255]),
            _ => Rgba([0, 0, 255, 255]),
        }))
    }

    #[test]
    fn duplicates_collapse_to_distinct_colors() {
        assert_eq!(distinct_colors(&striped()).len(), 3);
    }

    #[test]
    fn keeps_only_mapped_and_present_colors() {
        let mapping: HashMap<ColorKey, RegionId> = [
            (ColorKey::rgb(0, 0, 255), "att_reg_b".to_string()),
            (ColorKey::rgb(255, 0, 0), "att_reg_a".to_string()),
            (ColorKey::rgb(1, 2, 3), "att_reg_missing".to_string()),
        ]
        .into_iter()
        .collect();

        let entries = present_regions(&striped(), &mapping);
        let regions: Vec<&str> = entries.iter().map(|e| e.region.as_str()).collect();
        assert_eq!(regions, ["att_reg_a", "att_reg_b"]);
        assert_eq!(entries[0].color, ColorKey::rgb(255, 0, 0));
    }

    #[test]
    fn alpha_is_part_of_the_key() {
        let mapping: HashMap<ColorKey, RegionId> =
            [(ColorKey::rgba(255, 0, 0, 128), "att_reg_a".to_string())]
                .into_iter()
                .collect();
        assert!(present_regions(&striped(), &mapping).is_empty());
    }
}
