// src/tables/regions.rs
//! Таблицы регионов: цвета lookup-карты и ресурсы найма
//!
//! ## `regions.csv` (колонки `key`, `colour_group`, `is_sea`)
//!
//! Строка становится записью `ColorKey → RegionId`, если:
//! - ключ начинается с префикса кампании (`att_` по умолчанию)
//! - ключ не равен ключу "за пределами карты"
//! - `colour_group` — ровно шесть HEX-цифр `RRGGBB`
//! - регион не морской, когда включён `skip_sea`
//!
//! Прочие строки молча пропускаются. При совпадении цветов у двух регионов
//! побеждает последняя строка (пишется предупреждение).

use std::collections::HashMap;
use std::path::Path;

use crate::config::RegionFilter;
use crate::error::Result;
use crate::lookup::ColorKey;
use crate::lookup::catalog::RegionId;
use crate::tables::{MultiMap, Table};

/// Таблица `ColorKey → RegionId` из прочитанного `regions.csv`
#[must_use]
pub fn region_colors(table: &Table, filter: &RegionFilter) -> HashMap<ColorKey, RegionId> {
    let mut mapping: HashMap<ColorKey, RegionId> = HashMap::new();
    let mut skipped = 0usize;

    for row in table.rows() {
        let key = row.get("key");
        if !key.starts_with(filter.key_prefix.as_str()) || key == filter.out_of_bounds_key {
            continue;
        }
        let Some(color) = ColorKey::from_hex(row.get("colour_group")) else {
            skipped += 1;
            continue;
        };
        if filter.skip_sea && row.get("is_sea").eq_ignore_ascii_case("true") {
            continue;
        }
        if let Some(previous) = mapping.insert(color, key.to_string())
            && previous != key
        {
            tracing::warn!("Цвет {color:?} у регионов {previous} и {key}: остаётся {key}");
        }
    }

    if skipped > 0 {
        tracing::debug!("Пропущено {skipped} строк с некорректным цветом");
    }
    mapping
}

pub fn load_region_colors(path: &Path, filter: &RegionFilter) -> Result<HashMap<ColorKey, RegionId>> {
    Ok(region_colors(&Table::read_csv(path)?, filter))
}

/// Регион → ресурсы найма (колонки `Key`, `Resource`)
#[must_use]
pub fn region_resources(table: &Table) -> MultiMap {
    table
        .rows()
        .map(|row| (row.get("Key"), row.get("Resource")))
        .filter(|(region, resource)| !region.is_empty() && !resource.is_empty())
        .collect()
}

pub fn load_region_resources(path: &Path) -> Result<MultiMap> {
    Ok(region_resources(&Table::read_csv(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::test_support::table;

    fn regions_csv() -> Table {
        table(
            &["key", "colour_group", "is_sea"],
            &[
                &["att_reg_italia_roma", "FF0000", "false"],
                &["att_reg_mare_nostrum", "0000ff", "True"],
                &["att_reg_terra_incognita", "000000", "false"],
                &["cha_reg_other_campaign", "00FF00", "false"],
                &["att_reg_broken_hex", "12345", "false"],
                &["att_reg_bad_digits", "GG0000", "false"],
                &["", "ABCDEF", "false"],
            ],
        )
    }

    #[test]
    fn applies_prefix_sentinel_and_hex_rules() {
        let mapping = region_colors(&regions_csv(), &RegionFilter::default());
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[&ColorKey::rgb(255, 0, 0)], "att_reg_italia_roma");
        assert_eq!(mapping[&ColorKey::rgb(0, 0, 255)], "att_reg_mare_nostrum");
    }

    #[test]
    fn skip_sea_is_case_insensitive() {
        let filter = RegionFilter {
            skip_sea: true,
            ..RegionFilter::default()
        };
        let mapping = region_colors(&regions_csv(), &filter);
        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains_key(&ColorKey::rgb(255, 0, 0)));
    }

    #[test]
    fn duplicate_color_last_row_wins() {
        let t = table(
            &["key", "colour_group", "is_sea"],
            &[
                &["att_reg_first", "101010", "false"],
                &["att_reg_second", "101010", "false"],
            ],
        );
        let mapping = region_colors(&t, &RegionFilter::default());
        assert_eq!(mapping[&ColorKey::rgb(16, 16, 16)], "att_reg_second");
    }

    #[test]
    fn resources_group_by_region() {
        let t = table(
            &["Key", "Resource"],
            &[
                &["att_reg_a", "res_legio"],
                &["att_reg_a", "res_auxilia"],
                &["att_reg_b", ""],
                &["att_reg_c", "res_sagittarii"],
            ],
        );
        let map = region_resources(&t);
        assert_eq!(map.get("att_reg_a"), ["res_legio", "res_auxilia"]);
        assert!(!map.contains_key("att_reg_b"));
        assert_eq!(map.len(), 2);
    }
}
