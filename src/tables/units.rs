//! Таблицы фракций, юнитов и зданий

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::FactionFilter;
use crate::error::Result;
use crate::tables::{MultiMap, Table, read_tsv_dirs};

/// Военная группа и субкультура фракции
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionInfo {
    pub military_group: String,
    pub subculture: String,
}

/// Фракция → `FactionInfo` (колонки `key`, `military_group`, `subculture`).
///
/// Фракции с исключёнными префиксами (мятежники, сепаратисты, другие кампании)
/// пропускаются; строки без любого из трёх полей тоже. Повтор ключа: побеждает
/// последняя строка.
#[must_use]
pub fn factions(table: &Table, filter: &FactionFilter) -> BTreeMap<String, FactionInfo> {
    let mut mapping = BTreeMap::new();
    for row in table.rows() {
        let faction = row.get("key");
        if filter.is_excluded(faction) {
            continue;
        }
        let military_group = row.get("military_group");
        let subculture = row.get("subculture");
        if faction.is_empty() || military_group.is_empty() || subculture.is_empty() {
            continue;
        }
        let info = FactionInfo {
            military_group: military_group.to_string(),
            subculture: subculture.to_string(),
        };
        if mapping.insert(faction.to_string(), info).is_some() {
            tracing::warn!("Фракция {faction} описана повторно, остаётся последняя строка");
        }
    }
    mapping
}

pub fn load_factions(path: &Path, filter: &FactionFilter) -> Result<BTreeMap<String, FactionInfo>> {
    Ok(factions(&Table::read_tsv(path)?, filter))
}

/// Юниты, открываемые ресурсами найма
#[derive(Debug, Clone, Default)]
pub struct UnitResources {
    /// Ресурс → юниты
    pub units: MultiMap,
    /// Юнит → `land_unit`, если они различаются
    pub aliases: BTreeMap<String, String>,
}

/// Ресурс → юниты (колонки `unit`, `region_unit_resource_requirement`,
/// `land_unit`); строка учитывается, только если заполнены все три.
#[must_use]
pub fn unit_resources(tables: &[Table]) -> UnitResources {
    let mut out = UnitResources::default();
    for row in tables.iter().flat_map(Table::rows) {
        let resource = row.get("region_unit_resource_requirement");
        let unit = row.get("unit");
        let land_unit = row.get("land_unit");
        if resource.is_empty() || unit.is_empty() || land_unit.is_empty() {
            continue;
        }
        out.units.push(resource, unit);
        if land_unit != unit {
            out.aliases.insert(unit.to_string(), land_unit.to_string());
        }
    }
    out
}

pub fn load_unit_resources(dirs: &[PathBuf]) -> Result<UnitResources> {
    Ok(unit_resources(&read_tsv_dirs(dirs)?))
}

/// Собирает `MultiMap` из двух колонок; пустые значения пропускаются
fn pairs<'t>(tables: impl IntoIterator<Item = &'t Table>, key: &str, value: &str) -> MultiMap {
    tables
        .into_iter()
        .flat_map(Table::rows)
        .map(|row| (row.get(key), row.get(value)))
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .collect()
}

/// Юнит → военные группы (`unit`, `military_group`)
#[must_use]
pub fn unit_groupings(tables: &[Table]) -> MultiMap {
    pairs(tables, "unit", "military_group")
}

pub fn load_unit_groupings(dirs: &[PathBuf]) -> Result<MultiMap> {
    Ok(unit_groupings(&read_tsv_dirs(dirs)?))
}

/// Здание → юниты (`building`, `unit`)
#[must_use]
pub fn building_units(tables: &[Table]) -> MultiMap {
    pairs(tables, "building", "unit")
}

pub fn load_building_units(dirs: &[PathBuf]) -> Result<MultiMap> {
    Ok(building_units(&read_tsv_dirs(dirs)?))
}

/// Субкультура → здания (`subculture`, `building`)
#[must_use]
pub fn subculture_buildings(table: &Table) -> MultiMap {
    pairs([table], "subculture", "building")
}

pub fn load_subculture_buildings(path: &Path) -> Result<MultiMap> {
    Ok(subculture_buildings(&Table::read_tsv(path)?))
}
