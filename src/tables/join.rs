// src/tables/join.rs
//! Соединение таблиц: какие фракции какие юниты могут нанимать в регионе
//!
//! ## Цепочка
//!
//! ```text
//! регион → ресурсы найма → юниты → военные группы → фракции
//! ```
//!
//! Каждый шаг — чистая функция над `MultiMap`, без ввода-вывода.
//! Результат `region_units` сериализуется как `region_data.json`.

use std::collections::{BTreeMap, BTreeSet};

use crate::tables::MultiMap;
use crate::tables::units::FactionInfo;

/// Регион → фракция → юниты (без повторов, в порядке первого появления)
pub type RegionUnits = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Военная группа → фракции
#[must_use]
pub fn military_group_factions(factions: &BTreeMap<String, FactionInfo>) -> MultiMap {
    factions
        .iter()
        .map(|(faction, info)| (info.military_group.as_str(), faction.as_str()))
        .collect()
}

/// Фракции, которым доступен юнит через любую из его военных групп
fn unit_factions<'a>(
    unit: &str,
    unit_groups: &'a MultiMap,
    group_factions: &'a MultiMap,
) -> Vec<&'a str> {
    let mut factions: Vec<&str> = Vec::new();
    for group in unit_groups.get(unit) {
        for faction in group_factions.get(group) {
            if !factions.contains(&faction.as_str()) {
                factions.push(faction.as_str());
            }
        }
    }
    factions
}

/// Регион → фракция → юниты.
///
/// Регион с ресурсами, но без единой достижимой фракции всё равно попадает
/// в результат (с пустым списком фракций).
#[must_use]
pub fn region_units(
    region_resources: &MultiMap,
    resource_units: &MultiMap,
    unit_groups: &MultiMap,
    group_factions: &MultiMap,
) -> RegionUnits {
    let mut out = RegionUnits::new();
    for (region, resources) in region_resources.iter() {
        let by_faction = out.entry(region.to_string()).or_default();
        for resource in resources {
            for unit in resource_units.get(resource) {
                for faction in unit_factions(unit, unit_groups, group_factions) {
                    let units = by_faction.entry(faction.to_string()).or_default();
                    if !units.contains(unit) {
                        units.push(unit.clone());
                    }
                }
            }
        }
    }
    out
}

/// Все различные фракции, встречающиеся в `region_units`, по алфавиту
#[must_use]
pub fn culture_list(region_units: &RegionUnits) -> Vec<String> {
    region_units
        .values()
        .flat_map(BTreeMap::keys)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Юнит → субкультуры, в зданиях которых он нанимается
#[must_use]
pub fn unit_subcultures(subculture_buildings: &MultiMap, building_units: &MultiMap) -> MultiMap {
    let mut out = MultiMap::new();
    for (subculture, buildings) in subculture_buildings.iter() {
        for building in buildings {
            for unit in building_units.get(building) {
                out.push_unique(unit.as_str(), subculture);
            }
        }
    }
    out
}

/// Юниты из таблицы групп, для которых не нашлось ни одной субкультуры
#[must_use]
pub fn units_without_subculture<'a>(unit_groups: &'a MultiMap, unit_subcultures: &MultiMap) -> Vec<&'a str> {
    unit_groups
        .keys()
        .filter(|unit| !unit_subcultures.contains_key(unit))
        .collect()
}
