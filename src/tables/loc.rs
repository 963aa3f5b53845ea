// src/tables/loc.rs
//! Таблицы локализации (`key`, `text`)
//!
//! Ключи игровых таблиц несут префикс вида `regions_onscreen_`. В выводе
//! остаётся только часть после префикса, поэтому ключ совпадает с
//! идентификатором региона, фракции или юнита. Строки без префикса
//! игнорируются.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{LocSource, LocSources};
use crate::error::Result;
use crate::tables::Table;

/// Ключ без префикса → текст
pub type LocTable = BTreeMap<String, String>;

#[must_use]
pub fn loc_table(table: &Table, prefix: &str) -> LocTable {
    table
        .rows()
        .filter_map(|row| {
            let text = row.get("text");
            let key = row.get("key").strip_prefix(prefix)?;
            (!key.is_empty() && !text.is_empty()).then(|| (key.to_string(), text.to_string()))
        })
        .collect()
}

pub fn load_loc(source: &LocSource) -> Result<LocTable> {
    let table = loc_table(&Table::read_tsv(&source.path)?, &source.prefix);
    tracing::info!(
        "📖 Локализация: {} строк из {}",
        table.len(),
        source.path.display()
    );
    Ok(table)
}

/// Содержимое `loc_data.json`
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocData {
    pub units: LocTable,
    pub factions: LocTable,
    pub regions: LocTable,
}

impl LocData {
    pub fn load(sources: &LocSources) -> Result<Self> {
        Ok(Self {
            units: load_loc(&sources.units)?,
            factions: load_loc(&sources.factions)?,
            regions: load_loc(&sources.regions)?,
        })
    }
}
