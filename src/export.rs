// src/export.rs
//! Один запуск экспорта: таблицы → JSON, lookup-карта → SVG
//!
//! ## Порядок
//!
//! 1. Каталог вывода создаётся, если его нет
//! 2. Таблицы мода читаются и соединяются в `region_data.json`,
//!    `cultures_list.json`
//! 3. Локализация пишется в `loc_data.json`
//! 4. Если SVG не отключён: lookup-изображение векторизуется в
//!    `provinces.svg` и `provinces.json`
//!
//! Каждый файл сначала пишется во временный соседний файл и затем
//! переименовывается: файл вывода либо записан целиком, либо не тронут.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ExportParams;
use crate::error::{MapError, Result};
use crate::lookup::PixelBuffer;
use crate::lookup::catalog::present_regions;
use crate::province::ProvinceRecord;
use crate::province::svg::render_svg;
use crate::tables::join::{
    culture_list, military_group_factions, region_units, unit_subcultures,
    units_without_subculture,
};
use crate::tables::loc::LocData;
use crate::tables::regions::{load_region_colors, load_region_resources};
use crate::tables::units::{
    load_building_units, load_factions, load_subculture_buildings, load_unit_groupings,
    load_unit_resources,
};
use crate::trace::trace_regions;

pub const REGION_DATA_FILE: &str = "region_data.json";
pub const CULTURES_FILE: &str = "cultures_list.json";
pub const LOC_DATA_FILE: &str = "loc_data.json";
pub const SVG_FILE: &str = "provinces.svg";
pub const PROVINCES_FILE: &str = "provinces.json";

/// Итоги запуска
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Регионов в `region_data.json`
    pub regions: usize,
    /// Фракций в `cultures_list.json`
    pub cultures: usize,
    /// Провинций в `provinces.svg` (`None`, если SVG отключён)
    pub provinces: Option<usize>,
    /// Все записанные файлы
    pub written: Vec<PathBuf>,
}

/// Выполняет экспорт целиком
pub fn run(params: &ExportParams) -> Result<RunSummary> {
    let outdir = &params.outdir;
    fs::create_dir_all(outdir).map_err(|e| MapError::io(outdir, e))?;
    let mut summary = RunSummary::default();

    let data = &params.data;

    tracing::info!("📚 Загрузка таблиц...");
    let factions = load_factions(&data.factions_tsv, &params.factions)?;
    tracing::info!("  фракций: {}", factions.len());
    let region_resources = load_region_resources(&data.region_resources_csv)?;
    tracing::info!("  регионов с ресурсами найма: {}", region_resources.len());
    let unit_resources = load_unit_resources(&data.units_dirs)?;
    tracing::info!(
        "  ресурсов найма: {} (псевдонимов юнитов: {})",
        unit_resources.units.len(),
        unit_resources.aliases.len()
    );
    let unit_groups = load_unit_groupings(&data.unit_groupings_dirs)?;
    tracing::info!("  юнитов с военными группами: {}", unit_groups.len());
    let subculture_buildings = load_subculture_buildings(&data.building_variants_tsv)?;
    tracing::info!("  субкультур со зданиями: {}", subculture_buildings.len());
    let building_units = load_building_units(&data.building_units_dirs)?;
    tracing::info!("  зданий с юнитами: {}", building_units.len());

    let subcultures = unit_subcultures(&subculture_buildings, &building_units);
    let uncovered = units_without_subculture(&unit_groups, &subcultures);
    if !uncovered.is_empty() {
        tracing::warn!("У {} юнитов не найдена субкультура", uncovered.len());
        for unit in &uncovered {
            tracing::debug!("  - {unit}");
        }
    }

    let group_factions = military_group_factions(&factions);
    let region_data = region_units(
        &region_resources,
        &unit_resources.units,
        &unit_groups,
        &group_factions,
    );
    let cultures = culture_list(&region_data);
    summary.regions = region_data.len();
    summary.cultures = cultures.len();

    summary
        .written
        .push(write_json(outdir, REGION_DATA_FILE, "region data", &region_data)?);
    summary
        .written
        .push(write_json(outdir, CULTURES_FILE, "culture list", &cultures)?);

    let loc = LocData::load(&data.loc)?;
    summary
        .written
        .push(write_json(outdir, LOC_DATA_FILE, "localization", &loc)?);

    if params.skip_svg {
        tracing::info!("SVG отключён, векторизация пропущена");
        return Ok(summary);
    }

    let colors = load_region_colors(&data.regions_csv, &params.regions)?;
    tracing::info!("🎨 Цветов регионов в таблице: {}", colors.len());

    tracing::info!("🗺️ Чтение lookup-карты {}...", data.lookup_image.display());
    let buffer = PixelBuffer::load(&data.lookup_image)?;
    let (width, height) = buffer.dimensions();
    let entries = present_regions(&buffer, &colors);
    tracing::info!(
        "Векторизация {} регионов (карта {width}×{height}, суперсэмплинг ×{})...",
        entries.len(),
        params.trace.supersample.max(1)
    );

    let shapes = trace_regions(&buffer, &entries, &params.trace)?;
    summary.provinces = Some(shapes.len());

    let svg_path = outdir.join(SVG_FILE);
    write_atomic(&svg_path, render_svg(width, height, &shapes).as_bytes())?;
    summary.written.push(svg_path);

    let records: Vec<ProvinceRecord> = shapes
        .iter()
        .map(|shape| ProvinceRecord::from_shape(shape, &loc.regions))
        .collect();
    summary
        .written
        .push(write_json(outdir, PROVINCES_FILE, "provinces", &records)?);

    tracing::info!("✅ Провинций в SVG: {}", shapes.len());
    Ok(summary)
}

fn write_json<T: Serialize + ?Sized>(
    outdir: &Path,
    name: &str,
    what: &'static str,
    value: &T,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value).map_err(|source| MapError::Json { what, source })?;
    let path = outdir.join(name);
    write_atomic(&path, json.as_bytes())?;
    tracing::info!("✓ {} → {}", what, path.display());
    Ok(path)
}

/// Пишет файл через временный соседний файл и переименование
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, contents).map_err(|e| MapError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        fs::remove_file(&tmp).ok();
        MapError::io(path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, ["out.json"]);
    }

    #[test]
    fn atomic_write_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = write_atomic(&dir.path().join("nope/out.json"), b"x").unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn missing_tables_abort_the_run() {
        let dir = TempDir::new().unwrap();
        let params = ExportParams {
            outdir: dir.path().join("out"),
            data: crate::config::DataPaths::under(&dir.path().join("data")),
            ..ExportParams::default()
        };
        let err = run(&params).unwrap_err();
        assert!(matches!(err, MapError::Table { .. }));
        assert!(dir.path().join("out").is_dir());
    }
}
