// src/config.rs
//! Конфигурация экспорта
//!
//! Этот модуль определяет все параметры одного запуска экспорта:
//! - Пути к исходным данным (lookup-изображение, таблицы CSV/TSV, локализация)
//! - Параметры векторизации (допуск цвета, упрощение, минимальная площадь, суперсэмплинг)
//! - Фильтры регионов и фракций
//!
//! Конфигурация собирается один раз при старте (из TOML-файла и/или флагов CLI)
//! и передаётся по ссылке всем этапам. Глобального состояния нет.
//!
//! Все структуры поддерживают загрузку из TOML, любое поле можно опустить.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// Параметры векторизации lookup-изображения
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceSettings {
    /// Допустимое отклонение каждого канала R, G, B от цвета региона
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,

    /// Сила упрощения контура в процентах от его периметра:
    /// - `0.0` — без упрощения (все точки контура сохраняются),
    /// - `0.3` — по умолчанию,
    /// - больше — грубее контуры и меньше точек.
    #[serde(default = "default_simplify")]
    pub simplify: f64,

    /// Минимальная площадь контура в пикселях исходного изображения.
    ///
    /// При значении больше нуля маска дополнительно чистится морфологией 3×3.
    #[serde(default = "default_min_area")]
    pub min_area: u32,

    /// Коэффициент суперсэмплинга (`1` — выключен)
    #[serde(default = "default_supersample")]
    pub supersample: u32,
}

fn default_tolerance() -> u8 {
    1
}
fn default_simplify() -> f64 {
    0.3
}
fn default_min_area() -> u32 {
    80
}
fn default_supersample() -> u32 {
    1
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            tolerance: 1,
            simplify: 0.3,
            min_area: 80,
            supersample: 1,
        }
    }
}

/// Какие строки таблицы цветов регионов считаются регионами карты
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionFilter {
    /// Префикс ключей, относящихся к кампании (остальные строки пропускаются)
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Ключ "за пределами карты" — исключается всегда
    #[serde(default = "default_out_of_bounds_key")]
    pub out_of_bounds_key: String,

    /// Пропускать морские регионы
    #[serde(default)]
    pub skip_sea: bool,
}

fn default_key_prefix() -> String {
    "att_".to_string()
}
fn default_out_of_bounds_key() -> String {
    "att_reg_terra_incognita".to_string()
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            out_of_bounds_key: default_out_of_bounds_key(),
            skip_sea: false,
        }
    }
}

/// Фракции, которые не попадают в соединение регион → фракция
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactionFilter {
    /// Префиксы ключей служебных фракций (бельгийские, сценарные, повстанцы)
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

fn default_excluded_prefixes() -> Vec<String> {
    [
        "bel_fact_",
        "cha_fact_",
        "att_fact_separatist_",
        "att_fact_rebel_",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Default for FactionFilter {
    fn default() -> Self {
        Self {
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl FactionFilter {
    #[must_use]
    pub fn is_excluded(&self, faction: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| faction.starts_with(prefix.as_str()))
    }
}

/// Таблица локализации: путь к TSV и префикс ключей, который отрезается
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocSource {
    pub path: PathBuf,
    pub prefix: String,
}

/// Три таблицы локализации: юниты, фракции, регионы
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocSources {
    pub units: LocSource,
    pub factions: LocSource,
    pub regions: LocSource,
}

impl LocSources {
    #[must_use]
    pub fn under(root: &Path) -> Self {
        let loc = root.join("loc");
        Self {
            units: LocSource {
                path: loc.join("__land_units.loc.tsv"),
                prefix: "land_units_onscreen_name_".to_string(),
            },
            factions: LocSource {
                path: loc.join("_factions.loc.tsv"),
                prefix: "factions_screen_name_".to_string(),
            },
            regions: LocSource {
                path: loc.join("_regions.loc.tsv"),
                prefix: "regions_onscreen_".to_string(),
            },
        }
    }
}

impl Default for LocSources {
    fn default() -> Self {
        Self::under(Path::new("data"))
    }
}

/// Пути ко всем исходным данным
///
/// Поля `*_dirs` — каталоги, из которых читаются все файлы `*.tsv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataPaths {
    /// Lookup-изображение (TGA/PNG), один цвет на регион
    pub lookup_image: PathBuf,
    /// `regions.csv`: key, colour_group, is_sea
    pub regions_csv: PathBuf,
    /// Регион → ресурсы найма (CSV: Key, Resource)
    pub region_resources_csv: PathBuf,
    /// Фракции (TSV: key, military_group, subculture)
    pub factions_tsv: PathBuf,
    /// Варианты зданий по субкультурам (TSV: building, subculture)
    pub building_variants_tsv: PathBuf,
    /// Юниты и их ресурсы найма (TSV: unit, region_unit_resource_requirement, land_unit)
    pub units_dirs: Vec<PathBuf>,
    /// Юнит → военная группа (TSV: unit, military_group)
    pub unit_groupings_dirs: Vec<PathBuf>,
    /// Здание → разрешённые юниты (TSV: building, unit)
    pub building_units_dirs: Vec<PathBuf>,
    pub loc: LocSources,
}

impl DataPaths {
    /// Стандартная раскладка файлов внутри каталога данных `root`.
    ///
    /// # Пример
    /// ```
    /// use std::path::Path;
    /// use provmap::config::DataPaths;
    ///
    /// let paths = DataPaths::under(Path::new("mod_data"));
    /// assert_eq!(paths.regions_csv, Path::new("mod_data/regions.csv"));
    /// ```
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            lookup_image: root.join("main_attila_lookup.tga"),
            regions_csv: root.join("regions.csv"),
            region_resources_csv: root.join("_rex_start_pos_regions_to_unit_resources.csv"),
            factions_tsv: root.join("_rex_factions.tsv"),
            building_variants_tsv: root.join("building_culture_variants.tsv"),
            units_dirs: vec![root.join("units")],
            unit_groupings_dirs: vec![root.join("units_to_groupings_military_permissions_tables")],
            building_units_dirs: vec![root.join("building_units_allowed_tables")],
            loc: LocSources::under(root),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::under(Path::new("data"))
    }
}

/// Полная конфигурация одного запуска экспорта
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportParams {
    /// Каталог для результатов (создаётся при необходимости)
    #[serde(default = "default_outdir")]
    pub outdir: PathBuf,

    /// Не строить `provinces.svg` / `provinces.json`
    #[serde(default)]
    pub skip_svg: bool,

    #[serde(default)]
    pub data: DataPaths,

    #[serde(default)]
    pub trace: TraceSettings,

    #[serde(default)]
    pub regions: RegionFilter,

    #[serde(default)]
    pub factions: FactionFilter,
}

fn default_outdir() -> PathBuf {
    PathBuf::from("docs")
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            outdir: default_outdir(),
            skip_svg: false,
            data: DataPaths::default(),
            trace: TraceSettings::default(),
            regions: RegionFilter::default(),
            factions: FactionFilter::default(),
        }
    }
}

impl ExportParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # export.toml
    /// outdir = "site"
    ///
    /// [trace]
    /// tolerance = 0
    /// supersample = 2
    ///
    /// [data]
    /// lookup_image = "data/main_attila_lookup.png"
    /// ```
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| MapError::io(path, e))?;
        toml::from_str(&contents).map_err(|source| MapError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
