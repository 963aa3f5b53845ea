// src/trace/mod.rs
//! Векторизация lookup-изображения
//!
//! Для каждого региона, цвет которого есть на карте:
//!
//! 1. Суперсэмплинг буфера (один раз на запуск, см. `lookup::supersample`)
//! 2. Маска цвета, очистка, контуры с дырами (`mask`)
//! 3. Упрощение каждого контура (`simplify`)
//! 4. Сборка формы: путь, рамка, площадь (`province::path`)
//!
//! Регионы независимы друг от друга: с фичей `parallel` они обрабатываются
//! в пуле rayon. Порядок результата совпадает с порядком каталога.

pub mod contour;
pub mod mask;
pub mod simplify;

use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::TraceSettings;
use crate::error::Result;
use crate::lookup::PixelBuffer;
use crate::lookup::catalog::CatalogEntry;
use crate::lookup::supersample::Supersample;
use crate::province::RegionShape;
use crate::province::path::build_shape;
use crate::trace::simplify::{SimplifiedPolygon, simplify_contour};

/// Каждые столько регионов в лог пишется прогресс
const PROGRESS_EVERY: usize = 25;

/// Параметры трассировки, приведённые к масштабу (возможно увеличенного) буфера
#[derive(Debug, Clone, Copy)]
pub struct TracePlan {
    pub tolerance: u8,
    pub simplify: f64,
    /// Порог площади в пикселях увеличенного буфера
    pub min_area: u32,
    pub supersample: Supersample,
}

impl TracePlan {
    #[must_use]
    pub fn new(settings: &TraceSettings) -> Self {
        let supersample = Supersample::new(settings.supersample);
        Self {
            tolerance: settings.tolerance,
            simplify: settings.simplify,
            min_area: supersample.scale_area(settings.min_area),
            supersample,
        }
    }
}

/// Векторизует один регион на уже подготовленном буфере.
///
/// # Возвращает
/// `None`, если после очистки и фильтров не осталось ни одного многоугольника
/// (например, цвета нет на карте). Это не ошибка: регион просто не выводится.
#[must_use]
pub fn trace_region(
    prepared: &PixelBuffer,
    entry: &CatalogEntry,
    plan: &TracePlan,
) -> Option<RegionShape> {
    let contours = mask::extract_contours(prepared, entry.color, plan.tolerance, plan.min_area);
    if contours.is_empty() {
        return None;
    }

    let polygons: Vec<SimplifiedPolygon> = contours
        .iter()
        .filter_map(|c| simplify_contour(c, plan.simplify))
        .collect();

    build_shape(
        entry.region.clone(),
        entry.color,
        &polygons,
        plan.supersample.divisor(),
    )
}

/// Векторизует все регионы каталога
///
/// # Ошибки
/// `MapError::Supersample`, если буфер нельзя увеличить в заданное число раз.
pub fn trace_regions(
    buffer: &PixelBuffer,
    entries: &[CatalogEntry],
    settings: &TraceSettings,
) -> Result<Vec<RegionShape>> {
    let plan = TracePlan::new(settings);
    let prepared = plan.supersample.prepare(buffer)?;
    let total = entries.len();
    let done = AtomicUsize::new(0);

    let trace_one = |entry: &CatalogEntry| {
        let shape = trace_region(&prepared, entry, &plan);
        if shape.is_none() {
            tracing::debug!("Регион {} не дал ни одного контура", entry.region);
        }
        let n = done.fetch_add(1, Ordering::Relaxed) + 1;
        if n % PROGRESS_EVERY == 0 {
            tracing::info!("  {n}/{total} регионов готово...");
        }
        shape
    };

    #[cfg(feature = "parallel")]
    let shapes: Vec<RegionShape> = entries.par_iter().filter_map(trace_one).collect();
    #[cfg(not(feature = "parallel"))]
    let shapes: Vec<RegionShape> = entries.iter().filter_map(trace_one).collect();

    Ok(shapes)
}
