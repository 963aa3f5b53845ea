// src/trace/mask.rs
//! Маска региона и извлечение контуров
//!
//! ## Алгоритм
//!
//! 1. **Маска**: пиксель = 255, если каждый из каналов R, G, B отличается от
//!    цвета региона не больше чем на `tolerance`; иначе 0. Альфа не учитывается.
//! 2. **Очистка** (только при `min_area > 0`): одно размыкание и одно замыкание
//!    крестообразным элементом 3×3 (эллипс 3×3). Убирает одиночные пиксели-шум,
//!    но меняет топологию: срезает углы и затягивает проколы в один пиксель.
//! 3. **Контуры**: обход границ Suzuki–Abe с иерархией "внешняя граница / дыра".
//! 4. **Фильтр площади**: контуры с площадью меньше `min_area` отбрасываются,
//!    вместе с ними и дыры отброшенных внешних контуров.

use image::{GrayImage, Luma, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

use crate::lookup::{ColorKey, PixelBuffer};
use crate::trace::contour::{BorderKind, Contour};

const FOREGROUND: u8 = 255;

/// Бинарная маска пикселей, совпадающих с `color` в пределах допуска
#[must_use]
pub fn color_mask(buffer: &PixelBuffer, color: ColorKey, tolerance: u8) -> GrayImage {
    let image = buffer.as_image();
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if color.matches((*image.get_pixel(x, y)).into(), tolerance) {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

/// Размыкание, затем замыкание элементом 3×3.
///
/// Крест радиуса 1 в норме L1 совпадает с эллиптическим ядром 3×3.
#[must_use]
pub fn clean_mask(mask: &GrayImage) -> GrayImage {
    let opened = open(mask, Norm::L1, 1);
    close(&opened, Norm::L1, 1)
}

/// Контуры маски с двухуровневой иерархией.
///
/// Маска обходится в рамке из одного пикселя фона: иначе область, касающаяся
/// края изображения, распознаётся как дыра без внешней границы.
#[must_use]
pub fn trace_mask(mask: &GrayImage) -> Vec<Contour> {
    let framed = with_background_frame(mask);
    find_contours::<i32>(&framed)
        .into_iter()
        .map(|c| {
            let kind = match c.border_type {
                BorderType::Outer => BorderKind::Outer,
                BorderType::Hole => BorderKind::Hole,
            };
            Contour {
                points: c.points.iter().map(|p| (p.x - 1, p.y - 1)).collect(),
                kind,
                // внешние границы всегда верхнего уровня, даже если лежат внутри дыры
                parent: match kind {
                    BorderKind::Outer => None,
                    BorderKind::Hole => c.parent,
                },
            }
        })
        .collect()
}

/// Копия маски, окружённая рамкой фона шириной в один пиксель
fn with_background_frame(mask: &GrayImage) -> GrayImage {
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, mask, 1, 1);
    framed
}

/// Оставляет контуры площадью не меньше `min_area` и перенумеровывает родителей.
#[must_use]
pub fn filter_by_area(contours: Vec<Contour>, min_area: u32) -> Vec<Contour> {
    let min_area = f64::from(min_area);
    let keep: Vec<bool> = contours
        .iter()
        .map(|c| c.enclosed_area() >= min_area)
        .collect();

    // старый индекс → новый индекс
    let mut remap: Vec<Option<usize>> = vec![None; contours.len()];
    let mut next = 0usize;
    for (i, &kept) in keep.iter().enumerate() {
        if kept {
            remap[i] = Some(next);
            next += 1;
        }
    }

    contours
        .into_iter()
        .enumerate()
        .filter(|&(i, _)| keep[i])
        .filter_map(|(_, mut c)| {
            if c.is_hole() {
                // дыра без выжившей внешней границы не рисуется
                c.parent = Some(c.parent.and_then(|p| remap.get(p).copied().flatten())?);
            }
            Some(c)
        })
        .collect()
}

/// Полный путь от буфера до отфильтрованных контуров одного цвета.
///
/// Пустая маска — нормальный исход: возвращается пустой вектор.
#[must_use]
pub fn extract_contours(
    buffer: &PixelBuffer,
    color: ColorKey,
    tolerance: u8,
    min_area: u32,
) -> Vec<Contour> {
    let mut mask = color_mask(buffer, color, tolerance);
    if min_area > 0 {
        mask = clean_mask(&mask);
    }
    filter_by_area(trace_mask(&mask), min_area)
}
