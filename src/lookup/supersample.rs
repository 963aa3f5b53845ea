// src/lookup/supersample.rs
//! Суперсэмплинг перед трассировкой
//!
//! Буфер увеличивается в `N` раз методом ближайшего соседа: границы регионов
//! остаются резкими и новых смешанных цветов не появляется. Всё, что получено
//! на увеличенном буфере, делится обратно: координаты на `N`, площади на `N²`.

use std::borrow::Cow;

use image::imageops::{self, FilterType};

use crate::error::{MapError, Result};
use crate::lookup::PixelBuffer;

/// Коэффициент суперсэмплинга
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Supersample {
    factor: u32,
}

impl Supersample {
    /// `factor` меньше 1 трактуется как 1 (без увеличения)
    #[must_use]
    pub fn new(factor: u32) -> Self {
        Self {
            factor: factor.max(1),
        }
    }

    #[must_use]
    pub fn factor(self) -> u32 {
        self.factor
    }

    #[must_use]
    pub fn is_passthrough(self) -> bool {
        self.factor == 1
    }

    /// Делитель линейных координат
    #[must_use]
    pub fn divisor(self) -> f64 {
        f64::from(self.factor)
    }

    /// Порог площади в пикселях увеличенного буфера
    #[must_use]
    pub fn scale_area(self, area: u32) -> u32 {
        area.saturating_mul(self.factor.saturating_mul(self.factor))
    }

    /// Увеличенная копия буфера; при `N = 1` сам буфер без копирования.
    ///
    /// # Ошибки
    /// `MapError::Supersample`, если увеличенный буфер не помещается в память
    /// (размер стороны или число байт переполняет целое).
    pub fn prepare(self, buffer: &PixelBuffer) -> Result<Cow<'_, PixelBuffer>> {
        if self.is_passthrough() {
            return Ok(Cow::Borrowed(buffer));
        }
        let (width, height) = buffer.dimensions();
        let (big_width, big_height) = self
            .scaled_dimensions(width, height)
            .ok_or(MapError::Supersample {
                factor: self.factor,
                width,
                height,
            })?;
        let big = imageops::resize(buffer.as_image(), big_width, big_height, FilterType::Nearest);
        tracing::debug!(
            "Суперсэмплинг ×{}: {}×{} → {}×{}",
            self.factor,
            width,
            height,
            big.width(),
            big.height()
        );
        Ok(Cow::Owned(PixelBuffer::from_image(big)))
    }

    /// Размер увеличенного буфера; `None` при переполнении
    fn scaled_dimensions(self, width: u32, height: u32) -> Option<(u32, u32)> {
        let big_width = width.checked_mul(self.factor)?;
        let big_height = height.checked_mul(self.factor)?;
        // 4 байта на пиксель RGBA
        usize::try_from(big_width)
            .ok()?
            .checked_mul(usize::try_from(big_height).ok()?)?
            .checked_mul(4)
            .filter(|&bytes| bytes <= isize::MAX.unsigned_abs())?;
        Some((big_width, big_height))
    }
}

impl Default for Supersample {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ColorKey;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn factor_one_borrows_the_buffer() {
        let buffer = PixelBuffer::from_image(ImageBuffer::from_pixel(2, 2, Rgba([1, 2, 3, 255])));
        let ss = Supersample::new(1);
        assert!(matches!(ss.prepare(&buffer), Ok(Cow::Borrowed(_))));
        assert!((ss.divisor() - 1.0).abs() < f64::EPSILON);
        assert_eq!(ss.scale_area(80), 80);
    }

    #[test]
    fn oversized_factor_is_an_error() {
        let buffer = PixelBuffer::from_image(ImageBuffer::from_pixel(3, 2, Rgba([1, 2, 3, 255])));
        let err = Supersample::new(u32::MAX / 2).prepare(&buffer).unwrap_err();
        assert!(matches!(
            err,
            MapError::Supersample {
                width: 3,
                height: 2,
                ..
            }
        ));
    }

    #[test]
    fn zero_factor_is_passthrough() {
        assert!(Supersample::new(0).is_passthrough());
    }

    #[test]
    fn nearest_upscale_keeps_flat_colors() {
        let buffer = PixelBuffer::from_image(ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }));
        let ss = Supersample::new(3);
        let big = ss.prepare(&buffer).unwrap();

        assert_eq!(big.dimensions(), (6, 3));
        assert_eq!(ss.scale_area(10), 90);
        for y in 0..3 {
            for x in 0..6 {
                let expected = if x < 3 {
                    ColorKey::rgb(255, 0, 0)
                } else {
                    ColorKey::rgb(0, 0, 255)
                };
                assert_eq!(big.get(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }
}
