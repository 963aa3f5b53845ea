// src/lookup/mod.rs
//! Lookup-изображение карты
//!
//! Lookup-изображение кодирует регионы цветом: каждый регион залит одним
//! плоским цветом. Модуль отвечает за:
//! - Загрузку растра (TGA/PNG) в RGBA-буфер (`PixelBuffer`)
//! - Представление цвета региона (`ColorKey`)
//! - Перечисление цветов, реально присутствующих на карте (`catalog`)
//! - Увеличение буфера перед трассировкой (`supersample`)
//!
//! Везде используется порядок каналов RGBA; других порядков снаружи модуля нет.

pub mod catalog;
pub mod supersample;

use std::path::Path;

use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::error::{MapError, Result};

/// Точный цвет региона (R, G, B, A)
///
/// Сериализуется как `{"r": .., "g": .., "b": .., "a": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorKey {
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Непрозрачный цвет
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Разбирает цвет из HEX-строки `RRGGBB` (без `#`), альфа = 255.
    ///
    /// # Возвращает
    /// `None`, если строка не состоит ровно из шести шестнадцатеричных цифр.
    ///
    /// # Пример
    /// ```
    /// use provmap::lookup::ColorKey;
    /// assert_eq!(ColorKey::from_hex("ff8000"), Some(ColorKey::rgb(255, 128, 0)));
    /// assert_eq!(ColorKey::from_hex("ff80"), None);
    /// ```
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            Some(Self::rgb(r, g, b))
        } else {
            None
        }
    }

    /// Попадает ли пиксель в допуск по каналам R, G, B.
    ///
    /// Границы `[c - tol, c + tol]` обрезаются до `[0, 255]`. Альфа не учитывается.
    #[must_use]
    pub fn matches(self, pixel: Self, tolerance: u8) -> bool {
        let within = |target: u8, value: u8| {
            target.saturating_sub(tolerance) <= value && value <= target.saturating_add(tolerance)
        };
        within(self.r, pixel.r) && within(self.g, pixel.g) && within(self.b, pixel.b)
    }
}

impl From<Rgba<u8>> for ColorKey {
    fn from(Rgba([r, g, b, a]): Rgba<u8>) -> Self {
        Self { r, g, b, a }
    }
}

impl From<ColorKey> for Rgba<u8> {
    fn from(c: ColorKey) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Растровый буфер lookup-изображения
///
/// Всегда 4 канала RGBA. После загрузки не изменяется.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    #[must_use]
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Загружает lookup-изображение с диска.
    ///
    /// Изображения без альфа-канала получают полностью непрозрачную альфу.
    ///
    /// # Ошибки
    /// `MapError::Decode`, если файл не читается или формат не поддерживается.
    pub fn load(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| MapError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let image = decoded.to_rgba8();
        tracing::debug!(
            "Lookup {} загружен: {}×{}",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self { image })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> ColorKey {
        (*self.image.get_pixel(x, y)).into()
    }

    /// Все пиксели построчно
    pub fn pixels(&self) -> impl Iterator<Item = ColorKey> + '_ {
        self.image.pixels().map(|&p| p.into())
    }

    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, RgbImage};

    #[test]
    fn hex_parsing_rejects_malformed_values() {
        assert_eq!(ColorKey::from_hex("0A0b0C"), Some(ColorKey::rgb(10, 11, 12)));
        assert_eq!(ColorKey::from_hex("#0a0b0c"), None);
        assert_eq!(ColorKey::from_hex("+f0000"), None);
        assert_eq!(ColorKey::from_hex("zz0000"), None);
        assert_eq!(ColorKey::from_hex(""), None);
    }

    #[test]
    fn tolerance_is_clamped_and_ignores_alpha() {
        let target = ColorKey::rgb(0, 128, 255);
        assert!(target.matches(ColorKey::rgba(0, 128, 255, 0), 0));
        assert!(target.matches(ColorKey::rgb(2, 126, 253), 2));
        assert!(!target.matches(ColorKey::rgb(3, 128, 255), 2));
        assert!(!target.matches(ColorKey::rgb(0, 128, 252), 2));
        assert!(ColorKey::rgb(250, 5, 0).matches(ColorKey::rgb(255, 0, 0), 10));
    }

    #[test]
    fn rgb_file_gets_opaque_alpha() {
        let dir = std::env::temp_dir().join(format!("provmap-lookup-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rgb.png");

        let img: RgbImage = ImageBuffer::from_pixel(3, 2, Rgb([10, 20, 30]));
        img.save(&path).unwrap();

        let buffer = PixelBuffer::load(&path).unwrap();
        assert_eq!(buffer.dimensions(), (3, 2));
        assert_eq!(buffer.get(2, 1), ColorKey::rgba(10, 20, 30, 255));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unreadable_file_is_decode_error() {
        let err = PixelBuffer::load(Path::new("/nonexistent/lookup.tga")).unwrap_err();
        assert!(matches!(err, MapError::Decode { .. }));
    }
}
