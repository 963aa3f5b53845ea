// src/error.rs
//! Ошибки экспорта карты
//!
//! Фатальные ошибки прерывают запуск целиком. Локальные проблемы (битые строки
//! таблиц, слишком мелкие контуры) сюда не попадают: они фильтруются на месте.

use std::path::PathBuf;

use thiserror::Error;

/// Ошибка, прерывающая экспорт.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MapError {
    #[error("failed to decode lookup image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("supersample factor {factor} is too large for a {width}x{height} image")]
    Supersample { factor: u32, width: u32, height: u32 },

    #[error("failed to serialize {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl MapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;
