// src/tables/mod.rs
//! Табличные данные мода (CSV/TSV)
//!
//! ## Архитектура
//!
//! 1. **`Table`** — прочитанная таблица с заголовками:
//!    - байты декодируются как UTF-8 с заменой битых последовательностей
//!    - каждая ячейка обрезается по пробелам
//!    - отсутствующая колонка читается как пустая строка
//! 2. **`MultiMap`** — типизированная таблица соответствий "ключ → список значений":
//!    - значения хранятся в порядке добавления
//!    - ключи обходятся в отсортированном порядке (детерминированный вывод)
//! 3. Загрузчики конкретных таблиц (`regions`, `units`, `loc`) и чистые
//!    функции соединения (`join`).

pub mod join;
pub mod loc;
pub mod regions;
pub mod units;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder};
use serde::Serialize;

use crate::error::{MapError, Result};

/// Прочитанная таблица CSV/TSV
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Читает таблицу с разделителем `delimiter` (первая строка — заголовки)
    pub fn read(path: &Path, delimiter: u8) -> Result<Self> {
        let table_err = |source| MapError::Table {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(table_err)?;

        let headers = decode(reader.byte_headers().map_err(table_err)?);
        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record).map_err(table_err)? {
            rows.push(decode(&record));
        }
        Ok(Self::from_rows(headers, rows))
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        Self::read(path, b',')
    }

    pub fn read_tsv(path: &Path) -> Result<Self> {
        Self::read(path, b'\t')
    }

    /// Таблица из готовых строк (заголовки без BOM)
    #[must_use]
    pub fn from_rows(mut headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        if let Some(first) = headers.first_mut() {
            *first = first.trim_start_matches('\u{feff}').to_string();
        }
        Self { headers, rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Строка таблицы с доступом по имени колонки
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Значение колонки или `""`, если колонки нет или строка короче
    #[must_use]
    pub fn get(&self, column: &str) -> &'a str {
        self.table
            .column(column)
            .and_then(|i| self.cells.get(i))
            .map_or("", String::as_str)
    }
}

fn decode(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).trim().to_string())
        .collect()
}

/// Все `*.tsv` из перечисленных каталогов, по порядку имён файлов.
///
/// Отсутствующий каталог не считается ошибкой: пишется предупреждение.
pub fn read_tsv_dirs(dirs: &[PathBuf]) -> Result<Vec<Table>> {
    let mut tables = Vec::new();
    for dir in dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Каталог {} недоступен ({e}), пропускаем", dir.display());
                continue;
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "tsv"))
            .collect();
        files.sort();
        for file in files {
            tables.push(Table::read_tsv(&file)?);
        }
    }
    Ok(tables)
}

/// Ключ → упорядоченный список значений
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MultiMap {
    inner: BTreeMap<String, Vec<String>>,
}

impl MultiMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет значение в конец списка ключа (повторы допускаются)
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(key.into()).or_default().push(value.into());
    }

    /// Добавляет значение, только если его ещё нет у ключа
    pub fn push_unique(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let values = self.inner.entry(key.into()).or_default();
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Значения ключа; пустой срез для неизвестного ключа
    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.inner.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Число ключей
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MultiMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.push(k, v);
        }
        map
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use super::Table;

    /// Таблица в памяти: заголовки и строки
    pub fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            headers.iter().map(ToString::to_string).collect(),
            rows.iter()
                .map(|r| r.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    /// Пишет файл `rel` внутри `dir`, создавая промежуточные каталоги
    pub fn write(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }
}
