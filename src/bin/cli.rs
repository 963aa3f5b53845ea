use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use provmap::{DataPaths, ExportParams};
use tracing_subscriber::EnvFilter;

/// Экспорт провинций и данных найма из lookup-карты Total War: Attila
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Конфигурационный файл в формате TOML (флаги ниже его перекрывают)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Каталог исходных данных (по умолчанию: data); с --config не сочетается,
    /// пути тогда берутся из секции `[data]`
    #[arg(long, conflicts_with = "config")]
    data_dir: Option<PathBuf>,

    /// Каталог для результатов (по умолчанию: docs)
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// Не строить provinces.svg / provinces.json
    #[arg(long)]
    skip_svg: bool,

    /// Допуск цвета по каждому каналу (по умолчанию: 1)
    #[arg(long)]
    tolerance: Option<u8>,

    /// Сила упрощения, % периметра (по умолчанию: 0.3)
    #[arg(long)]
    simplify: Option<f64>,

    /// Минимальная площадь контура в пикселях (по умолчанию: 80)
    #[arg(long)]
    min_area: Option<u32>,

    /// Пропускать морские регионы
    #[arg(long)]
    skip_sea: bool,

    /// Увеличить карту в N раз перед поиском контуров (1 — выключено)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    supersample: Option<u32>,

    /// Подробный лог (debug)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn params(&self) -> anyhow::Result<ExportParams> {
        let mut params = match &self.config {
            Some(path) => ExportParams::from_toml_file(path)
                .with_context(|| format!("не удалось загрузить {}", path.display()))?,
            None => ExportParams {
                data: DataPaths::under(self.data_dir.as_deref().unwrap_or(Path::new("data"))),
                ..ExportParams::default()
            },
        };

        if let Some(outdir) = &self.outdir {
            params.outdir.clone_from(outdir);
        }
        params.skip_svg |= self.skip_svg;
        params.regions.skip_sea |= self.skip_sea;
        if let Some(tolerance) = self.tolerance {
            params.trace.tolerance = tolerance;
        }
        if let Some(simplify) = self.simplify {
            params.trace.simplify = simplify;
        }
        if let Some(min_area) = self.min_area {
            params.trace.min_area = min_area;
        }
        if let Some(supersample) = self.supersample {
            params.trace.supersample = supersample;
        }
        Ok(params)
    }
}

fn init_logging(verbose: bool) {
    let base = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!("🔍 Загрузка конфигурации...");
    let params = cli.params()?;
    tracing::debug!("{params:?}");

    let summary = provmap::run(&params).context("экспорт прерван")?;

    tracing::info!(
        "Готово! Регионов: {}, фракций: {}, провинций: {}",
        summary.regions,
        summary.cultures,
        summary
            .provinces
            .map_or_else(|| "нет".to_string(), |n| n.to_string())
    );
    for path in &summary.written {
        tracing::debug!("  {}", path.display());
    }
    Ok(())
}
