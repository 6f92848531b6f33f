use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use super::chart::{render_chart, ChartSpec};
use super::{OutputFormat, RenderSettings};

/// Figure file inside `out_dir`, named after the directory itself
/// (`figures/fuel_calc/` → `figures/fuel_calc/fuel_calc.svg`).
pub fn figure_path(out_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = directory_stem(out_dir);
    out_dir.join(format!("{stem}.{}", format.extension()))
}

fn directory_stem(dir: &Path) -> String {
    let named = |p: &Path| p.file_name().and_then(|n| n.to_str()).map(str::to_string);
    named(dir)
        .or_else(|| dir.canonicalize().ok().as_deref().and_then(named))
        .unwrap_or_else(|| "figure".to_string())
}

/// Write every plotted point as long-form CSV: `series,x,y`.
pub fn write_series_csv(path: &Path, spec: &ChartSpec) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["series", spec.x_label.as_str(), spec.y_label.as_str()])?;
    for series in &spec.series {
        for (x, y) in &series.points {
            writer.write_record([series.label.clone(), x.to_string(), y.to_string()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Render `spec` into `out_dir` and write its data next to it.
/// Returns the figure path.
pub fn export_figure(spec: &ChartSpec, out_dir: &Path, settings: &RenderSettings) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let figure = figure_path(out_dir, settings.format);
    render_chart(spec, &figure, settings)?;

    let data = figure.with_extension("csv");
    write_series_csv(&data, spec)?;

    info!("wrote {} and {}", figure.display(), data.display());
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Series, SeriesKind};

    #[test]
    fn figure_named_after_directory() {
        let p = figure_path(Path::new("out/fuel_calc_recursive"), OutputFormat::Svg);
        assert_eq!(p, PathBuf::from("out/fuel_calc_recursive/fuel_calc_recursive.svg"));
        let p = figure_path(Path::new("out/payload_range"), OutputFormat::Png);
        assert!(p.ends_with("payload_range.png"));
    }

    #[test]
    fn series_csv_is_long_form() {
        let spec = ChartSpec::new("t", "Iterations [1]", "Fuel Mass [kg]")
            .with_series(Series::new("fuel", SeriesKind::Line, vec![(1.0, 10.0), (2.0, 12.5)]));
        let path = std::env::temp_dir().join(format!("aviation_figures_series_{}.csv", std::process::id()));
        write_series_csv(&path, &spec).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "series,Iterations [1],Fuel Mass [kg]");
        assert_eq!(lines[1], "fuel,1,10");
        assert_eq!(lines[2], "fuel,2,12.5");
    }
}
