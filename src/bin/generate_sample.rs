use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use aviation_figures::figures::trends::{DISTANCE_COLUMN, REGION_COLUMN, SHARE_COLUMN, YEAR_COLUMN};

/// Multiplicative noise, uniform in `1 ± spread`.
fn jitter(rng: &mut ChaCha8Rng, spread: f64) -> f64 {
    1.0 + rng.gen_range(-spread..=spread)
}

fn write_rows(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Two learning curves in percent of the first unit: Wright's 80 % cost
/// curve and a tooling-to-construction cost ratio.
fn learning_curves(dir: &Path) -> Result<()> {
    let dir = dir.join("learning_curves");
    std::fs::create_dir_all(&dir)?;

    let quantities = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0];
    let wright_exponent = 0.8_f64.log2();
    let cost: Vec<Vec<String>> = quantities
        .iter()
        .map(|&q: &f64| vec![q.to_string(), format!("{:.2}", 100.0 * q.powf(wright_exponent))])
        .collect();
    write_rows(&dir.join("variation_cost_quantity.csv"), &["x", "y"], &cost)?;

    let tooling: Vec<Vec<String>> = [5.0, 10.0, 25.0, 50.0, 100.0]
        .iter()
        .map(|&q: &f64| vec![q.to_string(), format!("{:.2}", 90.0 / (1.0 + q / 15.0))])
        .collect();
    write_rows(&dir.join("ratio_tool_construction_cost.csv"), &["x", "y"], &tooling)
}

/// Emission shares by distance: US in 250 km steps, EU already in the
/// Eurocontrol bins.
fn emissions_by_distance(dir: &Path, rng: &mut ChaCha8Rng) -> Result<()> {
    let us_upper: Vec<u32> = (1..=24).map(|i| i * 250).chain([7000, 10_000, 13_000]).collect();
    let weights: Vec<f64> = us_upper
        .iter()
        .map(|&d| (f64::from(d) / 1000.0).sqrt() * jitter(rng, 0.2))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut rows: Vec<Vec<String>> = us_upper
        .iter()
        .zip(&weights)
        .map(|(d, w)| vec!["US".to_string(), d.to_string(), format!("{:.3}", w / total * 100.0)])
        .collect();
    for (d, share) in [(500, 6.2), (1500, 27.5), (2000, 10.1), (3000, 12.6), (13_000, 43.6)] {
        rows.push(vec!["EU".to_string(), d.to_string(), share.to_string()]);
    }
    write_rows(
        &dir.join("co2_emissions_by_distance.csv"),
        &[REGION_COLUMN, DISTANCE_COLUMN, SHARE_COLUMN],
        &rows,
    )
}

/// Traffic, CO2 and energy intensity since 1940 (Kaya-style decomposition).
fn relative_change(dir: &Path, rng: &mut ChaCha8Rng) -> Result<()> {
    let rows: Vec<Vec<String>> = (1940..=2023)
        .map(|year| {
            let t = f64::from(year - 1940);
            let traffic = 28.0 * (0.09 * t).min(3.2 + 0.055 * t).exp() * jitter(rng, 0.03);
            let intensity = 6.0 * (-0.025 * t).exp() * jitter(rng, 0.02);
            let emissions = traffic * intensity;
            vec![
                year.to_string(),
                format!("{traffic:.1}"),
                format!("{emissions:.1}"),
                format!("{intensity:.4}"),
            ]
        })
        .collect();
    write_rows(
        &dir.join("relative_change.csv"),
        &[YEAR_COLUMN, "traffic [RPK]", "CO2 emissions", "energy intensity"],
        &rows,
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    learning_curves(&dir)?;
    emissions_by_distance(&dir, &mut rng)?;
    relative_change(&dir, &mut rng)?;

    println!("Wrote sample data to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_is_seeded_and_bounded() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..100 {
            let x = jitter(&mut a, 0.2);
            assert_eq!(x, jitter(&mut b, 0.2));
            assert!((0.8..=1.2).contains(&x), "{x}");
        }
    }

    #[test]
    fn sample_files_load_back() {
        let dir = std::env::temp_dir().join(format!("aviation_figures_sample_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        learning_curves(&dir).unwrap();
        emissions_by_distance(&dir, &mut rng).unwrap();
        relative_change(&dir, &mut rng).unwrap();

        let emissions = aviation_figures::data::loader::load_file(&dir.join("co2_emissions_by_distance.csv")).unwrap();
        let curves = aviation_figures::data::loader::load_dir(&dir.join("learning_curves")).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert!(emissions.has_column(DISTANCE_COLUMN));
        assert_eq!(curves.len(), 2);
    }
}
