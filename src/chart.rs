//! Synthetic index-chart rendering.
//!
//! Charts are drawn off-screen into an RGB buffer, encoded as PNG, and
//! shipped base64-encoded inside JSON or an HTML `data:` URI.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{Duration, NaiveDate, Utc};
use plotters::prelude::*;
use rand::Rng;

pub struct ChartSpec {
    pub days: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            days: 30,
            width: 1000,
            height: 500,
        }
    }
}

/// Daily points around a center value: today's value jitters ±50 around
/// the resolved index, one point per day, oldest first.
pub fn synthetic_series<R: Rng + ?Sized>(
    center: f64,
    days: u32,
    rng: &mut R,
) -> Vec<(NaiveDate, f64)> {
    let today = Utc::now().date_naive();
    (0..days)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back as i64);
            (date, center + rng.gen_range(-50i32..=50) as f64)
        })
        .collect()
}

/// Fully fabricated series for the fake-chart page: independent uniform
/// values in [6000, 7000].
pub fn fake_series<R: Rng + ?Sized>(days: u32, rng: &mut R) -> Vec<(NaiveDate, f64)> {
    let today = Utc::now().date_naive();
    (0..days)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back as i64);
            (date, rng.gen_range(6000..=7000) as f64)
        })
        .collect()
}

/// Render a green line-with-markers chart of the series and return the PNG
/// base64-encoded.
pub fn render_png_base64(spec: &ChartSpec, series: &[(NaiveDate, f64)]) -> Result<String> {
    if series.is_empty() {
        return Err(anyhow!("empty chart series"));
    }
    let (w, h) = (spec.width, spec.height);
    let mut buf = vec![0u8; (w as usize) * (h as usize) * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        root.fill(&WHITE)?;

        let (min_v, max_v) = series
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, v)| {
                (lo.min(v), hi.max(v))
            });
        let pad = ((max_v - min_v) * 0.1).max(1.0);
        let x_max = (series.len() as i32 - 1).max(1);

        let mut chart = ChartBuilder::on(&root)
            .margin(24)
            .build_cartesian_2d(0i32..x_max, (min_v - pad)..(max_v + pad))?;

        chart.configure_mesh().x_labels(0).y_labels(0).draw()?;

        chart.draw_series(LineSeries::new(
            series.iter().enumerate().map(|(i, &(_, v))| (i as i32, v)),
            &GREEN,
        ))?;
        chart.draw_series(
            series
                .iter()
                .enumerate()
                .map(|(i, &(_, v))| Circle::new((i as i32, v), 3, GREEN.filled())),
        )?;

        root.present()?;
    }

    let img = image::RgbImage::from_raw(w, h, buf).context("chart buffer size mismatch")?;
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(BASE64.encode(&png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn synthetic_series_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = synthetic_series(6750.0, 30, &mut rng);
        assert_eq!(series.len(), 30);
        for (_, v) in &series {
            assert!((6700.0..=6800.0).contains(v));
        }
        // Dates ascend one day at a time.
        for pair in series.windows(2) {
            assert_eq!(pair[1].0 - pair[0].0, Duration::days(1));
        }
    }

    #[test]
    fn fake_series_covers_fixed_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = fake_series(30, &mut rng);
        assert_eq!(series.len(), 30);
        for (_, v) in &series {
            assert!((6000.0..=7000.0).contains(v));
        }
    }

    #[test]
    fn render_produces_png() {
        let mut rng = StdRng::seed_from_u64(7);
        let spec = ChartSpec {
            days: 10,
            width: 320,
            height: 160,
        };
        let series = synthetic_series(6750.0, spec.days, &mut rng);
        let encoded = render_png_base64(&spec, &series).unwrap();
        let bytes = BASE64.decode(encoded).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn empty_series_is_an_error() {
        let spec = ChartSpec::default();
        assert!(render_png_base64(&spec, &[]).is_err());
    }
}
