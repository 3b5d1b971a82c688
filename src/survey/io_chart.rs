use crate::survey::*;

use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (800, 480);

fn chart_error<E: std::fmt::Display>(e: E) -> SurveyError {
    ChartSnafu {
        message: e.to_string(),
    }
    .build()
}

/// Draws the chart as an SVG document. The vertical axis keeps the range of the chart.
pub fn render_svg(chart: &BarChart, title: &str) -> SurveyResult<String> {
    let (lo, hi) = chart.y_range;
    let n = chart.bars.len() as u32;
    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
    let x_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        let mut ctx = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22).into_font())
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(56)
            .build_cartesian_2d((0u32..n).into_segmented(), lo..hi)
            .map_err(chart_error)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&x_label)
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(chart_error)?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, b)| {
            let i = i as u32;
            let top = b.value.max(lo).min(hi);
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), lo), (SegmentValue::Exact(i + 1), top)],
                BLUE.mix(0.7).filled(),
            );
            bar.set_margin(0, 0, 12, 12);
            bar
        }))
        .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }
    debug!("render_svg: {} bars, {} bytes", n, buf.len());
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_chart() {
        let chart = BarChart::from_averages(&[
            IndicatorAverage {
                indicator: "Perceived Usefulness (PU)".to_string(),
                mean: 3.0,
                responses: 2,
            },
            IndicatorAverage {
                indicator: "Behavioral Intention (BI)".to_string(),
                mean: 4.5,
                responses: 2,
            },
        ])
        .unwrap();
        let svg = render_svg(&chart, "Rata-rata Skor per Indikator TAM").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Rata-rata Skor per Indikator TAM"));
        assert!(svg.contains("PU"));
        assert!(svg.contains("BI"));
    }
}
