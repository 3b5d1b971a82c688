use crate::config::{short_label, IndicatorAverage, LikertScore};

/// The vertical range of every chart: the range a Likert mean can take.
pub const AXIS_RANGE: (f64, f64) = (LikertScore::MIN as f64, LikertScore::MAX as f64);

pub const CHART_Y_LABEL: &str = "Skor Rata-rata";

#[derive(PartialEq, Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub indicator: String,
    pub value: f64,
}

/// Bars of average scores on a fixed `[1, 5]` axis.
///
/// The axis does not depend on the data: a chart of means that are all close to 3 still spans
/// the full scale.
#[derive(PartialEq, Debug, Clone)]
pub struct BarChart {
    pub y_label: String,
    pub y_range: (f64, f64),
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Returns `None` when there is nothing to draw.
    pub fn from_averages(averages: &[IndicatorAverage]) -> Option<BarChart> {
        if averages.is_empty() {
            return None;
        }
        Some(BarChart {
            y_label: CHART_Y_LABEL.to_string(),
            y_range: AXIS_RANGE,
            bars: averages
                .iter()
                .map(|a| Bar {
                    label: short_label(&a.indicator),
                    indicator: a.indicator.clone(),
                    value: a.mean,
                })
                .collect(),
        })
    }

    /// Draws the chart with characters, `rows` lines tall above the baseline.
    ///
    /// Each line covers an equal slice of the axis; a bar fills a line when its value reaches
    /// the middle of the slice. The lines that start on a whole number carry a tick label.
    pub fn render_text(&self, rows: usize) -> String {
        let rows = rows.max(1);
        let (lo, hi) = self.y_range;
        let step = (hi - lo) / rows as f64;
        let width = self
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0)
            .max(3)
            + 2;

        let mut out = String::new();
        out.push_str(&format!("{}\n", self.y_label));
        for r in 0..rows {
            let top = hi - step * r as f64;
            let mut line = if (top - top.round()).abs() < 1e-9 {
                format!("{:>4.1} |", top)
            } else {
                "     |".to_string()
            };
            for b in self.bars.iter() {
                let fill = if b.value.min(hi) >= top - step / 2.0 {
                    '#'
                } else {
                    ' '
                };
                line.push(' ');
                line.push_str(&fill.to_string().repeat(width - 2));
                line.push(' ');
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push_str(&format!(
            "{:>4.1} +{}\n",
            lo,
            "-".repeat(width * self.bars.len())
        ));
        out.push_str("      ");
        for b in self.bars.iter() {
            out.push_str(&format!("{:^w$}", b.label, w = width));
        }
        out.push('\n');
        for b in self.bars.iter() {
            out.push_str(&format!("  {}: {:.2}\n", b.indicator, b.value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(values: &[(&str, f64)]) -> BarChart {
        let avgs: Vec<IndicatorAverage> = values
            .iter()
            .map(|(n, m)| IndicatorAverage {
                indicator: n.to_string(),
                mean: *m,
                responses: 1,
            })
            .collect();
        BarChart::from_averages(&avgs).unwrap()
    }

    #[test]
    fn no_bars_no_chart() {
        assert_eq!(BarChart::from_averages(&[]), None);
    }

    #[test]
    fn axis_is_fixed() {
        let c = chart(&[("Perceived Usefulness (PU)", 3.0)]);
        assert_eq!(c.y_range, (1.0, 5.0));
        assert_eq!(c.bars[0].label, "PU");
        let c2 = chart(&[("Perceived Usefulness (PU)", 4.9), ("Behavioral Intention (BI)", 4.8)]);
        assert_eq!(c2.y_range, (1.0, 5.0));
    }

    #[test]
    fn text_bars_height() {
        let c = chart(&[("A (A)", 5.0), ("B (B)", 3.0), ("C (C)", 1.0)]);
        let text = c.render_text(8);
        let lines: Vec<&str> = text.lines().collect();
        // y label, 8 bar lines, baseline, labels, 3 legend lines
        assert_eq!(lines.len(), 14);
        assert!(lines[1].starts_with(" 5.0 |"));
        assert!(lines[9].starts_with(" 1.0 +"));
        let count_filled = |col: usize| {
            lines[1..9]
                .iter()
                .filter(|l| {
                    let cells: Vec<char> = l.chars().skip(6).collect();
                    cells.get(col * 5 + 1) == Some(&'#')
                })
                .count()
        };
        assert_eq!(count_filled(0), 8);
        assert_eq!(count_filled(1), 4);
        assert_eq!(count_filled(2), 0);
        assert!(text.contains("  B (B): 3.00"));
    }
}
