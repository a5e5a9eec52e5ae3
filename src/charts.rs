//! Server-side SVG charts for the dashboard panels.

use crate::ui::escape_html;
use std::fmt::Write;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 56.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 28.0;
const TICKS: usize = 4;
const MAX_X_LABELS: usize = 8;
const MAX_BAR_LABEL_CHARS: usize = 12;

/// One named line of a line chart. `class` selects its stroke colour in CSS.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub class: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

pub trait ChartRenderer {
    /// `labels` gives the x axis; every series must have one value per label.
    fn line_chart(&self, labels: &[String], series: &[Series]) -> String;
    fn bar_chart(&self, bars: &[Bar]) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SvgCharts;

/// Maps values onto the plot area, always keeping zero in range.
#[derive(Debug, Clone, Copy)]
struct Scale {
    min: f64,
    max: f64,
}

impl Scale {
    fn including_zero<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (mut min, mut max) = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), value| (lo.min(value), hi.max(value)));
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Self { min, max }
    }

    fn range(&self) -> f64 {
        self.max - self.min
    }

    fn y(&self, value: f64) -> f64 {
        let scale = (HEIGHT - TOP - PADDING_Y) / self.range();
        HEIGHT - PADDING_Y - (value - self.min) * scale
    }
}

impl ChartRenderer for SvgCharts {
    fn line_chart(&self, labels: &[String], series: &[Series]) -> String {
        let points = labels.len();
        if points == 0 || series.is_empty() {
            return empty_chart();
        }

        let scale = Scale::including_zero(
            series.iter().flat_map(|line| line.values.iter().copied()),
        );
        let x_step = if points > 1 {
            (WIDTH - PADDING_X * 2.0) / (points - 1) as f64
        } else {
            0.0
        };
        let x = |index: usize| PADDING_X + index as f64 * x_step;

        let mut body = String::new();
        push_grid(&mut body, &scale);
        push_legend(&mut body, series);

        for line in series {
            let mut path = String::new();
            for (index, value) in line.values.iter().take(points).enumerate() {
                let command = if index == 0 { 'M' } else { 'L' };
                let _ = write!(path, "{command} {:.2} {:.2} ", x(index), scale.y(*value));
            }
            let _ = write!(
                body,
                r#"<path class="chart-line {}" d="{}" />"#,
                line.class,
                path.trim_end()
            );
            for (index, value) in line.values.iter().take(points).enumerate() {
                let _ = write!(
                    body,
                    r#"<circle class="chart-point {}" cx="{:.2}" cy="{:.2}" r="3"><title>{}: {}</title></circle>"#,
                    line.class,
                    x(index),
                    scale.y(*value),
                    escape_html(&line.name),
                    format_axis_value(*value)
                );
            }
        }

        let label_every = points.div_ceil(MAX_X_LABELS).max(1);
        for (index, label) in labels.iter().enumerate() {
            if index % label_every != 0 {
                continue;
            }
            let _ = write!(
                body,
                r#"<text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                x(index),
                HEIGHT - PADDING_Y + 18.0,
                escape_html(label)
            );
        }

        wrap_svg("Sales chart", &body)
    }

    fn bar_chart(&self, bars: &[Bar]) -> String {
        if bars.is_empty() {
            return empty_chart();
        }

        let scale = Scale::including_zero(bars.iter().map(|bar| bar.value));
        let band = (WIDTH - PADDING_X * 2.0) / bars.len() as f64;
        let bar_width = band * 0.6;
        let zero = scale.y(0.0);

        let mut body = String::new();
        push_grid(&mut body, &scale);

        for (index, bar) in bars.iter().enumerate() {
            let center = PADDING_X + band * (index as f64 + 0.5);
            let top = scale.y(bar.value).min(zero);
            let height = (scale.y(bar.value) - zero).abs();
            let label = escape_html(&truncate_label(&bar.label));
            let _ = write!(
                body,
                r#"<rect class="chart-bar" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="4"><title>{}: {}</title></rect>"#,
                center - bar_width / 2.0,
                top,
                bar_width,
                height,
                escape_html(&bar.label),
                format_axis_value(bar.value)
            );
            let _ = write!(
                body,
                r#"<text class="chart-value" x="{center:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                top - 6.0,
                format_axis_value(bar.value)
            );
            let _ = write!(
                body,
                r#"<text class="chart-label" x="{center:.2}" y="{:.2}" text-anchor="middle">{label}</text>"#,
                HEIGHT - PADDING_Y + 18.0
            );
        }

        wrap_svg("Reorder chart", &body)
    }
}

fn push_grid(body: &mut String, scale: &Scale) {
    for tick in 0..=TICKS {
        let value = scale.min + scale.range() * tick as f64 / TICKS as f64;
        let y = scale.y(value);
        let _ = write!(
            body,
            r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" />"#,
            WIDTH - PADDING_X
        );
        let _ = write!(
            body,
            r#"<text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            PADDING_X - 10.0,
            y + 4.0,
            format_axis_value(value)
        );
    }
    let zero = scale.y(0.0);
    let _ = write!(
        body,
        r#"<line class="chart-axis" x1="{PADDING_X}" y1="{zero:.2}" x2="{:.2}" y2="{zero:.2}" />"#,
        WIDTH - PADDING_X
    );
}

fn push_legend(body: &mut String, series: &[Series]) {
    let mut x = PADDING_X;
    for line in series {
        let _ = write!(
            body,
            r#"<rect class="legend-swatch {}" x="{x:.2}" y="6" width="12" height="12" rx="3" />"#,
            line.class
        );
        let _ = write!(
            body,
            r#"<text class="chart-label" x="{:.2}" y="16">{}</text>"#,
            x + 18.0,
            escape_html(&line.name)
        );
        x += 26.0 + line.name.chars().count() as f64 * 7.0;
    }
}

fn wrap_svg(aria_label: &str, body: &str) -> String {
    format!(
        r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="{aria_label}">{body}</svg>"#
    )
}

fn empty_chart() -> String {
    wrap_svg(
        "Empty chart",
        r#"<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>"#,
    )
}

/// Whole numbers print bare, anything else with one decimal.
pub fn format_axis_value(value: f64) -> String {
    // Adding zero turns a rounded -0.0 into 0.0.
    let rounded = (value * 10.0).round() / 10.0 + 0.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_BAR_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(MAX_BAR_LABEL_CHARS - 1).collect();
    short.push('…');
    short
}
