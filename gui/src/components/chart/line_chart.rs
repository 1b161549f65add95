// Multi-series SVG line chart over a shared period axis
#![allow(non_snake_case)]
use dioxus::prelude::*;
use engine::data::periods::month_token;
use engine::services::{ChartView, NO_DATA_MESSAGE};
use shared::models::PeriodLabel;
use shared::utils::{format_percent, format_value};

use super::geometry::{label_stride, line_segments, PlotArea, ValueScale};
use crate::config::ChartConfig;

const MAX_X_LABELS: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub color: String,
    pub width: f64,
    /// SVG dash pattern; `None` is a solid line.
    pub dash: Option<String>,
}

/// Axis text for a period: month token when dated, the raw label otherwise.
pub fn period_text(period: &PeriodLabel) -> String {
    match period.date {
        Some(date) => month_token(date),
        None => period.text.clone(),
    }
}

fn format_metric(value: Option<f64>, percent: bool, decimals: usize) -> String {
    if percent {
        format_percent(value, decimals)
    } else {
        format_value(value, decimals)
    }
}

#[component]
pub fn LineChart(
    view: ChartView,
    styles: Vec<SeriesStyle>,
    chart: ChartConfig,
    // fractions shown as percentages
    percent_metrics: Vec<String>,
    decimals: usize,
    axis_color: String,
    text_color: String,
) -> Element {
    let mut hovered = use_signal(|| None::<usize>);

    if let Some(message) = view.message() {
        return rsx! {
            div { class: "chart-empty", style: "color: {text_color}; padding: 24px;", "{message}" }
        };
    }
    let Some((lo, hi)) = view.value_range() else {
        return rsx! {
            div { class: "chart-empty", style: "color: {text_color}; padding: 24px;", "{NO_DATA_MESSAGE}" }
        };
    };

    let area = PlotArea::from_config(&chart);
    let scale = ValueScale::new(lo, hi);
    let count = view.periods.len();
    let slot = area.slot_width(count);
    let stride = label_stride(count, MAX_X_LABELS);
    let axis_percent = !view.series.is_empty() && view.series.iter().all(|s| percent_metrics.contains(&s.name));
    let grid_dash = if chart.grid.style == "dashed" { "4,4" } else { "" };
    let (width, height) = (chart.width, chart.height);
    let (left, right, top, bottom) = (area.left, area.right(), area.top, area.bottom());
    let (tick_x, label_y, plot_height) = (left - 6.0, bottom + 18.0, area.height);
    let bands: Vec<(usize, f64)> = (0..count).map(|i| (i, left + slot * i as f64)).collect();

    let ticks: Vec<(f64, String)> = scale
        .ticks(chart.y_ticks)
        .into_iter()
        .map(|v| (scale.y(v, &area), format_metric(Some(v), axis_percent, decimals)))
        .collect();
    let x_labels: Vec<(f64, String)> = view
        .periods
        .iter()
        .enumerate()
        .filter(|(i, _)| i % stride == 0)
        .map(|(i, p)| (area.x(i, count), period_text(p)))
        .collect();

    let lines: Vec<SeriesLine> = view
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let style = styles.get(i).cloned().unwrap_or(SeriesStyle {
                color: "#1f77b4".to_string(),
                width: chart.line_width,
                dash: None,
            });
            let points = series
                .values
                .iter()
                .enumerate()
                .filter_map(|(j, v)| v.map(|v| (area.x(j, count), scale.y(v, &area))))
                .collect();
            SeriesLine {
                name: series.name.clone(),
                dash: style.dash.clone().unwrap_or_default(),
                legend: format!("{}px {} {}", style.width, legend_border(&style), style.color),
                segments: line_segments(&series.values, &scale, &area),
                points,
                style,
            }
        })
        .collect();

    let readout = hovered().filter(|i| *i < count).map(|i| {
        let values: Vec<(String, String)> = view
            .values_at(i)
            .into_iter()
            .map(|(name, v)| (name.to_string(), format_metric(v, percent_metrics.iter().any(|m| m == name), decimals)))
            .collect();
        (period_text(&view.periods[i]), area.x(i, count), values)
    });
    let point_radius = chart.point_radius;

    rsx! {
        div { class: "line-chart",
            h3 { style: "color: {text_color}; margin: 4px 0;", "{view.title}" }
            svg {
                width: "{width}",
                height: "{height}",
                view_box: "0 0 {width} {height}",
                onmouseleave: move |_| hovered.set(None),

                if chart.grid.enabled {
                    for (y, _) in ticks.iter() {
                        line { x1: "{left}", x2: "{right}", y1: "{y}", y2: "{y}", stroke: "{chart.grid.color}", stroke_dasharray: "{grid_dash}" }
                    }
                }
                line { x1: "{left}", x2: "{left}", y1: "{top}", y2: "{bottom}", stroke: "{axis_color}" }
                line { x1: "{left}", x2: "{right}", y1: "{bottom}", y2: "{bottom}", stroke: "{axis_color}" }
                for (y, label) in ticks.iter() {
                    text { x: "{tick_x}", y: "{y}", dy: "4", text_anchor: "end", font_size: "11", fill: "{text_color}", "{label}" }
                }
                for (x, label) in x_labels.iter() {
                    text { x: "{x}", y: "{label_y}", text_anchor: "middle", font_size: "11", fill: "{text_color}", "{label}" }
                }

                if let Some((_, x, _)) = readout.as_ref() {
                    line { x1: "{x}", x2: "{x}", y1: "{top}", y2: "{bottom}", stroke: "{axis_color}", stroke_width: "1" }
                }

                for series in lines.iter() {
                    g { key: "{series.name}",
                        for segment in series.segments.iter() {
                            polyline {
                                points: "{segment}",
                                fill: "none",
                                stroke: "{series.style.color}",
                                stroke_width: "{series.style.width}",
                                stroke_dasharray: "{series.dash}",
                            }
                        }
                        for (x, y) in series.points.iter() {
                            circle { cx: "{x}", cy: "{y}", r: "{point_radius}", fill: "{series.style.color}",
                                title { "{series.name}" }
                            }
                        }
                    }
                }

                // Hover bands on top so every period column catches the pointer.
                for (i, x) in bands.iter().copied() {
                    rect {
                        key: "band-{i}",
                        x: "{x}",
                        y: "{top}",
                        width: "{slot}",
                        height: "{plot_height}",
                        fill: "transparent",
                        onmouseenter: move |_| hovered.set(Some(i)),
                    }
                }
            }
            div { class: "chart-legend", style: "display: flex; gap: 16px; flex-wrap: wrap; color: {text_color};",
                for series in lines.iter() {
                    span { key: "{series.name}",
                        span { style: "display: inline-block; width: 18px; border-top: {series.legend}; margin-right: 6px; vertical-align: middle;" }
                        "{series.name}"
                    }
                }
            }
            if let Some((period, _, values)) = readout {
                div { class: "chart-readout", style: "color: {text_color}; font-size: 13px; margin-top: 6px;",
                    strong { "{period}" }
                    for (name, value) in values {
                        span { style: "margin-left: 14px;", "{name}: {value}" }
                    }
                }
            }
        }
    }
}

struct SeriesLine {
    name: String,
    style: SeriesStyle,
    dash: String,
    legend: String,
    segments: Vec<String>,
    points: Vec<(f64, f64)>,
}

fn legend_border(style: &SeriesStyle) -> &'static str {
    match style.dash.as_deref() {
        None | Some("") => "solid",
        Some(dash) if dash.starts_with('2') => "dotted",
        Some(_) => "dashed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_period_text_prefers_month_token() {
        let dated = PeriodLabel::new("2025-01-31", NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(period_text(&dated), "Jan '25");
        let plain = PeriodLabel::new("Q1", None);
        assert_eq!(period_text(&plain), "Q1");
    }

    #[test]
    fn test_legend_border() {
        let mut style = SeriesStyle { color: "#000".into(), width: 2.0, dash: None };
        assert_eq!(legend_border(&style), "solid");
        style.dash = Some("2,4".into());
        assert_eq!(legend_border(&style), "dotted");
        style.dash = Some("8,4".into());
        assert_eq!(legend_border(&style), "dashed");
    }
}
