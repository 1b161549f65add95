// Dashboard panels: one per BEL table plus the ALM duration panel
#![allow(non_snake_case)]
use dioxus::prelude::*;
use engine::alm::{AlmRowExt, AlmTableExt};
use engine::services::selection::{
    date_input_value, initial_bounds, parse_input_date, range_from_inputs, reference_for, toggle_metric, DATE_FORMAT,
};
use engine::services::{ChartView, TableKind, NO_DATA_MESSAGE};
use shared::models::{AlmField, AlmTable, RangeStrategy, Table};
use shared::utils::{format_percent, format_value};

use super::chart::{LineChart, SeriesStyle};
use crate::state::app_state::AppState;

#[component]
pub fn TablePanel(kind: TableKind, title: String, table: Table, defaults: Vec<String>) -> Element {
    let state = use_context::<AppState>();
    let mut selected = use_signal(|| defaults.clone());
    let (first, last) = initial_bounds(&table);
    let mut start = use_signal(|| first);
    let mut end = use_signal(|| last);

    let range = range_from_inputs(&table, &start.read(), &end.read());
    let chart = ChartView::build(&title, &table, &selected.read(), &range);
    let percent_metrics = if kind == TableKind::Percentage { table.row_labels.clone() } else { Vec::new() };
    let styles: Vec<SeriesStyle> = table
        .row_labels
        .iter()
        .enumerate()
        .filter(|(_, r)| selected.read().contains(r))
        .map(|(i, _)| SeriesStyle {
            color: state.config.series_color(i),
            width: state.config.chart.line_width,
            dash: None,
        })
        .collect();
    let palette = state.palette.clone();
    let labels = table.column_texts();
    let dated = table.strategy == RangeStrategy::Dates;

    rsx! {
        section { class: "panel", style: "background: {palette.panel}; padding: 12px; margin-bottom: 16px; border-radius: 6px;",
            h2 { style: "color: {palette.foreground}; margin-top: 0;", "{title}" }
            div { class: "metric-picker", style: "display: flex; flex-wrap: wrap; gap: 10px; color: {palette.foreground};",
                for metric in table.row_labels.iter().cloned() {
                    label { key: "{metric}",
                        input {
                            r#type: "checkbox",
                            checked: selected.read().contains(&metric),
                            onchange: {
                                let table = table.clone();
                                let metric = metric.clone();
                                move |_| {
                                    let next = toggle_metric(&table, &selected.read(), &metric);
                                    selected.set(next);
                                }
                            },
                        }
                        " {metric}"
                    }
                }
            }
            div { class: "range-picker", style: "margin: 8px 0; color: {palette.muted};",
                if dated {
                    "From "
                    input { r#type: "date", value: "{start}", oninput: move |evt: FormEvent| start.set(evt.value()) }
                    " to "
                    input { r#type: "date", value: "{end}", oninput: move |evt: FormEvent| end.set(evt.value()) }
                } else {
                    "From "
                    select { value: "{start}", onchange: move |evt: FormEvent| start.set(evt.value()),
                        for text in labels.iter() {
                            option { key: "{text}", value: "{text}", selected: *text == *start.read(), "{text}" }
                        }
                    }
                    " to "
                    select { value: "{end}", onchange: move |evt: FormEvent| end.set(evt.value()),
                        for text in labels.iter() {
                            option { key: "{text}", value: "{text}", selected: *text == *end.read(), "{text}" }
                        }
                    }
                }
            }
            {match chart {
                Ok(view) => rsx! {
                    LineChart {
                        view,
                        styles,
                        chart: state.config.chart.clone(),
                        percent_metrics,
                        decimals: state.config.app.decimals,
                        axis_color: palette.axis.clone(),
                        text_color: palette.foreground.clone(),
                    }
                },
                Err(e) => rsx! {
                    div { class: "panel-error", style: "color: {palette.error};", "{e}" }
                },
            }}
        }
    }
}

/// Series styles for the ALM chart, by field in `AlmField::ALL` order.
pub fn alm_series_styles(state: &AppState, alm: &AlmTable) -> Vec<SeriesStyle> {
    AlmField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let style = state
                .config
                .alm_styles
                .get(&alm.field_name(*field))
                .or_else(|| state.config.alm_styles.get(field.default_column()));
            SeriesStyle {
                color: state.config.series_color(i),
                width: style.map(|s| s.width).unwrap_or(state.config.chart.line_width),
                dash: style.and_then(|s| s.dash.clone()),
            }
        })
        .collect()
}

#[component]
pub fn AlmPanel(title: String, alm: AlmTable) -> Element {
    let state = use_context::<AppState>();
    let first = date_input_value(alm.rows.first().map(|r| r.date));
    let last = date_input_value(alm.rows.last().map(|r| r.date));
    let mut start = use_signal(|| first);
    let mut end = use_signal(|| last);
    // Picked reporting date; `None` follows the last row of the range.
    let mut choice = use_signal(|| None::<chrono::NaiveDate>);
    let decimals = state.config.app.decimals;

    let filtered = match (parse_input_date(&start.read()), parse_input_date(&end.read())) {
        (Some(s), Some(e)) => alm.filter_dates(s, e),
        _ => alm.clone(),
    };
    let reference = reference_for(&filtered, choice());
    let selected_date = filtered.reference_row(reference).map(|r| r.date);
    let target = filtered.reference_row(reference).and_then(|row| row.duration_target());
    let summary: Vec<(&str, String)> = match &target {
        Some(t) => vec![
            ("Reference date", t.date.format(DATE_FORMAT).to_string()),
            ("Duration Liabilities", format_value(Some(t.duration_liabilities), decimals)),
            ("Surplus Asset %", format_percent(Some(t.surplus_asset_pct), decimals)),
            ("Duration Asset", format_value(t.duration_asset, decimals)),
            ("Optimal Asset Duration", format_value(Some(t.optimal_asset_duration), decimals)),
            ("Gap", format_value(t.gap(), decimals)),
        ],
        None => Vec::new(),
    };
    let reference_date = selected_date.map(|d| d.format(DATE_FORMAT).to_string());
    let view = ChartView::from_table(&title, &filtered.to_table(&title));
    let styles = alm_series_styles(&state, &filtered);
    let percent_metrics = vec![filtered.field_name(AlmField::SurplusAssetPct)];
    let dates: Vec<(String, bool)> = filtered
        .rows
        .iter()
        .map(|r| (r.date.format(DATE_FORMAT).to_string(), Some(r.date) == selected_date))
        .collect();
    let palette = state.palette.clone();

    rsx! {
        section { class: "panel", style: "background: {palette.panel}; padding: 12px; margin-bottom: 16px; border-radius: 6px;",
            h2 { style: "color: {palette.foreground}; margin-top: 0;", "{title}" }
            div { class: "range-picker", style: "margin: 8px 0; color: {palette.muted};",
                "From "
                input { r#type: "date", value: "{start}", oninput: move |evt: FormEvent| start.set(evt.value()) }
                " to "
                input { r#type: "date", value: "{end}", oninput: move |evt: FormEvent| end.set(evt.value()) }
                " Reference "
                select {
                    onchange: move |evt: FormEvent| choice.set(parse_input_date(&evt.value())),
                    for (date, is_selected) in dates.iter().cloned() {
                        option { key: "{date}", value: "{date}", selected: is_selected, "{date}" }
                    }
                }
            }
            LineChart {
                view,
                styles,
                chart: state.config.chart.clone(),
                percent_metrics,
                decimals,
                axis_color: palette.axis.clone(),
                text_color: palette.foreground.clone(),
            }
            {match (target.is_some(), reference_date) {
                (true, _) => rsx! {
                    table { class: "duration-target", style: "color: {palette.foreground}; margin-top: 10px;",
                        tbody {
                            for (name, value) in summary.iter() {
                                tr { key: "{name}", td { "{name}" } td { "{value}" } }
                            }
                        }
                    }
                },
                (false, Some(date)) => rsx! {
                    p { style: "color: {palette.muted};", "Row {date} lacks Duration Liabilities or Surplus Asset %" }
                },
                (false, None) => rsx! {
                    p { style: "color: {palette.muted};", "{NO_DATA_MESSAGE}" }
                },
            }}
        }
    }
}
