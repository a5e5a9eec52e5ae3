use crate::charts::{Bar, ChartRenderer, Series, SvgCharts};
use crate::config::PanelSettings;
use crate::models::{DashboardData, KpiSummary, ReorderItem, SalesPoint};
use crate::money::format_currency;
use chrono::NaiveDate;
use std::fmt::Write;

pub const SERIES_EMPTY_MESSAGE: &str = "No data: no sales series is available yet.";
pub const REORDER_EMPTY_MESSAGE: &str =
    "No data: no product needs restocking within this horizon.";

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
}

/// The five headline cards, in display order. Missing figures count as 0.
pub fn kpi_cards(kpi: &KpiSummary, settings: &PanelSettings) -> Vec<KpiCard> {
    let fmt = |value: Option<f64>| {
        format_currency(value.unwrap_or(0.0), &settings.locale, &settings.currency)
    };
    vec![
        KpiCard {
            title: "Net revenue",
            value: fmt(kpi.net_revenue),
        },
        KpiCard {
            title: "Cost of sales (COGS)",
            value: fmt(kpi.net_cogs),
        },
        KpiCard {
            title: "Gross margin",
            value: fmt(kpi.gross_margin),
        },
        KpiCard {
            title: "Net expenses",
            value: fmt(kpi.net_expenses),
        },
        KpiCard {
            title: "Net profit",
            value: fmt(kpi.net_profit),
        },
    ]
}

/// Full dashboard document, wrapped in the site layout.
pub fn render_dashboard(data: &DashboardData, settings: &PanelSettings, rendered_at: &str) -> String {
    let body = render_panel(data, settings, &SvgCharts);
    render_layout("Panel", "/panel", &body, rendered_at)
}

pub fn render_panel<C: ChartRenderer>(
    data: &DashboardData,
    settings: &PanelSettings,
    charts: &C,
) -> String {
    let mut cards = String::new();
    for card in kpi_cards(&data.kpi, settings) {
        let _ = write!(
            cards,
            r#"<div class="stat"><span class="label">{}</span><span class="value">{}</span></div>"#,
            escape_html(card.title),
            escape_html(&card.value)
        );
    }

    PANEL_HTML
        .replace("{{CARDS}}", &cards)
        .replace(
            "{{SERIES_PANEL}}",
            &render_series_panel(&data.series, settings.series_days, charts),
        )
        .replace(
            "{{REORDER_PANEL}}",
            &render_reorder_panel(&data.reorder, settings.reorder_horizon_days, charts),
        )
}

pub fn render_series_panel<C: ChartRenderer>(series: &[SalesPoint], days: u32, charts: &C) -> String {
    let content = if series.is_empty() {
        empty_state(SERIES_EMPTY_MESSAGE)
    } else {
        let labels: Vec<String> = series.iter().map(|point| series_label(&point.date)).collect();
        let lines = [
            Series {
                name: "Revenue".to_string(),
                class: "line-revenue",
                values: series.iter().map(|point| point.revenue).collect(),
            },
            Series {
                name: "COGS".to_string(),
                class: "line-cogs",
                values: series.iter().map(|point| point.cogs).collect(),
            },
            Series {
                name: "Margin".to_string(),
                class: "line-margin",
                values: series.iter().map(|point| point.margin).collect(),
            },
        ];
        charts.line_chart(&labels, &lines)
    };

    chart_card(
        "series-panel",
        &format!("Revenue / COGS / Margin, last {days} days"),
        &content,
    )
}

pub fn render_reorder_panel<C: ChartRenderer>(
    items: &[ReorderItem],
    horizon_days: u32,
    charts: &C,
) -> String {
    let content = if items.is_empty() {
        empty_state(REORDER_EMPTY_MESSAGE)
    } else {
        let bars: Vec<Bar> = items
            .iter()
            .map(|item| Bar {
                label: item.display_name().to_string(),
                value: item.reorder_qty as f64,
            })
            .collect();
        let mut content = charts.bar_chart(&bars);
        content.push_str(&reorder_table(items));
        content
    };

    chart_card(
        "reorder-panel",
        &format!("Products to restock ({horizon_days}d)"),
        &content,
    )
}

fn reorder_table(items: &[ReorderItem]) -> String {
    let mut rows = String::new();
    for item in items {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"qty\">{}</td></tr>",
            escape_html(item.display_name()),
            crate::charts::format_axis_value(item.demand_over_horizon),
            item.stock_on_hand,
            item.lead_time_days,
            item.safety_stock,
            item.reorder_qty
        );
    }
    format!(
        "<table class=\"reorder-table\"><thead><tr><th>Product</th><th>Demand</th><th>On hand</th>\
         <th>Lead time (d)</th><th>Safety stock</th><th>Units</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn chart_card(id: &str, title: &str, content: &str) -> String {
    format!(
        r#"<section class="chart-card" id="{id}"><div class="chart-header"><h2>{}</h2></div>{content}</section>"#,
        escape_html(title)
    )
}

fn empty_state(message: &str) -> String {
    format!(r#"<p class="empty">{}</p>"#, escape_html(message))
}

/// `2025-03-07` becomes `03-07`; anything unparsable is shown as sent.
pub fn series_label(date: &str) -> String {
    date.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|day| day.format("%m-%d").to_string())
        .unwrap_or_else(|| date.to_string())
}

pub fn render_layout(title: &str, active_href: &str, body: &str, rendered_at: &str) -> String {
    let mut nav = String::new();
    for (href, label) in NAV_LINKS {
        let class = if *href == active_href { "nav-link active" } else { "nav-link" };
        let _ = write!(nav, r#"<a class="{class}" href="{href}">{label}</a>"#);
    }
    for label in UPCOMING_SECTIONS {
        let _ = write!(nav, r#"<span class="nav-link upcoming">{label}</span>"#);
    }

    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", &nav)
        .replace("{{UPDATED}}", &escape_html(rendered_at))
        .replace("{{BODY}}", body)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const NAV_LINKS: &[(&str, &str)] = &[("/panel", "Panel")];
const UPCOMING_SECTIONS: &[&str] = &["Inventory", "Campaigns"];

const PANEL_HTML: &str = r#"<header>
      <h1>Panel: sales flow</h1>
      <p class="subtitle">Cash flow, sales and stock at a glance.</p>
    </header>

    <section class="panel">{{CARDS}}</section>

    <div class="charts">
      {{SERIES_PANEL}}
      {{REORDER_PANEL}}
    </div>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Leaf AI</title>
  <meta name="description" content="Cash flow, inventory and campaigns for small shops" />
  <style>
    :root {
      --bg: #f6f5f2;
      --ink: #2b2a28;
      --muted: #8b857d;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --accent-3: #2d7a4b;
      --card: #ffffff;
      --border: rgba(47, 72, 88, 0.08);
      --shadow: 0 12px 32px rgba(47, 72, 88, 0.10);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .shell {
      display: flex;
      min-height: 100vh;
    }

    aside {
      width: 240px;
      background: var(--card);
      border-right: 1px solid var(--border);
      padding: 20px 12px;
    }

    .brand {
      font-size: 1.15rem;
      font-weight: 600;
      padding: 0 12px 16px;
    }

    .nav-link {
      display: block;
      border-radius: 10px;
      padding: 8px 12px;
      color: inherit;
      text-decoration: none;
      font-size: 0.95rem;
    }

    .nav-link.active {
      background: rgba(47, 72, 88, 0.08);
      color: var(--accent-2);
      font-weight: 600;
    }

    .nav-link.upcoming {
      color: var(--muted);
    }

    main {
      flex: 1;
      padding: 32px;
      display: grid;
      gap: 28px;
      align-content: start;
    }

    h1 {
      margin: 0;
      font-size: 1.6rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 16px;
    }

    .stat {
      background: var(--card);
      border-radius: 16px;
      padding: 16px;
      border: 1px solid var(--border);
      box-shadow: var(--shadow);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.4rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
      gap: 24px;
    }

    .chart-card {
      background: var(--card);
      border-radius: 20px;
      padding: 16px;
      border: 1px solid var(--border);
      box-shadow: var(--shadow);
    }

    .chart-header h2 {
      margin: 0 0 12px;
      font-size: 1.1rem;
    }

    .chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-axis {
      stroke: rgba(47, 72, 88, 0.25);
      stroke-dasharray: 4 6;
    }

    .chart-label,
    .chart-value {
      fill: #7a746d;
      font-size: 11px;
    }

    .chart-line {
      fill: none;
      stroke-width: 2.5;
    }

    .chart-point {
      fill: white;
      stroke-width: 2;
    }

    .line-revenue { stroke: var(--accent-2); fill: var(--accent-2); }
    .line-cogs { stroke: var(--accent); fill: var(--accent); }
    .line-margin { stroke: var(--accent-3); fill: var(--accent-3); }
    .chart-line.line-revenue, .chart-line.line-cogs, .chart-line.line-margin { fill: none; }
    .chart-point.line-revenue, .chart-point.line-cogs, .chart-point.line-margin { fill: white; }

    .chart-bar {
      fill: var(--accent);
    }

    .empty {
      margin: 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .reorder-table {
      width: 100%;
      margin-top: 12px;
      border-collapse: collapse;
      font-size: 0.85rem;
    }

    .reorder-table th,
    .reorder-table td {
      text-align: left;
      padding: 6px 8px;
      border-bottom: 1px solid var(--border);
    }

    .reorder-table .qty {
      font-weight: 600;
      color: var(--accent);
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.85rem;
    }

    @media (max-width: 720px) {
      .shell {
        flex-direction: column;
      }
      aside {
        width: 100%;
      }
      main {
        padding: 20px 16px;
      }
    }
  </style>
</head>
<body>
  <div class="shell">
    <aside>
      <div class="brand">Leaf AI</div>
      <nav>{{NAV}}</nav>
    </aside>
    <main>
    {{BODY}}
    <p class="hint">Updated {{UPDATED}} (server time). Figures come straight from the backend on every load.</p>
    </main>
  </div>
</body>
</html>
"#;
