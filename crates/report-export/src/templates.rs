use analysis_core::{clamp_score, AnalyzedReport, MetricsPayload, Mode, Region};

pub const DISCLAIMER: &str = "⚠️ Educational content only. Not financial advice.";

const BRAND: &str = "ChartMasterAI";
const RULE_WIDTH: usize = 60;

/// Plain-text share body: header, scores, tables, analysis and disclaimer
pub fn render_text(report: &AnalyzedReport) -> String {
    let echo = &report.echo;
    let rule = "═".repeat(RULE_WIDTH);
    let title = match echo.mode {
        Mode::Stock => "📊 Stock Analysis",
        Mode::Global => "🌍 Global Intelligence",
    };
    let region = match echo.region {
        Region::Domestic => "🇮🇳 India (INR)",
        Region::International => "🌍 International (USD)",
    };

    let mut out = format!(
        "{title}\n{BRAND} • {region}\nGenerated: {}\n\n{rule}\n\n",
        echo.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push_str(&metrics_section(&report.parsed.metrics));
    out.push_str(&format!(
        "📋 Analysis:\n{rule}\n{}\n\n{rule}\n{DISCLAIMER}\n",
        report.parsed.display_text
    ));
    out
}

/// The text body inside a minimal dark-theme page, ready for PDF printing
pub fn render_html(report: &AnalyzedReport) -> String {
    let body = escape_html(&render_text(report));
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; white-space: pre-wrap; padding: 20px; font-size: 13px; background: #0A0A0A; color: #E5E5E5; line-height: 1.6; }}
</style>
</head>
<body>{body}</body>
</html>"#
    )
}

fn metrics_section(metrics: &MetricsPayload) -> String {
    let mut scores = String::new();
    let mut tables = String::new();

    match metrics {
        MetricsPayload::Stock(stock) => {
            if let Some(score) = stock.buy_sell_score {
                scores.push_str(&format!("Buy/Sell Score: {}/100\n", score_text(score)));
            }
            if let Some(score) = stock.risk_score {
                scores.push_str(&format!("Risk Level: {}/100\n", score_text(score)));
            }
            if !stock.trend_strength.is_empty() {
                tables.push_str("📈 Trend Strength:\n");
                for trend in &stock.trend_strength {
                    tables.push_str(&format!(
                        "  {:<4}: {:>3}% {}\n",
                        trend.timeframe,
                        score_text(trend.value),
                        trend.sentiment.to_label()
                    ));
                }
                tables.push('\n');
            }
        }
        MetricsPayload::Global(global) => {
            if let Some(score) = global.global_risk_score {
                scores.push_str(&format!("Global Risk: {}/100\n", score_text(score)));
            }
            if let Some(regions) = &global.regional_strength {
                tables.push_str("🗺️ Regional Strength:\n");
                for (name, score) in regions.entries() {
                    if let Some(score) = score {
                        tables.push_str(&format!("  {:<6}: {:>3}\n", name, score_text(score)));
                    }
                }
                tables.push('\n');
            }
            if !global.global_indices.is_empty() {
                tables.push_str("🌐 Global Indices:\n");
                for index in &global.global_indices {
                    let sign = if index.change_percent >= 0.0 { "+" } else { "" };
                    tables.push_str(&format!(
                        "  {:<15}: {}{:.2}% {}\n",
                        index.name,
                        sign,
                        index.change_percent,
                        index.sentiment.to_label()
                    ));
                }
                tables.push('\n');
            }
        }
        MetricsPayload::Empty => {}
    }

    if !scores.is_empty() {
        scores.push('\n');
    }
    scores + &tables
}

fn score_text(score: f64) -> String {
    format!("{:.0}", clamp_score(score))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
