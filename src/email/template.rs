//! HTML rendering of the analysis email

use chrono::{DateTime, NaiveDate, Utc};

/// Disclaimer shown under every analysis.
pub const RISK_WARNING: &str = "This analysis is for educational purposes only. \
Trading involves substantial risk. Never risk more than you can afford to lose.";

/// Subject line for the given day: `🥇 XAUUSD Analysis - YYYY-MM-DD`.
pub fn email_subject(date: NaiveDate) -> String {
    format!("🥇 XAUUSD Analysis - {}", date.format("%Y-%m-%d"))
}

/// Wrap the analysis in the fixed HTML layout.
///
/// The text goes into the `<pre>` block verbatim. It is not HTML-escaped so
/// that the report reaches the reader exactly as the model wrote it.
pub fn format_email_html(analysis_text: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .header {{ background-color: #1a1a1a; color: #64f4ac; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background-color: #f9f9f9; }}
        .telegram-box {{ background-color: #0088cc; color: white; padding: 15px; margin: 20px 0; border-radius: 8px; }}
        .warning {{ background-color: #ff4757; color: white; padding: 10px; border-radius: 5px; margin: 10px 0; }}
        .success {{ background-color: #2ed573; color: white; padding: 10px; border-radius: 5px; margin: 10px 0; }}
        pre {{ background-color: #f4f4f4; padding: 10px; border-radius: 5px; overflow-x: auto; white-space: pre-wrap; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>🥇 XAUUSD Daily Analysis</h1>
        <p>{timestamp}</p>
    </div>
    <div class="content">
        <pre>{analysis_text}</pre>
        <div class="warning">
            <strong>⚠️ Risk Warning:</strong> {RISK_WARNING}
        </div>
    </div>
</body>
</html>
"#,
        timestamp = generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
