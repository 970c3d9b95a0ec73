//! `GET /qrcodes/{id}/{*outlink}` - count the scan, then send the visitor on
//!
//! The outlink arrives percent-decoded by the path extractor. Recording is
//! best-effort; the redirect page is served whether or not it succeeded.

use axum::{
    extract::{Path, State},
    response::Html,
};
use http::HeaderMap;

use crate::core::ServerState;
use crate::services::VisitorInfo;
use crate::services::tracker::validate_outlink;
use crate::utils::AppResult;

/// GET /qrcodes/{id}/{*outlink}
pub async fn scan(
    State(state): State<ServerState>,
    Path((id, outlink)): Path<(String, String)>,
    headers: HeaderMap,
) -> AppResult<Html<String>> {
    let outlink = validate_outlink(&outlink)?;
    let visitor = visitor_info(&headers);

    let recorded = state.trackers.log_visit(&id, outlink, &visitor);
    tracing::info!(tracker_id = %id, recorded, "QR scan");

    Ok(Html(redirect_page(outlink, state.config.redirect_delay_ms)))
}

fn visitor_info(headers: &HeaderMap) -> VisitorInfo {
    let header = |name: http::header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    // "pt-BR,pt;q=0.9,en;q=0.8" -> "pt-BR"
    let language = header(http::header::ACCEPT_LANGUAGE)
        .split(',')
        .next()
        .and_then(|tag| tag.split(';').next())
        .unwrap_or_default()
        .trim()
        .to_string();

    VisitorInfo {
        user_agent: header(http::header::USER_AGENT),
        language,
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON string literal that is also safe inside a `<script>` element
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

pub(crate) fn redirect_page(outlink: &str, delay_ms: u64) -> String {
    let href = escape_html(outlink);
    let target = js_string(outlink);
    let delay_secs = delay_ms as f64 / 1000.0;
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta http-equiv="refresh" content="{delay_secs};url={href}">
<title>Matelli Congelados</title>
</head>
<body style="font-family: sans-serif; text-align: center; padding-top: 20vh;">
<p>Redirecionando...</p>
<p><a href="{href}">Clique aqui se não for redirecionado</a></p>
<script>setTimeout(function () {{ window.location.replace({target}); }}, {delay_ms});</script>
</body>
</html>
"#
    )
}
