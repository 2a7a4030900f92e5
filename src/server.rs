//! HTTP surface: the scrape endpoint plus the two chart pages.
//!
//! Handlers are stateless; the only shared state is the config and the
//! feed client. Every route answers 200 — feed failures fall back to
//! synthetic data and a failed chart render degrades to an empty string.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    response::{Html, Json},
    routing::get,
    Router,
};
use rand::thread_rng;
use serde::Serialize;

use crate::chart::{self, ChartSpec};
use crate::config::Config;
use crate::feed::IndexFeed;
use crate::logging::{json_log, obj, v_num, v_str};
use crate::market::{self, IndexSummary};

pub struct AppState {
    pub cfg: Config,
    pub feed: Arc<dyn IndexFeed>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    #[serde(flatten)]
    pub summary: IndexSummary,
    pub chart_base64: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scrape/", get(scrape_handler))
        .route("/chart/", get(index_page_handler))
        .route("/fake-chart/", get(fake_chart_handler))
        .with_state(state)
}

pub async fn serve(cfg: Config, feed: Arc<dyn IndexFeed>) -> Result<()> {
    let bind_addr = cfg.bind_addr.clone();
    let state = Arc::new(AppState { cfg, feed });
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    json_log(
        "system",
        obj(&[("event", v_str("listening")), ("addr", v_str(&bind_addr))]),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn scrape_handler(State(state): State<Arc<AppState>>) -> Json<ScrapeResponse> {
    let fetched = state.feed.latest_close().await;
    if let Err(err) = &fetched {
        json_log(
            "feed",
            obj(&[
                ("event", v_str("fallback")),
                ("error", v_str(&err.to_string())),
            ]),
        );
    }

    let mut rng = thread_rng();
    let value = market::resolve_value(
        fetched,
        state.cfg.fallback_low,
        state.cfg.fallback_high,
        &mut rng,
    );
    let summary = market::summarize(value);

    let spec = ChartSpec {
        days: state.cfg.chart_days,
        ..ChartSpec::default()
    };
    let series = chart::synthetic_series(summary.value, spec.days, &mut rng);
    let chart_base64 = match chart::render_png_base64(&spec, &series) {
        Ok(encoded) => encoded,
        Err(err) => {
            json_log(
                "chart",
                obj(&[
                    ("event", v_str("render_failed")),
                    ("error", v_str(&err.to_string())),
                ]),
            );
            String::new()
        }
    };

    json_log(
        "http",
        obj(&[
            ("route", v_str("/scrape/")),
            ("value", v_num(summary.value)),
            ("status", v_str(summary.status.as_str())),
        ]),
    );

    Json(ScrapeResponse {
        summary,
        chart_base64,
    })
}

async fn fake_chart_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut rng = thread_rng();
    let spec = ChartSpec {
        days: state.cfg.chart_days,
        ..ChartSpec::default()
    };
    let series = chart::fake_series(spec.days, &mut rng);
    let body = match chart::render_png_base64(&spec, &series) {
        Ok(encoded) => format!(
            "<!doctype html><html><head><title>DSEX Index (Fake Data)</title></head>\
             <body><h1>DSEX Index (Fake Data)</h1>\
             <img src=\"data:image/png;base64,{}\" alt=\"DSEX index chart\"/>\
             </body></html>",
            encoded
        ),
        Err(err) => {
            json_log(
                "chart",
                obj(&[
                    ("event", v_str("render_failed")),
                    ("error", v_str(&err.to_string())),
                ]),
            );
            "<!doctype html><html><body><p>chart unavailable</p></body></html>".to_string()
        }
    };
    json_log("http", obj(&[("route", v_str("/fake-chart/"))]));
    Html(body)
}

const INDEX_PAGE: &str = r#"<!doctype html>
<html>
<head><title>DSEX Index</title></head>
<body>
<h1>DSEX Index</h1>
<p id="summary">loading&hellip;</p>
<img id="chart" alt="DSEX index chart"/>
<script>
fetch('/scrape/')
  .then(function (resp) { return resp.json(); })
  .then(function (data) {
    document.getElementById('summary').textContent =
      data.value + ' (' + data.status + ')';
    document.getElementById('chart').src =
      'data:image/png;base64,' + data.chart_base64;
  });
</script>
</body>
</html>
"#;

async fn index_page_handler() -> Html<&'static str> {
    json_log("http", obj(&[("route", v_str("/chart/"))]));
    Html(INDEX_PAGE)
}
