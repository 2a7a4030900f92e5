#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub dse_base: String,
    pub feed_timeout_secs: u64,
    pub fallback_low: u32,
    pub fallback_high: u32,
    pub sqlite_path: String,
    pub chart_days: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
            dse_base: std::env::var("DSE_BASE").unwrap_or_else(|_| "https://www.dsebd.org".to_string()),
            feed_timeout_secs: std::env::var("FEED_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
            fallback_low: std::env::var("FALLBACK_LOW").ok().and_then(|v| v.parse().ok()).unwrap_or(6500),
            fallback_high: std::env::var("FALLBACK_HIGH").ok().and_then(|v| v.parse().ok()).unwrap_or(6800),
            sqlite_path: std::env::var("SQLITE_PATH").unwrap_or_else(|_| "./skytrade.sqlite".to_string()),
            chart_days: std::env::var("CHART_DAYS").ok().and_then(|v| v.parse().ok()).unwrap_or(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_env() {
        let cfg = Config::from_env();
        assert_eq!(cfg.feed_timeout_secs, 10);
        assert_eq!(cfg.fallback_low, 6500);
        assert_eq!(cfg.fallback_high, 6800);
        assert_eq!(cfg.chart_days, 30);
    }
}
