//! Static cache-route table for offline delivery of the web build.
//!
//! The input loop never consults this table. It exists so the route policy
//! lives next to the code it ships with and can be emitted for the service
//! worker by `replay_cli routes`.

use regex::Regex;
use serde::Serialize;

pub const CACHE_NAME_PREFIX: &str = "spooky-maze";
pub const DEFAULT_ASSET_ORIGIN: &str = "https://assets.spooky-maze.example";
const FINGERPRINTED_MAX_AGE_SECONDS: u64 = 24 * 60 * 60 * 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    CacheFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Expiration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<u32>,
    pub purge_on_quota_error: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheRoute {
    pub cache_name: String,
    pub pattern: String,
    #[serde(skip)]
    matcher: Regex,
    pub strategy: CacheStrategy,
    pub expiration: Expiration,
}

impl CacheRoute {
    pub fn new(
        cache_name: impl Into<String>,
        pattern: impl Into<String>,
        strategy: CacheStrategy,
        expiration: Expiration,
    ) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let matcher = Regex::new(&pattern)?;
        Ok(Self {
            cache_name: cache_name.into(),
            pattern,
            matcher,
            strategy,
            expiration,
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.matcher.is_match(url)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheRouteTable {
    routes: Vec<CacheRoute>,
}

impl CacheRouteTable {
    /// Cache-first routes for fingerprinted scripts, stylesheets and fonts on `asset_origin`.
    pub fn fingerprinted_assets(asset_origin: &str) -> Result<Self, regex::Error> {
        let origin = regex::escape(asset_origin.trim_end_matches('/'));
        let expiration = Expiration {
            max_age_seconds: Some(FINGERPRINTED_MAX_AGE_SECONDS),
            max_entries: None,
            purge_on_quota_error: true,
        };

        let mut table = Self::default();
        for (kind, extension) in [("js", "js"), ("css", "css"), ("font", "woff2")] {
            table.push(CacheRoute::new(
                format!("{CACHE_NAME_PREFIX}-{kind}-cache"),
                format!(r"^{origin}/.*\.{extension}$"),
                CacheStrategy::CacheFirst,
                expiration,
            )?);
        }
        Ok(table)
    }

    pub fn push(&mut self, route: CacheRoute) {
        self.routes.push(route);
    }

    pub fn routes(&self) -> &[CacheRoute] {
        &self.routes
    }

    /// First registered route matching `url`.
    pub fn route_for(&self, url: &str) -> Option<&CacheRoute> {
        self.routes.iter().find(|route| route.matches(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CacheRouteTable {
        CacheRouteTable::fingerprinted_assets(DEFAULT_ASSET_ORIGIN).expect("routes")
    }

    #[test]
    fn fingerprinted_assets_route_by_extension() {
        let table = table();
        let js = table
            .route_for("https://assets.spooky-maze.example/pkg/index-3f2a.js")
            .expect("js route");
        assert_eq!(js.cache_name, "spooky-maze-js-cache");

        let font = table
            .route_for("https://assets.spooky-maze.example/fonts/mono.woff2")
            .expect("font route");
        assert_eq!(font.cache_name, "spooky-maze-font-cache");
        assert_eq!(font.strategy, CacheStrategy::CacheFirst);
        assert_eq!(
            font.expiration.max_age_seconds,
            Some(FINGERPRINTED_MAX_AGE_SECONDS)
        );
    }

    #[test]
    fn other_origins_and_extensions_are_not_routed() {
        let table = table();
        assert!(table
            .route_for("https://elsewhere.example/pkg/index.js")
            .is_none());
        assert!(table
            .route_for("https://assets.spooky-maze.example/index.html")
            .is_none());
        assert!(table
            .route_for("https://assets.spooky-maze.example/app.js.map")
            .is_none());
    }

    #[test]
    fn origin_is_matched_literally() {
        let table = CacheRouteTable::fingerprinted_assets("https://a.b/").expect("routes");
        assert!(table.route_for("https://a.b/x.css").is_some());
        assert!(table.route_for("https://aXb/x.css").is_none());
    }

    #[test]
    fn serialized_table_omits_matcher() {
        let json = serde_json::to_value(table()).expect("serialize");
        let first = &json["routes"][0];
        assert_eq!(first["strategy"], "cache_first");
        assert!(first.get("matcher").is_none());
        assert!(first["expiration"].get("max_entries").is_none());
    }
}
