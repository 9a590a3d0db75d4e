use easel_config::{AnyOrList, CorsConfig};
use http::Method;
use http::header::HeaderName;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Entries that fail to parse as origins, methods or header names are
/// dropped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = match &config.origins {
        AnyOrList::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrList::List(origins) => layer.allow_origin(parse_all::<http::HeaderValue>("origin", origins)),
    };

    layer = match &config.methods {
        AnyOrList::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrList::List(methods) => layer.allow_methods(parse_all::<Method>("method", methods)),
    };

    layer = match &config.headers {
        AnyOrList::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrList::List(headers) => layer.allow_headers(parse_all::<HeaderName>("header", headers)),
    };

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

fn parse_all<T: std::str::FromStr>(kind: &'static str, values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed: Option<T> = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(kind, value = %value, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
