// Proxy helpers - request parsing utilities shared by the route handlers

use pingora_http::RequestHeader;
use std::collections::HashMap;

/// Extract query parameters from URI, URL-decoding the values
///
/// `+` in a value decodes to a space, the form-encoding convention most
/// query-string producers follow.
pub fn extract_query_params(req: &RequestHeader) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = req.uri.query() {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                let value = value.replace('+', "%20");
                params.insert(
                    key.to_string(),
                    urlencoding::decode(&value).unwrap_or_default().to_string(),
                );
            }
        }
    }
    params
}

/// Parse a `/{resource}/{type}/{id}.json` route
///
/// Returns `(content_type, id)` or `None` when the path does not match.
fn parse_resource_path(path: &str, resource: &str) -> Option<(String, String)> {
    let rest = path.strip_prefix("/")?.strip_prefix(resource)?;
    let rest = rest.strip_prefix('/')?;
    let (content_type, id_part) = rest.split_once('/')?;
    let id = id_part.strip_suffix(".json")?;

    if content_type.is_empty() || id.is_empty() || id.contains('/') {
        return None;
    }

    Some((content_type.to_string(), id.to_string()))
}

/// Parse a catalog route of the form `/catalog/{type}/{id}.json`
pub fn parse_catalog_path(path: &str) -> Option<(String, String)> {
    parse_resource_path(path, "catalog")
}

/// Parse a meta route of the form `/meta/{type}/{id}.json`
pub fn parse_meta_path(path: &str) -> Option<(String, String)> {
    parse_resource_path(path, "meta")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path_and_query: &str) -> RequestHeader {
        RequestHeader::build("GET", path_and_query.as_bytes(), None).unwrap()
    }

    #[test]
    fn test_extract_query_params_decodes_values() {
        let req = request("/overlay?posterUrl=https%3A%2F%2Fe.com%2Fp.jpg&rating=8.5");
        let params = extract_query_params(&req);
        assert_eq!(
            params.get("posterUrl").map(String::as_str),
            Some("https://e.com/p.jpg")
        );
        assert_eq!(params.get("rating").map(String::as_str), Some("8.5"));
    }

    #[test]
    fn test_extract_query_params_plus_decodes_to_space() {
        let req = request("/overlay?rating=Top+Rated&posterUrl=https%3A%2F%2Fe.com%2Fa+b.jpg");
        let params = extract_query_params(&req);
        assert_eq!(params.get("rating").map(String::as_str), Some("Top Rated"));
        assert_eq!(
            params.get("posterUrl").map(String::as_str),
            Some("https://e.com/a b.jpg")
        );
    }

    #[test]
    fn test_extract_query_params_encoded_plus_survives() {
        // %2B is a literal plus, not a space
        let req = request("/overlay?rating=8%2B");
        let params = extract_query_params(&req);
        assert_eq!(params.get("rating").map(String::as_str), Some("8+"));
    }

    #[test]
    fn test_extract_query_params_empty_query() {
        let req = request("/overlay");
        assert!(extract_query_params(&req).is_empty());
    }

    #[test]
    fn test_parse_catalog_path() {
        assert_eq!(
            parse_catalog_path("/catalog/movie/top.json"),
            Some(("movie".to_string(), "top".to_string()))
        );
        assert_eq!(
            parse_catalog_path("/catalog/series/trending.json"),
            Some(("series".to_string(), "trending".to_string()))
        );
    }

    #[test]
    fn test_parse_catalog_path_rejects_malformed() {
        assert_eq!(parse_catalog_path("/catalog/movie/top"), None);
        assert_eq!(parse_catalog_path("/catalog/movie.json"), None);
        assert_eq!(parse_catalog_path("/catalog//top.json"), None);
        assert_eq!(parse_catalog_path("/catalog/movie/.json"), None);
        assert_eq!(parse_catalog_path("/catalog/movie/a/b.json"), None);
        assert_eq!(parse_catalog_path("/overlay"), None);
    }

    #[test]
    fn test_parse_meta_path() {
        assert_eq!(
            parse_meta_path("/meta/movie/tt0111161.json"),
            Some(("movie".to_string(), "tt0111161".to_string()))
        );
        assert_eq!(parse_meta_path("/meta/movie/tt0111161"), None);
        assert_eq!(parse_meta_path("/catalog/movie/top.json"), None);
        assert_eq!(parse_meta_path("/metathing/movie/x.json"), None);
    }
}
