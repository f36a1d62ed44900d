//! The two navigable views

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    /// Search view, at `/`
    Search,
    /// Detail view for a card's secondary id, at `/cards/{id}`
    CardDetail(u64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Search => "/".to_string(),
            Route::CardDetail(id) => format!("/cards/{id}"),
        }
    }

    /// Match a path against the known routes
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Some(Route::Search);
        }

        path.strip_prefix("/cards/")
            .and_then(|id| id.parse::<u64>().ok())
            .map(Route::CardDetail)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Search.path(), "/");
        assert_eq!(Route::CardDetail(37777).path(), "/cards/37777");
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some(Route::Search));
        assert_eq!(Route::parse(""), Some(Route::Search));
        assert_eq!(Route::parse("/cards/37777"), Some(Route::CardDetail(37777)));
        assert_eq!(Route::parse("/cards/37777/"), Some(Route::CardDetail(37777)));
    }

    #[test]
    fn test_route_parse_rejects_unknown() {
        assert_eq!(Route::parse("/cards/abc"), None);
        assert_eq!(Route::parse("/cards/"), None);
        assert_eq!(Route::parse("/sets/m11"), None);
    }
}
