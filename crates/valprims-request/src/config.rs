/// Keys under which validated maps are written back onto the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub query_key: String,
    pub body_key: String,
    pub params_key: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            query_key: "query".to_string(),
            body_key: "body".to_string(),
            params_key: "params".to_string(),
        }
    }
}

/// Limits applied when loading route declarations from a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Maximum number of routes loaded from a directory.
    pub max_routes_from_directory: usize,
    /// Maximum bytes allowed per route file loaded from a directory.
    pub max_route_file_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_routes_from_directory: 256,
            max_route_file_size: 256 * 1024,
        }
    }
}
