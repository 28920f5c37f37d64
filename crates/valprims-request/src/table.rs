use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use valprims_schema::{SchemaLoader, TypeRegistry};

use crate::config::TableConfig;
use crate::error::{RequestError, Result};
use crate::route::RouteValidation;

const ROUTE_SUFFIX: &str = ".route.json";

/// Id-keyed collection of route declarations.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteValidation>,
    config: TableConfig,
}

impl RouteTable {
    /// Create an empty table with default config.
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create an empty table with explicit config.
    pub fn with_config(config: TableConfig) -> Self {
        Self {
            routes: HashMap::new(),
            config,
        }
    }

    /// Register an already built route.
    pub fn insert(&mut self, id: impl Into<String>, route: RouteValidation) {
        self.routes.insert(id.into(), route);
    }

    /// Register a route from a JSON string.
    pub fn register(&mut self, id: impl Into<String>, route_json: &str, types: &TypeRegistry) -> Result<()> {
        let route = RouteValidation::load_str(&SchemaLoader::new(types), route_json)?;
        self.insert(id, route);
        Ok(())
    }

    /// Load from embedded route strings.
    pub fn from_embedded(routes: &[(&str, &str)], types: &TypeRegistry) -> Result<Self> {
        let mut table = Self::new();
        for (id, json) in routes {
            table.register(*id, json, types)?;
        }
        Ok(table)
    }

    /// Load `*.route.json` files from a directory; the id is the file name
    /// without the suffix.
    pub fn from_directory(path: &Path, types: &TypeRegistry) -> Result<Self> {
        Self::from_directory_with_config(path, types, TableConfig::default())
    }

    /// Load routes from a directory with explicit config.
    pub fn from_directory_with_config(
        path: &Path,
        types: &TypeRegistry,
        config: TableConfig,
    ) -> Result<Self> {
        let mut table = Self::with_config(config);
        let mut loaded_route_count = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| RequestError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| RequestError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(id) = route_id_from_file_name(&file_name) else {
                continue;
            };

            let entry_path = entry.path();
            let metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| RequestError::LoadFailed(err.to_string()))?;
            if metadata.file_type().is_symlink() {
                return Err(RequestError::LoadFailed(format!(
                    "refusing to load route symlink: {file_name}"
                )));
            }
            if !metadata.is_file() {
                continue;
            }

            loaded_route_count = loaded_route_count.saturating_add(1);
            if loaded_route_count > table.config.max_routes_from_directory {
                return Err(RequestError::LoadFailed(format!(
                    "route count exceeds configured max ({}): {}",
                    table.config.max_routes_from_directory, loaded_route_count
                )));
            }

            let content = read_bounded(&entry_path, table.config.max_route_file_size)?;
            let route = RouteValidation::load_str(&SchemaLoader::new(types), &content)
                .map_err(|err| RequestError::LoadFailed(format!("{file_name}: {err}")))?;
            tracing::debug!(route = id, "loaded route");
            table.insert(id, route);
        }

        Ok(table)
    }

    pub fn get(&self, id: &str) -> Option<&RouteValidation> {
        self.routes.get(id)
    }

    /// Route by id, or [`RequestError::UnknownRoute`].
    pub fn route(&self, id: &str) -> Result<&RouteValidation> {
        self.get(id)
            .ok_or_else(|| RequestError::UnknownRoute(id.to_string()))
    }

    /// Get registered route ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Get table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }
}

fn route_id_from_file_name(file_name: &str) -> Option<&str> {
    let id = file_name.strip_suffix(ROUTE_SUFFIX)?;
    (!id.is_empty()).then_some(id)
}

fn read_bounded(path: &Path, max_bytes: usize) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        RequestError::LoadFailed(format!("failed opening route {}: {err}", path.display()))
    })?;
    let len = file
        .metadata()
        .map_err(|err| RequestError::LoadFailed(err.to_string()))?
        .len();
    if len > max_bytes as u64 {
        return Err(RequestError::LoadFailed(format!(
            "route file too large ({len} bytes): {}",
            path.display()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            RequestError::LoadFailed(format!("failed reading route {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(RequestError::LoadFailed(format!(
            "route file too large while reading: {}",
            path.display()
        )));
    }
    Ok(content)
}
