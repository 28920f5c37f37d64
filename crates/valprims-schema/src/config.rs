/// Controls how schema documents are turned into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Maximum nesting of object/format levels accepted by the loader.
    pub max_depth: usize,
    /// When true, `validate` entries whose value is `false` are ignored
    /// instead of rejected.
    pub allow_disabled_rules: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_disabled_rules: false,
        }
    }
}
