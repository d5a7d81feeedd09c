/// Controls schema compilation and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// When true, object schemas reject properties they do not declare.
    pub strict_mode: bool,
    /// Maximum bytes allowed per schema file loaded from a directory.
    pub max_schema_file_size: usize,
    /// Maximum number of validator messages joined into one diagnostic.
    pub max_reported_errors: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            max_schema_file_size: 256 * 1024,
            max_reported_errors: 4,
        }
    }
}
