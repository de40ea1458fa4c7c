/// Server-assigned generation identifiers are opaque strings.
pub type GenerationId = String;

/// Model identifiers as reported by the model catalog.
pub type ModelId = String;

/// Workspace (project/tenant folder) identifiers.
pub type WorkspaceId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
