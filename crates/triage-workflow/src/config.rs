//! Workflow engine configuration.

/// Configuration for the workflow engine.
#[derive(Debug, Clone, Default)]
pub struct WorkflowConfig {
    /// When `true`, a failed audit append fails the call. The ticket
    /// write has already been persisted and is not rolled back.
    ///
    /// The default is `false`: the audit failure is logged and the
    /// call succeeds, matching the documented best-effort audit
    /// guarantee. Callers that need a hard completeness guarantee opt
    /// in to strict mode.
    pub strict_audit: bool,
}
