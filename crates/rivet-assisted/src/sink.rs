use rivet_types::FileDiagnostic;

/// Where the pipeline reports rule violations.
///
/// The driver serializes writes; implementations need no internal locking.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: FileDiagnostic);
}

/// In-memory sink for tests and batch-style hosts.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    pub diagnostics: Vec<FileDiagnostic>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for CollectedDiagnostics {
    fn report(&mut self, diagnostic: FileDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
