use crate::request::InjectionRequest;

/// Failure surfaced by a [`FactoryEmitter`]. The driver reports it as a
/// generic internal diagnostic against the candidate and keeps processing.
pub type EmitError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer of resolved requests, typically a source-code generator.
pub trait FactoryEmitter {
    fn emit(&mut self, request: &InjectionRequest) -> Result<(), EmitError>;
}

/// Emitter that discards every request; useful for validate-only rounds.
pub struct NullEmitter;

impl FactoryEmitter for NullEmitter {
    fn emit(&mut self, _request: &InjectionRequest) -> Result<(), EmitError> {
        Ok(())
    }
}
