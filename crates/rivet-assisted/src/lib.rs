//! Assisted-injection validation for annotation-driven DI.
//!
//! An assisted type declares one constructor mixing *provided* parameters
//! (supplied by the DI container) with *assisted* parameters (supplied by the
//! caller), plus a nested factory interface whose single abstract method
//! takes exactly the assisted parameters. This crate checks those
//! declarations against a symbol universe and resolves each well-formed one
//! into an [`InjectionRequest`] for code generation:
//!
//! - candidate discovery through the constructor and factory markers, with
//!   duplicate-free union of both sites
//! - constructor resolution (visibility, static nesting, cardinality)
//! - factory resolution (nested interface, single abstract method;
//!   `default`/`static`/`private` methods are skipped)
//! - parameter classification into the two pools with (type, qualifier) keys
//! - per-pool duplicate detection and set-based key matching between the
//!   factory method and the assisted pool
//!
//! Diagnostics (all errors):
//! - structural: `ASSISTED_FACTORY_NOT_NESTED`, `ASSISTED_TYPE_PRIVATE`,
//!   `ASSISTED_TYPE_NOT_STATIC`, `ASSISTED_FACTORY_NOT_INTERFACE`,
//!   `ASSISTED_FACTORY_PRIVATE`
//! - cardinality: `ASSISTED_NO_CONSTRUCTOR`,
//!   `ASSISTED_AMBIGUOUS_CONSTRUCTOR`, `ASSISTED_CONSTRUCTOR_PRIVATE`,
//!   `ASSISTED_NO_FACTORY`, `ASSISTED_AMBIGUOUS_FACTORY`,
//!   `ASSISTED_NO_FACTORY_METHOD`, `ASSISTED_AMBIGUOUS_FACTORY_METHOD`
//! - parameter pools: `ASSISTED_NO_ASSISTED_PARAMS`,
//!   `ASSISTED_NO_PROVIDED_PARAMS`, `ASSISTED_DUPLICATE_KEYS`,
//!   `ASSISTED_KEY_MISMATCH`
//! - opt-in: `ASSISTED_FACTORY_RETURN_TYPE`
//! - emission failures: `ASSISTED_INTERNAL`
//!
//! Validation is pure computation over an immutable [`SymbolModel`] snapshot;
//! candidates are independent and a broken one never affects its neighbors.

mod collect;
mod config;
mod emit;
mod error;
mod key;
mod matching;
mod param;
mod request;
mod resolve;
mod sink;

pub use config::{MarkerSet, ProcessorConfig};
pub use emit::{EmitError, FactoryEmitter, NullEmitter};
pub use error::{Location, ParameterPool, ValidationError};
pub use error::{
    ASSISTED_AMBIGUOUS_CONSTRUCTOR, ASSISTED_AMBIGUOUS_FACTORY,
    ASSISTED_AMBIGUOUS_FACTORY_METHOD, ASSISTED_CONSTRUCTOR_PRIVATE, ASSISTED_DUPLICATE_KEYS,
    ASSISTED_FACTORY_NOT_INTERFACE, ASSISTED_FACTORY_NOT_NESTED, ASSISTED_FACTORY_PRIVATE,
    ASSISTED_FACTORY_RETURN_TYPE, ASSISTED_INTERNAL, ASSISTED_KEY_MISMATCH,
    ASSISTED_NO_ASSISTED_PARAMS, ASSISTED_NO_CONSTRUCTOR, ASSISTED_NO_FACTORY,
    ASSISTED_NO_FACTORY_METHOD, ASSISTED_NO_PROVIDED_PARAMS, ASSISTED_TYPE_NOT_STATIC,
    ASSISTED_TYPE_PRIVATE,
};
pub use key::{Key, QualifierRef};
pub use param::{classify, Parameter};
pub use request::{FactoryMethod, InjectionRequest};
pub use sink::{CollectedDiagnostics, DiagnosticSink};

pub use rivet_types::{Diagnostic, FileDiagnostic, Severity, Span, TypeId};

use rivet_model::{SymbolModel, TypeRef};

use crate::collect::collect_candidates;
use crate::matching::match_keys;
use crate::resolve::{resolve_constructor, resolve_factory};

/// Runs the validation pipeline over one symbol universe snapshot.
///
/// The model and configuration are fixed at construction; the emitter and
/// diagnostic sink are per-round collaborators.
pub struct Processor<'a> {
    model: &'a dyn SymbolModel,
    config: ProcessorConfig,
}

impl<'a> Processor<'a> {
    pub fn new(model: &'a dyn SymbolModel) -> Self {
        Self::with_config(model, ProcessorConfig::default())
    }

    pub fn with_config(model: &'a dyn SymbolModel, config: ProcessorConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Runs one processing round: collect candidates, validate each in
    /// isolation, hand successful requests to `emitter`, report every failure
    /// to `sink`.
    ///
    /// The round always completes for all candidates. The return value
    /// answers whether this processor claims exclusive ownership of the
    /// marker annotations; it is always `false` so co-processors may observe
    /// the same markers.
    pub fn process_round(
        &self,
        emitter: &mut dyn FactoryEmitter,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        let (candidates, site_errors) = collect_candidates(self.model, &self.config.markers);
        tracing::debug!(
            candidates = candidates.len(),
            site_errors = site_errors.len(),
            "collected assisted injection candidates"
        );

        for error in &site_errors {
            sink.report(error.to_diagnostic());
        }

        for candidate in candidates {
            match self.validate(candidate) {
                Ok(request) => {
                    if let Err(error) = emitter.emit(&request) {
                        tracing::warn!(
                            target_type = %request.target_name,
                            error = %error,
                            "factory emission failed"
                        );
                        let data = self.model.type_data(candidate);
                        let location = Location::of_type(data);
                        sink.report(FileDiagnostic::new(
                            location.file,
                            Diagnostic::error(
                                ASSISTED_INTERNAL,
                                format!(
                                    "internal error while generating the assisted factory for `{}`",
                                    data.name
                                ),
                                location.span,
                            ),
                        ));
                    }
                }
                Err(error) => {
                    tracing::debug!(code = error.code(), "candidate rejected");
                    sink.report(error.to_diagnostic());
                }
            }
        }

        false
    }

    /// Validates a single candidate, resolving it into an
    /// [`InjectionRequest`] or the first rule violation encountered.
    pub fn validate(&self, candidate: TypeId) -> Result<InjectionRequest, ValidationError> {
        let markers = &self.config.markers;
        let data = self.model.type_data(candidate);

        let ctor = resolve_constructor(self.model, candidate, markers)?;
        let (factory_id, method) = resolve_factory(self.model, candidate, markers)?;
        let factory = self.model.type_data(factory_id);

        let parameters: Vec<Parameter> = ctor
            .params
            .iter()
            .map(|p| classify(p, &markers.assisted))
            .collect();
        let method_params: Vec<Parameter> = method
            .params
            .iter()
            .map(|p| classify(p, &markers.assisted))
            .collect();

        match_keys(
            &data.name,
            markers,
            &parameters,
            &method.name,
            &method_params,
            Location::of_member(data, ctor.span),
            Location::of_member(factory, method.span),
        )?;

        if self.config.check_factory_return_type {
            let expected = TypeRef::new(&data.name);
            if method.return_type != expected {
                return Err(ValidationError::FactoryReturnType {
                    method: method.name.clone(),
                    expected,
                    found: method.return_type.clone(),
                    location: Location::of_member(factory, method.span),
                });
            }
        }

        Ok(InjectionRequest::new(
            candidate,
            data.name.clone(),
            factory_id,
            factory.name.clone(),
            FactoryMethod {
                name: method.name.clone(),
                params: method_params,
                return_type: method.return_type.clone(),
                span: method.span,
            },
            parameters,
        ))
    }
}
