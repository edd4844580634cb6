//! Reference emitter for resolved assisted-injection requests.
//!
//! Renders an [`InjectionRequest`] into the Java source of a factory
//! implementation: a `public final class <Target>_<Factory>Impl` that holds
//! one `Provider<T>` per provided key and implements the factory method by
//! delegating to the target constructor, routing assisted arguments from the
//! method parameters (matched by key) and provided arguments from the
//! captured providers.
//!
//! [`SourceDirEmitter`] writes each rendered source under a
//! generated-sources directory; [`CollectingEmitter`] keeps them in memory.

use std::path::PathBuf;

use rivet_assisted::{EmitError, FactoryEmitter, InjectionRequest, Parameter};

/// A rendered compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    pub file_name: String,
    pub text: String,
}

/// Name of the generated implementation class, e.g. `Widget_FactoryImpl`.
pub fn implementation_name(request: &InjectionRequest) -> String {
    format!("{}_{}Impl", request.target_name, request.factory_name)
}

/// Renders the factory implementation for a validated request.
pub fn generate_factory_source(request: &InjectionRequest) -> GeneratedSource {
    let class_name = implementation_name(request);
    let interface = format!("{}.{}", request.target_name, request.factory_name);
    let provided: Vec<&Parameter> = request.provided().collect();

    let mut text = String::new();
    text.push_str("// Generated by rivet. Do not edit.\n");
    text.push_str(&format!(
        "public final class {class_name} implements {interface} {{\n"
    ));

    for param in &provided {
        text.push_str(&format!(
            "    private final Provider<{}> {};\n",
            boxed(param.ty().as_str()),
            provider_field(param)
        ));
    }

    let ctor_params: Vec<String> = provided
        .iter()
        .map(|param| {
            let qualifier = param
                .qualifier()
                .map(|q| format!("{q} "))
                .unwrap_or_default();
            format!(
                "{qualifier}Provider<{}> {}",
                boxed(param.ty().as_str()),
                provider_field(param)
            )
        })
        .collect();

    text.push('\n');
    text.push_str(&format!(
        "    public {class_name}({}) {{\n",
        ctor_params.join(", ")
    ));
    for param in &provided {
        let field = provider_field(param);
        text.push_str(&format!("        this.{field} = {field};\n"));
    }
    text.push_str("    }\n\n");

    let method_params: Vec<String> = request
        .method
        .params
        .iter()
        .map(|param| format!("{} {}", param.ty(), param.name))
        .collect();

    text.push_str("    @Override\n");
    text.push_str(&format!(
        "    public {} {}({}) {{\n",
        request.method.return_type,
        request.method.name,
        method_params.join(", ")
    ));

    let args: Vec<String> = request
        .parameters
        .iter()
        .map(|param| {
            if param.assisted {
                // Guaranteed by the request's key-set invariant.
                let supplied = request
                    .method
                    .params
                    .iter()
                    .find(|p| p.key == param.key)
                    .expect("every assisted key appears in the factory method");
                supplied.name.clone()
            } else {
                format!("{}.get()", provider_field(param))
            }
        })
        .collect();

    text.push_str(&format!(
        "        return new {}({});\n",
        request.target_name,
        args.join(", ")
    ));
    text.push_str("    }\n");
    text.push_str("}\n");

    GeneratedSource {
        file_name: format!("{class_name}.java"),
        text,
    }
}

fn provider_field(param: &Parameter) -> String {
    format!("{}Provider", param.name)
}

/// `Provider<int>` is not legal Java; box primitive type names.
fn boxed(ty: &str) -> &str {
    match ty {
        "boolean" => "Boolean",
        "byte" => "Byte",
        "short" => "Short",
        "int" => "Integer",
        "long" => "Long",
        "float" => "Float",
        "double" => "Double",
        "char" => "Character",
        other => other,
    }
}

/// Emitter keeping every rendered source in memory.
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    pub sources: Vec<GeneratedSource>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FactoryEmitter for CollectingEmitter {
    fn emit(&mut self, request: &InjectionRequest) -> Result<(), EmitError> {
        self.sources.push(generate_factory_source(request));
        Ok(())
    }
}

/// Emitter writing each rendered source under `out_dir`, creating the
/// directory on first use.
#[derive(Debug)]
pub struct SourceDirEmitter {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SourceDirEmitter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in emission order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FactoryEmitter for SourceDirEmitter {
    fn emit(&mut self, request: &InjectionRequest) -> Result<(), EmitError> {
        let source = generate_factory_source(request);
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(&source.file_name);
        std::fs::write(&path, &source.text)?;
        tracing::debug!(path = %path.display(), "wrote generated factory");
        self.written.push(path);
        Ok(())
    }
}
