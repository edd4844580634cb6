use serde::{Deserialize, Serialize};

/// The annotation names the pipeline reacts to.
///
/// Hosts with a different annotation vocabulary (fully-qualified names are
/// fine, matching is simple-name aware) substitute their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    /// Marks the one constructor mixing assisted and provided parameters.
    pub constructor: String,
    /// Marks the nested factory interface.
    pub factory: String,
    /// Marks caller-supplied constructor parameters.
    pub assisted: String,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            constructor: "AssistedInject".to_string(),
            factory: "AssistedFactory".to_string(),
            assisted: "Assisted".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub markers: MarkerSet,
    /// When set, the factory method's declared return type must name the
    /// target type exactly. Off by default; downstream emission assumes
    /// compatibility either way.
    pub check_factory_return_type: bool,
}
