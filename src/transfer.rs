use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Volume-rendering transfer function
// ---------------------------------------------------------------------------

/// Scalar → opacity mapping handed to the native volume mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OpacityProfile {
    /// A named sigmoid preset, e.g. `Sigmoid(5)` for `sigmoid_5`.
    Sigmoid(u8),
    /// Piecewise-linear control points over the scalar range.
    Points(Vec<f64>),
}

impl Default for OpacityProfile {
    fn default() -> Self {
        OpacityProfile::Sigmoid(5)
    }
}

/// Per-dataset volume-rendering style: color map name plus opacity profile.
/// Consumed verbatim by the backend at setup; never changed at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    pub color_map: String,
    #[serde(default)]
    pub opacity: OpacityProfile,
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self {
            color_map: "plasma".to_string(),
            opacity: OpacityProfile::default(),
        }
    }
}
