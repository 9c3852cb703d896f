use crate::error::{Result, TomoError};

// ---------------------------------------------------------------------------
// Control parameter – one slider's worth of state
// ---------------------------------------------------------------------------

/// A named scalar control parameter with slider-style bounds.
///
/// Invariant: `min <= value <= max` at all times. Incoming values are clamped
/// to the bounds, mirroring what the slider widget enforces on the UI side, so
/// an out-of-range value can never reach the pipeline.
#[derive(Debug, Clone)]
pub struct ControlParameter {
    name: String,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl ControlParameter {
    /// Create a parameter. The default value is clamped into `[min, max]`.
    pub fn new(name: impl Into<String>, default: f64, min: f64, max: f64, step: f64) -> Result<Self> {
        let name = name.into();
        if !(min <= max) {
            return Err(TomoError::InvalidParameter(format!(
                "'{name}': min {min} exceeds max {max}"
            )));
        }
        if !(step > 0.0) {
            return Err(TomoError::InvalidParameter(format!(
                "'{name}': step {step} must be positive"
            )));
        }
        if default.is_nan() {
            return Err(TomoError::InvalidParameter(format!(
                "'{name}': default value is NaN"
            )));
        }
        Ok(Self {
            name,
            value: default.clamp(min, max),
            min,
            max,
            step,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Slider step hint for the UI layer; not used for quantization here.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Constrain a raw incoming value to the parameter's bounds.
    ///
    /// NaN would slip through `f64::clamp`, so it collapses to the current
    /// value instead: a NaN change event is a no-op, nothing reaches the
    /// pipeline. Infinities clamp to the nearest bound as usual.
    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.value;
        }
        v.clamp(self.min, self.max)
    }

    /// Clamp and store a new value. Returns `true` iff the stored value changed.
    pub fn set(&mut self, v: f64) -> bool {
        let clamped = self.clamp(v);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        true
    }

    /// Store an already-clamped value. Callers must have gone through
    /// [`ControlParameter::clamp`] first.
    pub(crate) fn commit(&mut self, clamped: f64) {
        debug_assert!(self.min <= clamped && clamped <= self.max);
        self.value = clamped;
    }
}
