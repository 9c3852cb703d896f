use crate::error::Result;
use crate::volume::Volume;

// ---------------------------------------------------------------------------
// Seams to the native visualization library
// ---------------------------------------------------------------------------

/// The operations the reactive core consumes from the rendering backend.
///
/// A real implementation wraps a native visualization library: `set_threshold`
/// re-runs the isosurface extraction and rebinds the surface as the display
/// mesh's input, `upload_scalars` overwrites the buffer backing the volume
/// mapper's input, `mark_dirty` invalidates the cached pipeline output, and
/// `request_redraw` schedules exactly one new frame.
pub trait RenderBackend {
    fn set_threshold(&mut self, value: f64) -> Result<()>;
    fn upload_scalars(&mut self, scalars: &[f32]) -> Result<()>;
    fn mark_dirty(&mut self);
    fn request_redraw(&mut self);
}

/// The external smoothing collaborator (a native Gaussian filter).
///
/// Implementations receive the untouched original volume every time; they must
/// not be handed an already-filtered buffer. The returned volume is shape-checked
/// against the original before it reaches the rendered buffer.
pub trait SmoothingFilter {
    fn apply(&self, src: &Volume, sigma: f64) -> Result<Volume>;
}

// ---------------------------------------------------------------------------
// Tracing implementations for headless runs
// ---------------------------------------------------------------------------

/// A backend that logs and counts operations instead of rendering.
///
/// Used by the demo binaries when no native library is linked, and by tests to
/// observe the pipeline's side effects.
#[derive(Debug)]
pub struct TraceBackend {
    label: String,
    threshold: Option<f64>,
    uploads: u64,
    dirty_marks: u64,
    redraws: u64,
}

impl TraceBackend {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            threshold: None,
            uploads: 0,
            dirty_marks: 0,
            redraws: 0,
        }
    }

    /// The last threshold pushed into the backend, if any.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    pub fn dirty_marks(&self) -> u64 {
        self.dirty_marks
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl RenderBackend for TraceBackend {
    fn set_threshold(&mut self, value: f64) -> Result<()> {
        self.threshold = Some(value);
        log::debug!("[{}] isovalue set to {value}", self.label);
        Ok(())
    }

    fn upload_scalars(&mut self, scalars: &[f32]) -> Result<()> {
        self.uploads += 1;
        log::debug!(
            "[{}] uploaded {} scalars (upload #{})",
            self.label,
            scalars.len(),
            self.uploads
        );
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.dirty_marks += 1;
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
        log::info!("[{}] redraw #{} requested", self.label, self.redraws);
    }
}

/// Stand-in for the native Gaussian filter in headless demo runs: passes the
/// original data through unchanged and logs the sigma it was asked for.
#[derive(Debug, Default)]
pub struct TraceFilter;

impl SmoothingFilter for TraceFilter {
    fn apply(&self, src: &Volume, sigma: f64) -> Result<Volume> {
        log::debug!(
            "trace filter: sigma {sigma} over {:?} (native filter not linked)",
            src.dims()
        );
        Ok(src.clone())
    }
}
