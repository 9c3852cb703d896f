use crate::backend::{RenderBackend, SmoothingFilter};
use crate::error::Result;
use crate::params::ControlParameter;
use crate::volume::{Volume, VolumeBuffers};

// ---------------------------------------------------------------------------
// The parameter → pipeline update contract
// ---------------------------------------------------------------------------

/// Which pipeline property the bound parameter drives.
pub enum PipelineKind {
    /// Isosurface threshold: the parameter is the extraction isovalue.
    Threshold,
    /// Gaussian smoothing: the parameter is the filter sigma. The filter is
    /// always applied to the original buffer, never to the working copy.
    Smoothing {
        buffers: VolumeBuffers,
        filter: Box<dyn SmoothingFilter>,
    },
}

/// What a submitted parameter change resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The pipeline was mutated and one redraw was requested.
    Applied,
    /// The (clamped) value equals the current one; nothing was touched.
    NoChange,
    /// An update was already in flight; the value was stashed, last-value-wins.
    Coalesced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateState {
    Idle,
    Updating,
}

/// Binds one [`ControlParameter`] to one property of a rendering pipeline.
///
/// Exclusive owner of the pipeline handle and (for smoothing) the volume
/// buffers; all mutation flows through [`ParameterPipeline::submit`]. Each
/// distinct parameter value produces exactly one redraw request, a repeated
/// value produces none, and a change arriving while an update is in flight is
/// coalesced to the latest value.
pub struct ParameterPipeline<B: RenderBackend> {
    param: ControlParameter,
    kind: PipelineKind,
    backend: B,
    state: UpdateState,
    pending: Option<f64>,
}

impl<B: RenderBackend> ParameterPipeline<B> {
    /// Set up a threshold (isosurface) pipeline and render the initial frame:
    /// the backend's isovalue equals the parameter default after startup.
    pub fn threshold(param: ControlParameter, mut backend: B) -> Result<Self> {
        backend.set_threshold(param.value())?;
        backend.request_redraw();
        Ok(Self {
            param,
            kind: PipelineKind::Threshold,
            backend,
            state: UpdateState::Idle,
            pending: None,
        })
    }

    /// Set up a smoothing (volume) pipeline and render the initial frame.
    /// The first frame shows the unfiltered volume; the demos start at sigma 0.
    pub fn smoothing(
        param: ControlParameter,
        mut backend: B,
        volume: Volume,
        filter: Box<dyn SmoothingFilter>,
    ) -> Result<Self> {
        let buffers = VolumeBuffers::new(volume);
        backend.upload_scalars(buffers.working().data())?;
        backend.request_redraw();
        Ok(Self {
            param,
            kind: PipelineKind::Smoothing { buffers, filter },
            backend,
            state: UpdateState::Idle,
            pending: None,
        })
    }

    pub fn param(&self) -> &ControlParameter {
        &self.param
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Working-copy scalars for a smoothing pipeline, `None` for threshold.
    pub fn working_scalars(&self) -> Option<&[f32]> {
        match &self.kind {
            PipelineKind::Smoothing { buffers, .. } => Some(buffers.working().data()),
            PipelineKind::Threshold => None,
        }
    }

    /// Handle a parameter-change event.
    ///
    /// The value is clamped to the parameter bounds. A rejected update (e.g. a
    /// shape-mismatched filter result) leaves the parameter, the working buffer
    /// and the displayed frame at their previous state, and the error is
    /// returned to the dispatcher.
    pub fn submit(&mut self, raw: f64) -> Result<UpdateOutcome> {
        if self.state == UpdateState::Updating {
            // Last-value-wins: overwrite whatever was stashed before.
            self.pending = Some(raw);
            return Ok(UpdateOutcome::Coalesced);
        }

        let mut outcome = self.apply(raw)?;
        while let Some(next) = self.pending.take() {
            outcome = self.apply(next)?;
        }
        Ok(outcome)
    }

    fn apply(&mut self, raw: f64) -> Result<UpdateOutcome> {
        let value = self.param.clamp(raw);
        if value == self.param.value() {
            log::debug!("'{}': {raw} is a no-op, skipping redraw", self.param.name());
            return Ok(UpdateOutcome::NoChange);
        }

        self.state = UpdateState::Updating;
        let result = self.run_update(value);
        self.state = UpdateState::Idle;
        result?;

        // Committed only after the backend work succeeded, so a failed update
        // can be retried with the same value.
        self.param.commit(value);
        Ok(UpdateOutcome::Applied)
    }

    /// Exactly one redraw request per invocation.
    fn run_update(&mut self, value: f64) -> Result<()> {
        match &mut self.kind {
            PipelineKind::Threshold => {
                // Full re-extraction inside the native library; no incremental path.
                self.backend.set_threshold(value)?;
                self.backend.mark_dirty();
                self.backend.request_redraw();
            }
            PipelineKind::Smoothing { buffers, filter } => {
                let filtered = filter.apply(buffers.original(), value)?;
                let scalars = buffers.store(&filtered)?;
                self.backend.upload_scalars(scalars)?;
                self.backend.mark_dirty();
                self.backend.request_redraw();
            }
        }
        Ok(())
    }
}
