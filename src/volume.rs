use crate::error::{Result, TomoError};

// ---------------------------------------------------------------------------
// Volume – an immutable 3D scalar field
// ---------------------------------------------------------------------------

/// A 3D scalar field loaded once at startup.
///
/// Axis-ordering contract: voxels are stored x-fastest, so
/// `index = x + nx * (y + ny * z)` with `dims = [nx, ny, nz]`. Read as a
/// C-order array, the flat buffer has shape `(nz, ny, nx)`, the full-reversal
/// convention. Collaborators that hand back a buffer in any other ordering
/// fail the shape check in [`VolumeBuffers::store`].
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    dims: [usize; 3],
    data: Vec<f32>,
}

impl Volume {
    /// Build a volume, rejecting data that does not fill `dims`.
    pub fn new(dims: [usize; 3], data: Vec<f32>) -> Result<Self> {
        let expected = dims[0] * dims[1] * dims[2];
        if data.len() != expected {
            return Err(TomoError::LengthMismatch {
                dims,
                len: data.len(),
            });
        }
        Ok(Self { dims, data })
    }

    /// `[nx, ny, nz]`, x varying fastest in the flat buffer.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear index of voxel `(x, y, z)`.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.dims[0] && y < self.dims[1] && z < self.dims[2]);
        x + self.dims[0] * (y + self.dims[1] * z)
    }

    pub fn value_at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.index(x, y, z)]
    }

    /// `(min, max)` over all voxels; `(0, 0)` for an empty volume.
    pub fn scalar_range(&self) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
        }
        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }
}

// ---------------------------------------------------------------------------
// VolumeBuffers – original + working copy
// ---------------------------------------------------------------------------

/// The untouched original volume plus the mutable working copy that backs the
/// rendered pipeline input.
///
/// Smoothing always recomputes from `original` and commits into `working`, so
/// repeated updates are idempotent with respect to the original data rather
/// than cumulative. A filtered result whose shape disagrees with the original
/// is rejected and leaves `working` untouched.
#[derive(Debug, Clone)]
pub struct VolumeBuffers {
    original: Volume,
    working: Volume,
}

impl VolumeBuffers {
    pub fn new(original: Volume) -> Self {
        let working = original.clone();
        Self { original, working }
    }

    pub fn original(&self) -> &Volume {
        &self.original
    }

    pub fn working(&self) -> &Volume {
        &self.working
    }

    /// Commit a filtered recomputation into the working buffer in place.
    ///
    /// Returns the working scalars on success. On shape mismatch the working
    /// buffer is left exactly as it was, so the previously rendered frame
    /// stays intact.
    pub fn store(&mut self, filtered: &Volume) -> Result<&[f32]> {
        if filtered.dims() != self.original.dims() {
            return Err(TomoError::ShapeMismatch {
                expected: self.original.dims(),
                actual: filtered.dims(),
            });
        }
        self.working.data.copy_from_slice(filtered.data());
        Ok(self.working.data())
    }
}
