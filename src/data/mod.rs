/// Data layer: dataset fetching and volume loading.
///
/// Architecture:
/// ```text
///   dataset id ("star_nanoparticle", ...)
///        │
///        ▼
///   ┌──────────┐
///   │  fetch    │  registry lookup → download-if-missing → local path
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  multi-page TIFF stack → Volume
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Volume   │  immutable 3D scalar field (src/volume.rs)
///   └──────────┘
/// ```

pub mod fetch;
pub mod loader;
