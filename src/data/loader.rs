use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;

use crate::error::{Result, TomoError};
use crate::volume::Volume;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a volumetric scan from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.tif` / `.tiff` – multi-page grayscale stack, one page per z-slice
pub fn load_volume(path: &Path) -> Result<Volume> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "tif" | "tiff" => load_tiff(path),
        other => Err(TomoError::UnsupportedFormat(format!(
            "file extension '.{other}'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// TIFF stack loader
// ---------------------------------------------------------------------------

/// Decode every page of a grayscale TIFF into one volume.
///
/// Page `k` becomes z-slice `k`; each page is row-major, so the assembled
/// buffer follows the crate's x-fastest ordering with
/// `dims = [width, height, n_pages]`. Sample values are widened to `f32`
/// without rescaling.
fn load_tiff(path: &Path) -> Result<Volume> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let mut data: Vec<f32> = Vec::new();
    let mut page_dims: Option<(u32, u32)> = None;
    let mut pages = 0usize;

    loop {
        let dims = decoder.dimensions()?;
        match page_dims {
            None => page_dims = Some(dims),
            Some(expected) if expected != dims => {
                return Err(TomoError::InconsistentSlice {
                    page: pages,
                    expected,
                    actual: dims,
                });
            }
            Some(_) => {}
        }

        let color = decoder.colortype()?;
        if !matches!(color, ColorType::Gray(_)) {
            return Err(TomoError::UnsupportedFormat(format!(
                "color type {color:?} (expected grayscale)"
            )));
        }

        append_page(decoder.read_image()?, &mut data)?;
        pages += 1;

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    let (width, height) = page_dims.ok_or(TomoError::EmptyVolume)?;
    let volume = Volume::new([width as usize, height as usize, pages], data)?;
    log::info!(
        "loaded volume {:?} from {} ({} voxels)",
        volume.dims(),
        path.display(),
        volume.len()
    );
    Ok(volume)
}

fn append_page(page: DecodingResult, out: &mut Vec<f32>) -> Result<()> {
    match page {
        DecodingResult::U8(v) => out.extend(v.into_iter().map(f32::from)),
        DecodingResult::U16(v) => out.extend(v.into_iter().map(f32::from)),
        DecodingResult::F32(v) => out.extend(v),
        DecodingResult::F64(v) => out.extend(v.into_iter().map(|x| x as f32)),
        _ => {
            return Err(TomoError::UnsupportedFormat(
                "TIFF sample format (expected u8, u16, f32 or f64)".to_string(),
            ));
        }
    }
    Ok(())
}
