use crate::foundation::error::{QrError, QrResult};
use crate::style::spec::EccLevel;

/// Finished dark/light bitmap for one `(content, size, margin, ecc)` tuple.
///
/// Holds both the module grid (quiet zone included) and the `size x size` pixel mask scaled
/// from it with nearest-module sampling.
#[derive(Clone, PartialEq, Eq)]
pub struct BaseMatrix {
    size: u32,
    margin: u32,
    modules_per_side: u32,
    modules: Vec<bool>,
    mask: Vec<u8>,
}

impl std::fmt::Debug for BaseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseMatrix")
            .field("size", &self.size)
            .field("margin", &self.margin)
            .field("modules_per_side", &self.modules_per_side)
            .finish()
    }
}

impl BaseMatrix {
    /// Build from a square symbol grid (`symbol_side^2`, row-major, `true` = dark), adding a
    /// `margin`-module quiet zone and scaling to `size` pixels.
    pub fn from_symbol(
        symbol: &[bool],
        symbol_side: u32,
        size: u32,
        margin: u32,
    ) -> QrResult<Self> {
        if symbol_side == 0 || symbol.len() != (symbol_side as usize).pow(2) {
            return Err(QrError::encoding("symbol grid has inconsistent dimensions"));
        }
        let n = symbol_side.saturating_add(margin.saturating_mul(2));
        if n > size {
            return Err(QrError::encoding(format!(
                "content needs {n} modules per side; {size}px cannot fit one pixel per module"
            )));
        }

        let side = n as usize;
        let mut modules = vec![false; side * side];
        for y in 0..symbol_side as usize {
            for x in 0..symbol_side as usize {
                let mx = x + margin as usize;
                let my = y + margin as usize;
                modules[my * side + mx] = symbol[y * symbol_side as usize + x];
            }
        }

        let px = size as usize;
        let mut mask = vec![0u8; px * px];
        let module_of = |p: usize| -> usize { (p as u64 * n as u64 / size as u64) as usize };
        for y in 0..px {
            let my = module_of(y);
            let row = &modules[my * side..(my + 1) * side];
            for x in 0..px {
                if row[module_of(x)] {
                    mask[y * px + x] = 255;
                }
            }
        }

        Ok(Self {
            size,
            margin,
            modules_per_side: n,
            modules,
            mask,
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Modules per side, quiet zone included.
    pub fn modules_per_side(&self) -> u32 {
        self.modules_per_side
    }

    /// Module state; coordinates outside the grid are light.
    pub fn module(&self, mx: u32, my: u32) -> bool {
        if mx >= self.modules_per_side || my >= self.modules_per_side {
            return false;
        }
        self.modules[(my as usize) * (self.modules_per_side as usize) + mx as usize]
    }

    /// Pixel state; coordinates outside the bitmap are light.
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.mask[(y as usize) * (self.size as usize) + x as usize] != 0
    }

    /// Coverage mask, one byte per pixel (`255` dark, `0` light).
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    pub fn dark_pixel_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v != 0).count()
    }
}

/// Contract for the external QR encoder.
pub trait MatrixEncoder: Send {
    /// Encode `content` into a `size x size` dark/light bitmap.
    ///
    /// Must fail with [`QrError::Encoding`] when the content does not fit the requested capacity.
    fn encode_matrix(
        &self,
        content: &str,
        size: u32,
        margin: u32,
        ecc: EccLevel,
    ) -> QrResult<BaseMatrix>;
}

/// Default encoder adapter backed by the `qrcodegen` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct QrcodegenEncoder;

impl QrcodegenEncoder {
    pub fn new() -> Self {
        Self
    }
}

fn ecc_to_qrcodegen(ecc: EccLevel) -> qrcodegen::QrCodeEcc {
    match ecc {
        EccLevel::Low => qrcodegen::QrCodeEcc::Low,
        EccLevel::Medium => qrcodegen::QrCodeEcc::Medium,
        EccLevel::Quartile => qrcodegen::QrCodeEcc::Quartile,
        EccLevel::High => qrcodegen::QrCodeEcc::High,
    }
}

impl MatrixEncoder for QrcodegenEncoder {
    fn encode_matrix(
        &self,
        content: &str,
        size: u32,
        margin: u32,
        ecc: EccLevel,
    ) -> QrResult<BaseMatrix> {
        if content.is_empty() {
            return Err(QrError::encoding("content must be non-empty"));
        }
        let qr = qrcodegen::QrCode::encode_text(content, ecc_to_qrcodegen(ecc)).map_err(|e| {
            QrError::encoding(format!(
                "content ({} bytes) does not fit error-correction level {ecc:?}: {e}",
                content.len()
            ))
        })?;

        let side = qr.size();
        let mut symbol = Vec::with_capacity((side as usize).pow(2));
        for y in 0..side {
            for x in 0..side {
                symbol.push(qr.get_module(x, y));
            }
        }
        BaseMatrix::from_symbol(&symbol, side as u32, size, margin)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/encoder.rs"]
mod tests;
