use candle_core::Device;

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

use super::error::EmbeddingError;

/// Picks the device the query encoder runs on.
///
/// GPU backends are only tried when compiled in (`metal` / `cuda` features). CPU is the
/// normal case for on-device query encoding, so falling back to it is only a warning
/// when a compiled GPU backend actually failed.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Query encoder using Metal");
                return Ok(device);
            }
            Err(e) => warn!(error = %e, "Metal device unavailable"),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Query encoder using CUDA");
                return Ok(device);
            }
            Err(e) => warn!(error = %e, "CUDA device unavailable"),
        }
    }

    #[cfg(any(feature = "metal", feature = "cuda"))]
    warn!("No GPU device available, query encoder falling back to CPU");

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    debug!("No GPU backend compiled, query encoder using CPU");

    Ok(Device::Cpu)
}

/// Short device name for structured log fields.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
