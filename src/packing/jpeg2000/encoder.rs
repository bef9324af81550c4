use openjpeg_sys as opj;

use super::{
    decoder::{Codec, codec_error},
    image::Image,
    stream::OutputStream,
};
use crate::error::GribError;

const MAX_NUM_RESOLUTIONS: u32 = 6;

pub(crate) struct EncodeParams(opj::opj_cparameters_t);

impl EncodeParams {
    /// Parameters for a single-layer code stream compressed with the
    /// reversible wavelet transform.
    pub(crate) fn lossless(width: u32, height: u32) -> Self {
        let mut params = unsafe { std::mem::zeroed::<opj::opj_cparameters_t>() };
        unsafe { opj::opj_set_default_encoder_parameters(&mut params as *mut _) };
        params.tcp_numlayers = 1;
        params.tcp_rates[0] = 0.0;
        params.cp_disto_alloc = 1;
        params.irreversible = 0;
        params.numresolution = num_resolutions(width, height) as i32;
        Self(params)
    }

    pub(crate) fn as_ptr(&mut self) -> &mut opj::opj_cparameters_t {
        &mut self.0
    }
}

// The lowest resolution level must still be at least one pixel wide.
fn num_resolutions(width: u32, height: u32) -> u32 {
    let min_dim = width.min(height).max(1);
    (min_dim.ilog2() + 1).min(MAX_NUM_RESOLUTIONS)
}

pub(crate) struct Encoder {
    codec: Codec,
}

impl Encoder {
    pub(crate) fn new() -> Result<Self, GribError> {
        let codec = Codec::j2k_compressor()?;
        Ok(Self { codec })
    }

    pub(crate) fn setup(&self, mut params: EncodeParams, img: &Image) -> Result<(), GribError> {
        if unsafe { opj::opj_setup_encoder(self.as_ptr(), params.as_ptr(), img.as_ptr()) } != 1 {
            return Err(codec_error("setup of openjpeg encoder failed"));
        }
        Ok(())
    }

    pub(crate) fn encode(&self, img: &Image, stream: &OutputStream) -> Result<(), GribError> {
        unsafe {
            if opj::opj_start_compress(self.as_ptr(), img.as_ptr(), stream.as_ptr()) != 1 {
                return Err(codec_error("start of JPEG 2000 compression failed"));
            }
            if opj::opj_encode(self.as_ptr(), stream.as_ptr()) != 1 {
                return Err(codec_error("encoding of JPEG 2000 image failed"));
            }
            if opj::opj_end_compress(self.as_ptr(), stream.as_ptr()) != 1 {
                return Err(codec_error("end of JPEG 2000 compression failed"));
            }
        }
        Ok(())
    }

    pub(crate) fn as_ptr(&self) -> *mut opj::opj_codec_t {
        self.codec.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_levels_fit_image() {
        assert_eq!(num_resolutions(100, 1), 1);
        assert_eq!(num_resolutions(4, 3), 2);
        assert_eq!(num_resolutions(16, 16), 5);
        assert_eq!(num_resolutions(1024, 512), 6);
    }
}
