use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};

use super::{PackingOptions, param::SimplePackingParam};
use crate::error::GribError;

/// Data representation template 5.40 - Grid point data - JPEG 2000 code
/// stream format.
#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct Jpeg2000PackingTemplate {
    pub simple: SimplePackingParam,
    /// Type of compression used (see Code table 5.40).
    pub compression_type: u8,
    /// Target compression ratio, M:1 (with respect to the bit-depth
    /// specified in octet 20), when octet 22 indicates lossy compression.
    /// Otherwise, set to missing.
    pub compression_ratio: u8,
}

#[cfg(feature = "jpeg2000-with-openjpeg")]
use self::{
    decoder::{DecodeParams, Decoder, codec_error},
    encoder::{EncodeParams, Encoder},
    image::Image,
    stream::{OutputStream, Stream},
};
#[cfg(feature = "jpeg2000-with-openjpeg")]
use super::simple::{NonZeroSimplePackingDecoder, ScaledField, SimplePackingDecoder};

#[cfg(feature = "jpeg2000-with-openjpeg")]
const LOSSLESS: u8 = 0;
#[cfg(feature = "jpeg2000-with-openjpeg")]
const MISSING: u8 = 0xff;

// Precision above which the reversible transform may overflow 32-bit
// intermediates in OpenJPEG.
#[cfg(feature = "jpeg2000-with-openjpeg")]
const MAX_PRECISION: u8 = 24;

#[cfg(feature = "jpeg2000-with-openjpeg")]
impl Jpeg2000PackingTemplate {
    pub(crate) fn decode(&self, num_encoded: usize, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        self.simple.is_supported()?;

        if self.simple.num_bits == 0 {
            return Ok(SimplePackingDecoder::<std::iter::Empty<i32>>::zero_length(
                &self.simple,
                num_encoded,
            )
            .collect());
        }

        let unpacked = decode_code_stream(payload)?;
        if unpacked.len() != num_encoded {
            return Err(GribError::CompressedPayloadError(format!(
                "JPEG 2000 image holds {} values while {num_encoded} are declared",
                unpacked.len()
            )));
        }
        let decoder = NonZeroSimplePackingDecoder::new(unpacked.into_iter(), &self.simple);
        Ok(SimplePackingDecoder::NonZeroLength(decoder).collect())
    }

    pub(crate) fn encode(
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        let mut field = ScaledField::quantize(values, options)?;
        if field.param.num_bits > MAX_PRECISION {
            if options.num_bits.is_some() {
                return Err(GribError::NotSupported(format!(
                    "JPEG 2000 images with {} bits per value",
                    field.param.num_bits
                )));
            }
            field = ScaledField::quantize(values, &options.clone().num_bits(MAX_PRECISION))?;
        }

        let template = Self {
            simple: field.param.clone(),
            compression_type: LOSSLESS,
            compression_ratio: MISSING,
        };
        if field.is_constant() {
            return Ok((template, Vec::new()));
        }

        let (width, height) = options.image_shape_for(field.values.len())?;
        let payload = encode_code_stream(&field.values, width, height, field.param.num_bits)?;
        Ok((template, payload))
    }
}

#[cfg(feature = "jpeg2000-with-openjpeg")]
fn decode_code_stream(payload: &[u8]) -> Result<Vec<i32>, GribError> {
    let stream = Stream::from_bytes(payload);
    let decoder = Decoder::new(stream)?;
    decoder.setup(DecodeParams::default())?;
    let image = decoder.read_header()?;
    decoder.decode(&image)?;

    if let [comp_gray] = image.components() {
        Ok(comp_gray.data().to_vec())
    } else {
        Err(codec_error(
            "JPEG 2000 images with multiple components are not supported",
        ))
    }
}

#[cfg(feature = "jpeg2000-with-openjpeg")]
fn encode_code_stream(
    values: &[u32],
    width: u32,
    height: u32,
    prec: u8,
) -> Result<Vec<u8>, GribError> {
    let mut image = Image::gray(width, height, u32::from(prec))?;
    let [comp_gray] = image.components_mut() else {
        return Err(codec_error("JPEG 2000 image has no gray component"));
    };
    let data = comp_gray.data_mut();
    if data.len() != values.len() {
        return Err(codec_error("JPEG 2000 image buffer has an unexpected size"));
    }
    for (pixel, value) in data.iter_mut().zip(values) {
        *pixel = i32::try_from(*value)
            .map_err(|_| codec_error("value exceeds the JPEG 2000 precision"))?;
    }

    let encoder = Encoder::new()?;
    encoder.setup(EncodeParams::lossless(width, height), &image)?;
    let stream = OutputStream::new();
    encoder.encode(&image, &stream)?;
    Ok(stream.into_bytes())
}

#[cfg(not(feature = "jpeg2000-with-openjpeg"))]
impl Jpeg2000PackingTemplate {
    pub(crate) fn decode(&self, _: usize, _: &[u8]) -> Result<Vec<f32>, GribError> {
        Err(codec_disabled())
    }

    pub(crate) fn encode(_: &[f32], _: &PackingOptions) -> Result<(Self, Vec<u8>), GribError> {
        Err(codec_disabled())
    }
}

#[cfg(not(feature = "jpeg2000-with-openjpeg"))]
fn codec_disabled() -> GribError {
    GribError::NotSupported(
        "JPEG 2000 codec (feature `jpeg2000-with-openjpeg` is disabled)".to_owned(),
    )
}

#[cfg(feature = "jpeg2000-with-openjpeg")]
mod decoder;
#[cfg(feature = "jpeg2000-with-openjpeg")]
mod encoder;
#[cfg(feature = "jpeg2000-with-openjpeg")]
mod image;
#[cfg(feature = "jpeg2000-with-openjpeg")]
mod stream;
