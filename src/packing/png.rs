use grib2_template_derive::{Dump, OctetSize, TryFromSlice, WriteToSlice};
#[cfg(feature = "png-with-png-crate")]
use log::warn;

use super::{PackingOptions, param::SimplePackingParam};
#[cfg(feature = "png-with-png-crate")]
use super::{
    simple::{NonZeroSimplePackingDecoder, ScaledField, SimplePackingDecoder},
    stream::{NBitwiseIterator, NBitwiseWriter},
};
use crate::error::GribError;

/// Data representation template 5.41 - Grid point data - Portable Network
/// Graphics (PNG) format.
#[derive(Debug, Clone, Default, PartialEq, TryFromSlice, WriteToSlice, OctetSize, Dump)]
pub struct PngPackingTemplate {
    pub simple: SimplePackingParam,
}

#[cfg(feature = "png-with-png-crate")]
impl PngPackingTemplate {
    pub(crate) fn decode(&self, num_encoded: usize, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        self.simple.is_supported()?;

        if self.simple.num_bits == 0 {
            return Ok(SimplePackingDecoder::<std::iter::Empty<u32>>::zero_length(
                &self.simple,
                num_encoded,
            )
            .collect());
        }

        let (buf, sample_bits) = read_image_buffer(payload)
            .map_err(|e| GribError::CompressedPayloadError(format!("PNG decode error: {e}")))?;
        if sample_bits != image_depth_for(self.simple.num_bits) {
            warn!(
                "PNG samples are {sample_bits} bits wide while {} bits are packed",
                self.simple.num_bits
            );
        }
        if sample_bits == 0 || sample_bits > 32 {
            return Err(GribError::NotSupported(format!(
                "PNG images with {sample_bits} bits per pixel"
            )));
        }

        let iter = NBitwiseIterator::new(buf, sample_bits).take(num_encoded);
        let values = SimplePackingDecoder::NonZeroLength(NonZeroSimplePackingDecoder::new(
            iter,
            &self.simple,
        ))
        .collect::<Vec<_>>();
        if values.len() != num_encoded {
            return Err(GribError::CompressedPayloadError(format!(
                "PNG image holds {} values while {num_encoded} are declared",
                values.len()
            )));
        }
        Ok(values)
    }

    pub(crate) fn encode(
        values: &[f32],
        options: &PackingOptions,
    ) -> Result<(Self, Vec<u8>), GribError> {
        let field = ScaledField::quantize(values, options)?;
        if field.is_constant() {
            return Ok((Self { simple: field.param }, Vec::new()));
        }

        let (width, height) = options.image_shape_for(field.values.len())?;
        let depth = image_depth_for(field.param.num_bits);
        let mut writer = NBitwiseWriter::new();
        writer.write_all(field.values.iter().copied(), depth);
        let payload = write_image_buffer(&writer.into_bytes(), width, height, depth)
            .map_err(|e| GribError::CompressedPayloadError(format!("PNG encode error: {e}")))?;
        Ok((Self { simple: field.param }, payload))
    }
}

#[cfg(not(feature = "png-with-png-crate"))]
impl PngPackingTemplate {
    pub(crate) fn decode(&self, _: usize, _: &[u8]) -> Result<Vec<f32>, GribError> {
        Err(codec_disabled())
    }

    pub(crate) fn encode(_: &[f32], _: &PackingOptions) -> Result<(Self, Vec<u8>), GribError> {
        Err(codec_disabled())
    }
}

#[cfg(not(feature = "png-with-png-crate"))]
fn codec_disabled() -> GribError {
    GribError::NotSupported("PNG codec (feature `png-with-png-crate` is disabled)".to_owned())
}

// Samples are whole octets: gray 8 or 16 bits, RGB 24 bits or RGBA 32 bits.
#[cfg(feature = "png-with-png-crate")]
fn image_depth_for(num_bits: u8) -> usize {
    match num_bits {
        0..=8 => 8,
        9..=16 => 16,
        17..=24 => 24,
        _ => 32,
    }
}

#[cfg(feature = "png-with-png-crate")]
fn read_image_buffer(buf: &[u8]) -> Result<(Vec<u8>, usize), String> {
    let reader = std::io::Cursor::new(buf);
    let decoder = png::Decoder::new(reader);
    let mut reader = decoder.read_info().map_err(|e| e.to_string())?;
    let buf_size = reader
        .output_buffer_size()
        .ok_or("Getting output buffer size failed")?;
    let mut out_buf = vec![0; buf_size];
    let info = reader.next_frame(&mut out_buf).map_err(|e| e.to_string())?;
    out_buf.truncate(info.buffer_size());
    let sample_bits = info.color_type.samples() * info.bit_depth as usize;
    Ok((out_buf, sample_bits))
}

#[cfg(feature = "png-with-png-crate")]
fn write_image_buffer(
    data: &[u8],
    width: u32,
    height: u32,
    depth: usize,
) -> Result<Vec<u8>, String> {
    let (color_type, bit_depth) = match depth {
        8 => (png::ColorType::Grayscale, png::BitDepth::Eight),
        16 => (png::ColorType::Grayscale, png::BitDepth::Sixteen),
        24 => (png::ColorType::Rgb, png::BitDepth::Eight),
        _ => (png::ColorType::Rgba, png::BitDepth::Eight),
    };

    let mut out_buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut out_buf, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);
    let mut writer = encoder.write_header().map_err(|e| e.to_string())?;
    writer.write_image_data(data).map_err(|e| e.to_string())?;
    writer.finish().map_err(|e| e.to_string())?;
    Ok(out_buf)
}
