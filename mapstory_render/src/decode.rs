// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG decoding into backend images.

use mapstory_imaging::{ImageAlphaType, ImageDesc, ImageFormat, ImageId, ImagingBackend};
use png::{BitDepth, ColorType, Transformations};

use crate::DecodeError;

/// A decoded image resident in a backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitmapHandle {
    /// Backend image.
    pub image: ImageId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Decoded RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, unpremultiplied.
    pub pixels: Vec<u8>,
}

/// Decodes PNG bytes into RGBA8.
///
/// Palette, grayscale and 16-bit images are expanded to 8-bit RGBA.
pub fn decode_png(data: &[u8]) -> Result<DecodedImage, DecodeError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(
        Transformations::EXPAND | Transformations::ALPHA | Transformations::STRIP_16,
    );
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0_u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let pixels = match (info.color_type, info.bit_depth) {
        (ColorType::Rgba, BitDepth::Eight) => buf,
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => buf
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (color_type, bit_depth) => {
            return Err(DecodeError::UnsupportedLayout {
                color_type,
                bit_depth,
            });
        }
    };

    Ok(DecodedImage {
        width: info.width,
        height: info.height,
        pixels,
    })
}

/// Decodes PNG bytes and uploads them as a backend image.
pub fn decode_into(
    backend: &mut dyn ImagingBackend,
    data: &[u8],
) -> Result<BitmapHandle, DecodeError> {
    let decoded = decode_png(data)?;
    let image = backend.create_image(
        ImageDesc {
            width: decoded.width,
            height: decoded.height,
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
        },
        &decoded.pixels,
    );
    Ok(BitmapHandle {
        image,
        width: decoded.width,
        height: decoded.height,
    })
}

#[cfg(test)]
pub(crate) mod test_png {
    use png::{BitDepth, ColorType};

    /// Encodes a solid-color image.
    pub(crate) fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        encode(width, height, ColorType::Rgba, &rgba.repeat((width * height) as usize))
    }

    pub(crate) fn encode(width: u32, height: u32, color: ColorType, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, width, height);
            encoder.set_color(color);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header().expect("png header");
            writer.write_image_data(pixels).expect("png data");
        }
        bytes
    }
}
