use crate::error::SurfaceError;

/// Encodings the surface can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// PDF color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Decoded image, ready to become an Image XObject.
#[derive(Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    /// Raw 8-bit samples (PNG) or the untouched JPEG file.
    pub data: Vec<u8>,
    /// Separate alpha channel, one byte per pixel.
    pub smask_data: Option<Vec<u8>>,
}

fn unsupported(msg: impl Into<String>) -> SurfaceError {
    SurfaceError::UnsupportedImage(msg.into())
}

/// Detect image format from magic bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat, SurfaceError> {
    match data {
        [0xFF, 0xD8, ..] => Ok(ImageFormat::Jpeg),
        [0x89, b'P', b'N', b'G', ..] => Ok(ImageFormat::Png),
        _ => Err(unsupported("expected JPEG or PNG data")),
    }
}

/// Parse raw image bytes.
pub fn load_image(data: &[u8]) -> Result<ImageData, SurfaceError> {
    match detect_format(data)? {
        ImageFormat::Jpeg => parse_jpeg(data),
        ImageFormat::Png => parse_png(data),
    }
}

/// JPEG data is embedded as-is (DCTDecode); only the frame header is read.
fn parse_jpeg(data: &[u8]) -> Result<ImageData, SurfaceError> {
    let (width, height, components) = jpeg_dimensions(data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => return Err(unsupported(format!("JPEG with {} components", n))),
    };
    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data: data.to_vec(),
        smask_data: None,
    })
}

/// Scan for an SOF0..SOF3 marker and read width, height and component count.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, u8), SurfaceError> {
    let mut i = 0;
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        if (0xC0..=0xC3).contains(&marker) {
            if i + 9 >= data.len() {
                return Err(unsupported("truncated JPEG frame header"));
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        match marker {
            0xFF | 0x00 => i += 1,
            0xD0..=0xD9 => i += 2,
            _ => {
                if i + 3 >= data.len() {
                    break;
                }
                let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                i += 2 + seg_len;
            }
        }
    }
    Err(unsupported("no frame header in JPEG data"))
}

/// Split interleaved color+alpha samples into two planes.
fn split_alpha(buf: &[u8], channels: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels = buf.len() / channels;
    let mut color = Vec::with_capacity(pixels * (channels - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for px in buf.chunks_exact(channels) {
        color.extend_from_slice(&px[..channels - 1]);
        alpha.push(px[channels - 1]);
    }
    (color, alpha)
}

fn parse_png(data: &[u8]) -> Result<ImageData, SurfaceError> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| unsupported(format!("PNG decode error: {}", e)))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| unsupported(format!("PNG frame error: {}", e)))?;
    buf.truncate(info.buffer_size());

    let (color_space, data, smask_data) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, buf, None),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, buf, None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split_alpha(&buf, 4);
            (ColorSpace::DeviceRGB, rgb, Some(alpha))
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split_alpha(&buf, 2);
            (ColorSpace::DeviceGray, gray, Some(alpha))
        }
        other => return Err(unsupported(format!("PNG color type {:?}", other))),
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        data,
        smask_data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_magic() {
        assert!(matches!(
            detect_format(&[0, 1, 2, 3]),
            Err(SurfaceError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn reads_jpeg_frame_header() {
        // SOI, then SOF0: length 17, precision 8, height 16, width 32, 3 components.
        let jpeg = [
            0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x10, 0x00, 0x20, 0x03,
        ];
        let img = load_image(&jpeg).unwrap();
        assert_eq!((img.width, img.height), (32, 16));
        assert_eq!(img.color_space, ColorSpace::DeviceRGB);
        assert_eq!(img.format, ImageFormat::Jpeg);
    }

    #[test]
    fn split_alpha_separates_planes() {
        let (color, alpha) = split_alpha(&[1, 2, 3, 255, 4, 5, 6, 0], 4);
        assert_eq!(color, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(alpha, vec![255, 0]);
    }
}
