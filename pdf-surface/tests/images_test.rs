use pdf_surface::images::{load_image, ColorSpace, ImageFormat};
use pdf_surface::{DrawingSurface, PdfSurface, SurfaceError};

fn encode_png(width: u32, height: u32, color: png::ColorType, pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
    }
    out
}

/// SOI followed by a baseline frame header: 8-bit, 16 high, 32 wide, RGB.
const TINY_JPEG: [u8; 12] = [
    0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x10, 0x00, 0x20, 0x03,
];

#[test]
fn rgb_png_decodes_without_mask() {
    let png = encode_png(2, 1, png::ColorType::Rgb, &[255, 0, 0, 0, 0, 255]);
    let image = load_image(&png).unwrap();
    assert_eq!(image.format, ImageFormat::Png);
    assert_eq!((image.width, image.height), (2, 1));
    assert_eq!(image.color_space, ColorSpace::DeviceRGB);
    assert_eq!(image.data, vec![255, 0, 0, 0, 0, 255]);
    assert!(image.smask_data.is_none());
}

#[test]
fn rgba_png_splits_alpha() {
    let png = encode_png(1, 2, png::ColorType::Rgba, &[10, 20, 30, 255, 40, 50, 60, 0]);
    let image = load_image(&png).unwrap();
    assert_eq!(image.data, vec![10, 20, 30, 40, 50, 60]);
    assert_eq!(image.smask_data, Some(vec![255, 0]));
}

#[test]
fn grayscale_png_uses_device_gray() {
    let png = encode_png(3, 1, png::ColorType::Grayscale, &[0, 128, 255]);
    let image = load_image(&png).unwrap();
    assert_eq!(image.color_space, ColorSpace::DeviceGray);
}

#[test]
fn corrupt_png_is_unsupported() {
    let mut png = encode_png(1, 1, png::ColorType::Rgb, &[1, 2, 3]);
    png.truncate(20);
    assert!(matches!(load_image(&png), Err(SurfaceError::UnsupportedImage(_))));
}

#[test]
fn jpeg_is_passed_through() {
    let mut surface = PdfSurface::letter();
    surface.draw_image(&TINY_JPEG, 440.0, 700.0, 150.0, 55.0).unwrap();
    let bytes = surface.finalize_and_emit().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/Filter /DCTDecode"));
    assert!(output.contains("/Width 32 /Height 16"));
    assert!(output.contains("q\n150 0 0 55 440 700 cm\n/Im1 Do\nQ\n"));
    assert!(output.contains("/XObject << /Im1 "));
}

#[test]
fn png_alpha_becomes_a_soft_mask() {
    let png = encode_png(1, 1, png::ColorType::Rgba, &[0, 0, 0, 128]);
    let mut surface = PdfSurface::letter();
    surface.draw_image(&png, 0.0, 0.0, 10.0, 10.0).unwrap();
    let bytes = surface.finalize_and_emit().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/SMask "));
}

#[test]
fn images_are_only_referenced_from_their_page() {
    let mut surface = PdfSurface::letter();
    surface.start_new_page();
    surface.draw_image(&TINY_JPEG, 0.0, 0.0, 32.0, 16.0).unwrap();
    let bytes = surface.finalize_and_emit().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert_eq!(output.matches("/XObject").count(), 1);
}

#[test]
fn unknown_bytes_are_rejected_by_the_surface() {
    let mut surface = PdfSurface::letter();
    let err = surface.draw_image(b"GIF89a", 0.0, 0.0, 1.0, 1.0).unwrap_err();
    assert!(matches!(err, SurfaceError::UnsupportedImage(_)));
}
