use thiserror::Error;

/// Opaque handle to a loaded image within a PdfDocument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Supported image formats.
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

/// Why image bytes could not be turned into an image XObject.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image data too short to detect format")]
    TooShort,
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("JPEG error: {0}")]
    Jpeg(String),
    #[error("PNG decode error: {0}")]
    Png(#[from] png::DecodingError),
    #[error("unsupported PNG color type: {0:?}")]
    PngColorType(png::ColorType),
    #[error("image has zero width or height")]
    Empty,
    #[error("failed to write image object: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed image data ready for embedding into a PDF.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    pub bits_per_component: u8,
    /// Raw pixel data (RGB/Gray) or raw JPEG bytes.
    pub data: Vec<u8>,
    /// Separate alpha channel (grayscale), if present.
    pub smask_data: Option<Vec<u8>>,
}

/// Size of an image on the page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// Detect image format from magic bytes.
pub fn detect_format(data: &[u8]) -> Result<ImageFormat, ImageError> {
    if data.len() < 4 {
        return Err(ImageError::TooShort);
    }
    if data[0] == 0xFF && data[1] == 0xD8 {
        Ok(ImageFormat::Jpeg)
    } else if data[..4] == [0x89, b'P', b'N', b'G'] {
        Ok(ImageFormat::Png)
    } else {
        Err(ImageError::UnsupportedFormat)
    }
}

/// Load and parse image data from raw bytes.
pub fn load_image(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let image = match detect_format(&data)? {
        ImageFormat::Jpeg => parse_jpeg(data)?,
        ImageFormat::Png => parse_png(data)?,
    };
    if image.width == 0 || image.height == 0 {
        return Err(ImageError::Empty);
    }
    Ok(image)
}

/// Parse JPEG SOF marker to extract dimensions and color space.
/// JPEG data is embedded as-is (DCTDecode); no pixel decoding needed.
fn parse_jpeg(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let (width, height, components) = jpeg_dimensions(&data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => {
            return Err(ImageError::Jpeg(format!(
                "unsupported component count {} (expected 1 or 3)",
                n
            )))
        }
    };

    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        bits_per_component: 8,
        data,
        smask_data: None,
    })
}

/// Scan JPEG data for SOF0-SOF3 markers and extract width/height/components.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, u8), ImageError> {
    let len = data.len();
    let mut i = 0;
    while i + 1 < len {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        if (0xC0..=0xC3).contains(&marker) {
            if i + 9 >= len {
                return Err(ImageError::Jpeg("SOF marker truncated".to_string()));
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        if marker == 0xFF || marker == 0x00 {
            i += 1;
            continue;
        }
        // Standalone markers carry no length.
        if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        if i + 3 >= len {
            break;
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    Err(ImageError::Jpeg("no SOF marker found".to_string()))
}

/// Decode PNG using the `png` crate and produce 8-bit raw pixel data.
/// Palette and low bit-depth images are expanded; 16-bit is stripped.
fn parse_png(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let mut decoder = png::Decoder::new(data.as_slice());
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let (color_space, pixels, alpha) = match info.color_type {
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
        other => return Err(ImageError::PngColorType(other)),
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        bits_per_component: 8,
        data: pixels,
        smask_data: alpha,
    })
}

/// Split interleaved pixels into color channels and a separate alpha plane.
fn split_alpha(buf: &[u8], stride: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels = buf.len() / stride;
    let mut color = Vec::with_capacity(pixels * (stride - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for chunk in buf.chunks_exact(stride) {
        color.extend_from_slice(&chunk[..stride - 1]);
        alpha.push(chunk[stride - 1]);
    }
    (color, alpha)
}

/// Thumbnail sizing: scale `img_w`×`img_h` (1 pixel = 1 point) down to fit
/// inside `max_w`×`max_h`, preserving aspect ratio. Never scales up.
pub fn thumbnail_size(img_w: u32, img_h: u32, max_w: f64, max_h: f64) -> ImageSize {
    let iw = img_w as f64;
    let ih = img_h as f64;
    let scale = (max_w / iw).min(max_h / ih).min(1.0);
    ImageSize {
        width: iw * scale,
        height: ih * scale,
    }
}
