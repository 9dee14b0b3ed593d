//! Image uploads for the vision page.

use std::error::Error as StdError;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, ImageReader};

use crate::api::{InlineData, Part};

pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug)]
pub enum ImageError {
    UnsupportedFormat { name: String },
    Read { path: PathBuf, source: std::io::Error },
    Decode { name: String, source: image::ImageError },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat { name } => write!(
                f,
                "{name} is not a supported image (accepted: {})",
                ACCEPTED_EXTENSIONS.join(", ")
            ),
            ImageError::Read { path, source } => {
                write!(f, "Could not read {}: {source}", path.display())
            }
            ImageError::Decode { name, source } => {
                write!(f, "Could not decode {name}: {source}")
            }
        }
    }
}

impl StdError for ImageError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ImageError::UnsupportedFormat { .. } => None,
            ImageError::Read { source, .. } => Some(source),
            ImageError::Decode { source, .. } => Some(source),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageUpload {
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        check_extension(path, &file_name)?;

        let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(file_name, bytes)
    }

    /// Sniff the real format from the bytes and read the dimensions.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ImageError> {
        let file_name = file_name.into();
        let reader = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|source| ImageError::Read {
                path: PathBuf::from(&file_name),
                source,
            })?;

        let format = match reader.format() {
            Some(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => format,
            _ => return Err(ImageError::UnsupportedFormat { name: file_name }),
        };

        let (width, height) = reader
            .into_dimensions()
            .map_err(|source| ImageError::Decode {
                name: file_name.clone(),
                source,
            })?;

        Ok(Self {
            file_name,
            mime_type: format.to_mime_type().to_string(),
            bytes,
            width,
            height,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Caption line shown under the upload field.
    pub fn caption(&self) -> String {
        format!(
            "Uploaded Image. {} ({}×{}, {})",
            self.file_name,
            self.width,
            self.height,
            human_size(self.bytes.len())
        )
    }

    pub fn to_part(&self) -> Part {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: self.mime_type.clone(),
                data: STANDARD.encode(&self.bytes),
            },
        }
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

fn check_extension(path: &Path, file_name: &str) -> Result<(), ImageError> {
    let accepted_ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    let accepted_mime = mime_guess::from_path(path)
        .first_raw()
        .map(|mime| mime == "image/png" || mime == "image/jpeg")
        .unwrap_or(false);

    if accepted_ext && accepted_mime {
        Ok(())
    } else {
        Err(ImageError::UnsupportedFormat {
            name: file_name.to_string(),
        })
    }
}

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KIB {
        format!("{bytes} B")
    } else if bytes_f < KIB * KIB {
        format!("{:.1} KB", bytes_f / KIB)
    } else {
        format!("{:.1} MB", bytes_f / (KIB * KIB))
    }
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}
