// src/util/media.rs
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Trailing extension of a file name, e.g. `photo.JPG` -> `JPG`
    static ref EXTENSION_REGEX: Regex = Regex::new(r"\.([A-Za-z0-9]+)$")
        .expect("Failed to compile extension regex");
}

/// Image MIME type for a file name, or `None` if it is not an image.
///
/// Only the extension is consulted; file contents are never sniffed.
pub fn image_content_type(file_name: &str) -> Option<&'static str> {
    let ext = EXTENSION_REGEX
        .captures(file_name)?
        .get(1)?
        .as_str()
        .to_ascii_lowercase();

    let content_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        _ => return None,
    };
    Some(content_type)
}
