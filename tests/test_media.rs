#![allow(dead_code)]

use media_ingest::entities::upload::{UploadMetadata, UploadRequest};
use reqwest::multipart::{Form, Part};

pub const MIB: usize = 1024 * 1024;

/// PNG signature plus the start of an IHDR chunk; enough for magic-number sniffing.
pub fn png_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    ]
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj\n".to_vec()
}

/// `ftyp` box of an ISO media file.
pub fn mp4_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![
        0x00, 0x00, 0x00, 0x18, 0x66, 0x74, 0x79, 0x70,
        0x6D, 0x70, 0x34, 0x32, 0x00, 0x00, 0x00, 0x00,
    ];
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}

pub fn image_request(content_type: &str) -> UploadRequest {
    UploadRequest::new(png_bytes(), Some(content_type.to_string()))
        .with_file_name(Some("cat.png".to_string()))
}

pub fn video_request(len: usize, title: &str, declared_size: Option<i64>) -> UploadRequest {
    UploadRequest::new(mp4_bytes(len), Some("video/mp4".to_string()))
        .with_file_name(Some("clip.mp4".to_string()))
        .with_metadata(UploadMetadata {
            title: Some(title.to_string()),
            description: Some("A short clip".to_string()),
            original_size: declared_size,
        })
}

pub fn image_form(bytes: Vec<u8>, mime: &str) -> Form {
    let part = Part::bytes(bytes)
        .file_name("upload.bin")
        .mime_str(mime)
        .unwrap();
    Form::new().part("file", part)
}

pub fn video_form(bytes: Vec<u8>, title: &str) -> Form {
    let declared = bytes.len().to_string();
    let part = Part::bytes(bytes)
        .file_name("clip.mp4")
        .mime_str("video/mp4")
        .unwrap();
    Form::new()
        .part("file", part)
        .text("title", title.to_string())
        .text("description", "Sunset over the bay")
        .text("originalSize", declared)
}
