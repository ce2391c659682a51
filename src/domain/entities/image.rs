use actix_multipart::form::{tempfile::TempFile, MultipartForm};

// Social renditions are requested for every image; the client only sends the file.
#[derive(Debug, MultipartForm)]
pub struct ImageUploadForm {
    #[multipart(limit = "25MB")]
    pub file: Option<TempFile>,
}
