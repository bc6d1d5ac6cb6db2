//! Signed-descriptor uploads.
//!
//! The client never holds object-storage credentials. It asks the backend
//! for a short-lived signed descriptor, then PUTs the raw bytes straight
//! to storage with the headers the descriptor names.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::{ApiClient, ApiError, MAX_JSON_RESPONSE_BYTES};
use crate::http_client;

const TICKET_ROUTE: &str = "/upload/ticket";

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_MODEL_BYTES: u64 = 500 * 1024 * 1024;

/// What the upload is for. The backend keys storage prefixes and size
/// policy off this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    MammogramImage,
    ModelArtifact,
    ModelLabels,
}

#[derive(Debug, Error)]
pub enum UploadValidationError {
    #[error("Could not read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("'{name}' is not a supported image. Use .jpg, .jpeg or .png")]
    UnsupportedImageType { name: String },
    #[error("'{name}' is not a model artifact. Use a .pt file")]
    UnsupportedModelType { name: String },
    #[error("'{name}' is not a labels file. Use a .txt file")]
    UnsupportedLabelsType { name: String },
    #[error("'{name}' is {size} bytes, over the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },
}

/// Body of the ticket request. The declared size and digest let the
/// backend enforce limits and verify the payload it later receives.
#[derive(Clone, Debug, Serialize)]
pub struct UploadTicketRequest {
    pub file_name: String,
    pub content_type: String,
    pub kind: UploadKind,
    pub size_bytes: u64,
    pub sha256: String,
}

impl UploadTicketRequest {
    /// Validate `path` for `kind` and build the ticket request, hashing
    /// the file contents.
    pub fn for_file(path: &Path, kind: UploadKind) -> Result<Self, UploadValidationError> {
        let file_name = display_name(path);
        validate_extension(&file_name, kind)?;
        let size_bytes = file_size(path)?;
        let limit = size_limit(kind);
        if size_bytes > limit {
            return Err(UploadValidationError::TooLarge {
                name: file_name,
                size: size_bytes,
                limit,
            });
        }
        let sha256 = sha256_file(path).map_err(|source| UploadValidationError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            kind,
            size_bytes,
            sha256,
        })
    }
}

/// The short-lived descriptor the backend signs.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UploadTicket {
    pub upload_url: String,
    #[serde(default)]
    pub public_url: String,
    pub key: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// What the rest of the workflow needs once the bytes are stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadedFile {
    pub url: String,
    pub key: String,
    pub original_name: String,
}

pub fn request_upload_ticket(
    client: &ApiClient,
    request: &UploadTicketRequest,
) -> Result<UploadTicket, ApiError> {
    let body = super::send_json_text(client.post(TICKET_ROUTE), request, MAX_JSON_RESPONSE_BYTES)?;
    parse_upload_ticket(&body)
}

/// PUT the file to the ticket's signed URL. The request carries the
/// ticket's headers and an explicit Content-Length; the signed URL itself
/// is the authorization, so no bearer token is attached. `progress` is
/// called with (bytes sent, total bytes) as the body streams out.
pub fn put_file(
    ticket: &UploadTicket,
    path: &Path,
    progress: impl FnMut(u64, u64),
) -> Result<(), ApiError> {
    let file = File::open(path).map_err(|err| {
        ApiError::Transport(format!("Could not open '{}': {err}", path.display()))
    })?;
    let total = file
        .metadata()
        .map_err(|err| {
            ApiError::Transport(format!("Could not stat '{}': {err}", path.display()))
        })?
        .len();

    let mut request = http_client::agent()
        .put(&ticket.upload_url)
        .set("Content-Length", &total.to_string());
    for (name, value) in &ticket.headers {
        request = request.set(name, value);
    }

    let reader = ProgressReader {
        inner: file,
        sent: 0,
        total,
        progress,
    };
    match request.send(reader) {
        Ok(_) => Ok(()),
        Err(err) => Err(super::map_request_error(err)),
    }
}

/// Ticket plus stored-file identity for the follow-up backend call.
pub fn uploaded_file(ticket: &UploadTicket, request: &UploadTicketRequest) -> UploadedFile {
    UploadedFile {
        url: ticket.public_url.clone(),
        key: ticket.key.clone(),
        original_name: request.file_name.clone(),
    }
}

struct ProgressReader<R, F> {
    inner: R,
    sent: u64,
    total: u64,
    progress: F,
}

impl<R: Read, F: FnMut(u64, u64)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.sent += n as u64;
        (self.progress)(self.sent, self.total);
        Ok(n)
    }
}

fn parse_upload_ticket(body: &str) -> Result<UploadTicket, ApiError> {
    let ticket: UploadTicket = serde_json::from_str(body.trim())
        .map_err(|err| ApiError::InvalidResponse(err.to_string()))?;
    if ticket.upload_url.trim().is_empty() || ticket.key.trim().is_empty() {
        return Err(ApiError::InvalidResponse(
            "Upload ticket missing url or key".into(),
        ));
    }
    Ok(ticket)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_size(path: &Path) -> Result<u64, UploadValidationError> {
    std::fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|source| UploadValidationError::Unreadable {
            path: path.display().to_string(),
            source,
        })
}

fn extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

fn validate_extension(name: &str, kind: UploadKind) -> Result<(), UploadValidationError> {
    let ext = extension(name);
    match kind {
        UploadKind::MammogramImage if matches!(ext.as_str(), "jpg" | "jpeg" | "png") => Ok(()),
        UploadKind::MammogramImage => Err(UploadValidationError::UnsupportedImageType {
            name: name.to_string(),
        }),
        UploadKind::ModelArtifact if ext == "pt" => Ok(()),
        UploadKind::ModelArtifact => Err(UploadValidationError::UnsupportedModelType {
            name: name.to_string(),
        }),
        UploadKind::ModelLabels if ext == "txt" => Ok(()),
        UploadKind::ModelLabels => Err(UploadValidationError::UnsupportedLabelsType {
            name: name.to_string(),
        }),
    }
}

fn size_limit(kind: UploadKind) -> u64 {
    match kind {
        UploadKind::MammogramImage => MAX_IMAGE_BYTES,
        UploadKind::ModelArtifact | UploadKind::ModelLabels => MAX_MODEL_BYTES,
    }
}

fn content_type_for(name: &str) -> &'static str {
    match extension(name).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builds_a_ticket_request_for_a_valid_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan_left_cc.PNG");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not really a png")
            .unwrap();

        let request = UploadTicketRequest::for_file(&path, UploadKind::MammogramImage).unwrap();
        assert_eq!(request.file_name, "scan_left_cc.PNG");
        assert_eq!(request.content_type, "image/png");
        assert_eq!(request.size_bytes, 16);
        assert_eq!(
            request.sha256,
            "e90137d39de304eefbbe788bc535c7e82f27abbf8069505fbbd8a9dcdc4f2024"
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "mammogram_image");
    }

    #[test]
    fn rejects_a_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.gif");
        std::fs::write(&path, b"gif").unwrap();
        let err = UploadTicketRequest::for_file(&path, UploadKind::MammogramImage).unwrap_err();
        assert!(matches!(
            err,
            UploadValidationError::UnsupportedImageType { .. }
        ));

        let err = UploadTicketRequest::for_file(&path, UploadKind::ModelArtifact).unwrap_err();
        assert!(matches!(
            err,
            UploadValidationError::UnsupportedModelType { .. }
        ));
    }

    #[test]
    fn parses_a_full_ticket() {
        let body = r#"{
            "upload_url": "https://storage.example.org/mammo/u-1/scan.png?sig=abc",
            "public_url": "https://cdn.example.org/mammo/u-1/scan.png",
            "key": "mammo/u-1/scan.png",
            "headers": { "x-amz-meta-kind": "mammogram_image" },
            "expires_at": "2024-03-01T08:20:00Z"
        }"#;
        let ticket = parse_upload_ticket(body).unwrap();
        assert_eq!(ticket.key, "mammo/u-1/scan.png");
        assert_eq!(
            ticket.headers.get("x-amz-meta-kind").map(String::as_str),
            Some("mammogram_image")
        );
    }

    #[test]
    fn ticket_without_url_is_invalid() {
        let err = parse_upload_ticket(r#"{ "upload_url": "", "key": "k" }"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn progress_reader_reports_cumulative_bytes() {
        let payload = vec![7u8; 9000];
        let mut seen = Vec::new();
        let mut reader = ProgressReader {
            inner: payload.as_slice(),
            sent: 0,
            total: payload.len() as u64,
            progress: |sent, total| seen.push((sent, total)),
        };
        let mut out = Vec::new();
        io::copy(&mut reader, &mut out).unwrap();
        assert_eq!(out.len(), 9000);
        let (last_sent, last_total) = *seen.last().unwrap();
        assert_eq!(last_sent, 9000);
        assert_eq!(last_total, 9000);
    }
}
