//! Files produced by model actions (exports, labels, ...).

use crate::error::{ClientError, Result};
use crate::transport::ApiResponse;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Clone, Debug)]
pub struct ActionFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ActionFile {
    pub fn from_response(response: ApiResponse) -> Result<Self> {
        let filename = response
            .header("content-disposition")
            .and_then(filename_from_disposition)
            .ok_or(ClientError::MissingFilename)?;
        let content_type = response.header("content-type").map(str::to_string);
        Ok(ActionFile {
            filename,
            content_type,
            bytes: response.body,
        })
    }

    /// Write the file into `dir` under its server-given name (directory components are dropped).
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let name = Path::new(&self.filename)
            .file_name()
            .ok_or(ClientError::MissingFilename)?;
        let path = dir.as_ref().join(name);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "action file saved");
        Ok(path)
    }
}

fn extended_filename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)filename\*\s*=\s*([\w-]+)'[^']*'([^;]+)").expect("static regex"))
}

fn quoted_filename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)filename\s*=\s*"([^"]*)""#).expect("static regex"))
}

fn bare_filename() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)filename\s*=\s*([^;\s]+)").expect("static regex"))
}

/// Filename from a `Content-Disposition` value. `filename*` (RFC 5987) wins over `filename`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    if let Some(name) = extended_filename()
        .captures(header)
        .and_then(|caps| decode_extended(&caps[1], caps[2].trim()))
        .and_then(non_empty)
    {
        return Some(name);
    }
    if let Some(caps) = quoted_filename().captures(header) {
        return non_empty(caps[1].trim().to_string());
    }
    bare_filename()
        .captures(header)
        .and_then(|caps| non_empty(caps[1].trim().to_string()))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Decode an RFC 5987 value. Only UTF-8 and ISO-8859-1 are understood; other charsets yield `None`.
fn decode_extended(charset: &str, value: &str) -> Option<String> {
    if charset.eq_ignore_ascii_case("utf-8") {
        return urlencoding::decode(value).ok().map(Cow::into_owned);
    }
    if charset.eq_ignore_ascii_case("iso-8859-1") {
        // Latin-1 bytes map one-to-one onto the first 256 code points.
        return Some(urlencoding::decode_binary(value.as_bytes()).iter().map(|&b| char::from(b)).collect());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_filename_is_extracted() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="plasmids_2024.xlsx""#).as_deref(),
            Some("plasmids_2024.xlsx")
        );
    }

    #[test]
    fn trailing_parameters_are_ignored() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="map.gbk"; size=120"#).as_deref(),
            Some("map.gbk")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=map.gbk; size=120").as_deref(),
            Some("map.gbk")
        );
    }

    #[test]
    fn extended_filename_wins_and_is_decoded() {
        let header = r#"attachment; filename="fallback.zip"; filename*=UTF-8''Pl%C3%A4smid%20maps.zip"#;
        assert_eq!(filename_from_disposition(header).as_deref(), Some("Pläsmid maps.zip"));
    }

    #[test]
    fn latin1_extended_filename_is_decoded() {
        assert_eq!(
            filename_from_disposition("attachment; filename*=ISO-8859-1''Pl%E4smid.csv").as_deref(),
            Some("Pläsmid.csv")
        );
    }

    #[test]
    fn unknown_charset_falls_back_to_plain_filename() {
        let header = r#"attachment; filename*=KOI8-R''%F0.csv; filename="plain.csv""#;
        assert_eq!(filename_from_disposition(header).as_deref(), Some("plain.csv"));
        assert_eq!(filename_from_disposition("attachment; filename*=KOI8-R''%F0.csv"), None);
    }

    #[test]
    fn invalid_utf8_extended_value_falls_back() {
        let header = r#"attachment; filename*=UTF-8''%FF%FE.csv; filename="plain.csv""#;
        assert_eq!(filename_from_disposition(header).as_deref(), Some("plain.csv"));
    }

    #[test]
    fn missing_filename_is_none() {
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn response_without_disposition_is_an_error() {
        let response = ApiResponse {
            status: 200,
            headers: vec![("Content-Type".into(), "text/csv".into())],
            body: b"a,b".to_vec(),
        };
        assert!(matches!(ActionFile::from_response(response), Err(ClientError::MissingFilename)));
    }

    #[tokio::test]
    async fn save_to_strips_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = ActionFile {
            filename: "../../etc/evil.csv".into(),
            content_type: None,
            bytes: b"id\n1\n".to_vec(),
        };
        let path = file.save_to(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("evil.csv"));
        assert_eq!(std::fs::read(path).unwrap(), b"id\n1\n");
    }
}
