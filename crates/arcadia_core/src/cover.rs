use crate::error::ValidationError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use uuid::Uuid;

pub const DEFAULT_COVER_EXT: &str = "jpg";

const MAX_EXT_LEN: usize = 10;

/// A decoded cover image waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverUpload {
    pub data: Bytes,
    /// File extension without the dot, e.g. `png`.
    pub ext: String,
}

impl CoverUpload {
    /// Decodes a base64 payload. `ext` falls back to `jpg` when empty.
    ///
    /// Line breaks and other ASCII whitespace inside the payload are ignored,
    /// as wrapped `base64` output contains them.
    pub fn from_base64(encoded: &str, ext: Option<&str>) -> Result<Self, ValidationError> {
        let ext = cover_ext(ext)?;
        let compact: Vec<u8> = encoded
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let data = STANDARD
            .decode(compact)
            .map_err(|_| ValidationError::InvalidCover)?;

        Ok(Self {
            data: Bytes::from(data),
            ext,
        })
    }

    pub fn content_type(&self) -> String {
        format!("image/{}", self.ext)
    }

    /// A fresh, globally unique object key under `prefix`.
    pub fn generate_key(&self, prefix: &str) -> String {
        let prefix = prefix.trim_end_matches('/');
        format!("{prefix}/{}.{}", Uuid::new_v4(), self.ext)
    }
}

fn cover_ext(ext: Option<&str>) -> Result<String, ValidationError> {
    let ext = ext.map(str::trim).filter(|e| !e.is_empty());
    let Some(ext) = ext else {
        return Ok(DEFAULT_COVER_EXT.to_string());
    };

    if ext.len() <= MAX_EXT_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(ext.to_string())
    } else {
        Err(ValidationError::InvalidCoverExt)
    }
}

/// Public URL of an object served through the CDN:
/// `<origin>/projects/<account>/<bucket>/<key>`.
pub fn cdn_url(cdn_origin: &str, account: &str, bucket: &str, key: &str) -> String {
    let origin = cdn_origin.trim_end_matches('/');
    format!("{origin}/projects/{account}/{bucket}/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_payload_and_defaults_extension() {
        let cover = CoverUpload::from_base64("aGVsbG8=", None).unwrap();
        assert_eq!(cover.data, Bytes::from_static(b"hello"));
        assert_eq!(cover.ext, "jpg");
        assert_eq!(cover.content_type(), "image/jpg");

        let cover = CoverUpload::from_base64("aGVsbG8=", Some("")).unwrap();
        assert_eq!(cover.ext, "jpg");
    }

    #[test]
    fn keeps_given_extension() {
        let cover = CoverUpload::from_base64("aGVsbG8=", Some("png")).unwrap();
        assert_eq!(cover.content_type(), "image/png");
    }

    #[test]
    fn wrapped_payloads_are_accepted() {
        let cover = CoverUpload::from_base64("aGVs\nbG8=", None).unwrap();
        assert_eq!(cover.data, Bytes::from_static(b"hello"));

        let cover = CoverUpload::from_base64(" aGVs\r\n bG8=\n", Some("png")).unwrap();
        assert_eq!(cover.data, Bytes::from_static(b"hello"));
    }

    #[test]
    fn rejects_bad_payloads_and_extensions() {
        assert_eq!(
            CoverUpload::from_base64("not base64!!", None),
            Err(ValidationError::InvalidCover)
        );
        assert_eq!(
            CoverUpload::from_base64("aGVs*bG8=", None),
            Err(ValidationError::InvalidCover)
        );
        assert_eq!(
            CoverUpload::from_base64("aGVsbG8=", Some("../png")),
            Err(ValidationError::InvalidCoverExt)
        );
        assert_eq!(
            CoverUpload::from_base64("aGVsbG8=", Some("averyverylongext")),
            Err(ValidationError::InvalidCoverExt)
        );
    }

    #[test]
    fn generated_keys_are_unique_and_prefixed() {
        let cover = CoverUpload::from_base64("aGVsbG8=", Some("webp")).unwrap();
        let a = cover.generate_key("games/covers");
        let b = cover.generate_key("games/covers/");

        assert_ne!(a, b);
        for key in [&a, &b] {
            let name = key.strip_prefix("games/covers/").unwrap();
            let (id, ext) = name.split_once('.').unwrap();
            assert!(Uuid::parse_str(id).is_ok());
            assert_eq!(ext, "webp");
        }
    }

    #[test]
    fn builds_cdn_urls() {
        assert_eq!(
            cdn_url("https://cdn.poehali.dev/", "KEY", "files", "games/covers/a.jpg"),
            "https://cdn.poehali.dev/projects/KEY/files/games/covers/a.jpg"
        );
    }
}
