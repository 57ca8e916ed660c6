use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("Unsupported scheme")]
    Unsupported,
    #[error("Bad data URI")]
    BadDataUri,
}

/// A URI as found in a document.
#[derive(Debug, PartialEq, Eq)]
pub enum Scheme<'a> {
    // Data uri with optional mime type
    Data(Option<&'a str>, Vec<u8>),
    // Relative path
    Relative(&'a str),
    // Absolute path
    Absolute(&'a str),
}

fn strip_prefix_ignore_case<'a>(uri: &'a str, prefix: &str) -> Option<&'a str> {
    let head = uri.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&uri[prefix.len()..])
    } else {
        None
    }
}

/// Whether `uri` carries its data inline.
pub fn is_data_uri(uri: &str) -> bool {
    strip_prefix_ignore_case(uri, "data:").is_some()
}

impl<'a> TryFrom<&'a str> for Scheme<'a> {
    type Error = SchemeError;

    fn try_from(uri: &'a str) -> Result<Self, Self::Error> {
        if !uri.contains(':') {
            return Ok(Scheme::Relative(uri));
        }
        if let Some(content) = strip_prefix_ignore_case(uri, "data:") {
            // Data URI: rfc2397
            let Some((param, value)) = content.split_once(',') else {
                return Err(SchemeError::BadDataUri);
            };
            match param.split_once(';') {
                Some((mime, encoding)) if encoding.eq_ignore_ascii_case("base64") => {
                    let data = STANDARD
                        .decode(value)
                        .map_err(|_| SchemeError::BadDataUri)?;
                    let mime = (!mime.is_empty()).then_some(mime);
                    Ok(Scheme::Data(mime, data))
                }
                Some(_) => Err(SchemeError::BadDataUri),
                // Plain text data, mime type left unknown.
                None => Ok(Scheme::Data(None, Vec::from(value.as_bytes()))),
            }
        } else if let Some(path) = strip_prefix_ignore_case(uri, "file://") {
            Ok(Scheme::Absolute(path))
        } else if let Some(path) = strip_prefix_ignore_case(uri, "file:") {
            Ok(Scheme::Absolute(path))
        } else {
            Err(SchemeError::Unsupported)
        }
    }
}
