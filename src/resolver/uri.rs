use crate::error::ResolveError;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use url::Url;

const LOCALHOST: &str = "localhost";

/// Extract the local path carried by a scheme URI.
///
/// Accepted shapes, for scheme `s`:
/// - `s:path`, rewritten to `s:///path` (a leading `~` is kept as `~`)
/// - `s:///path`
/// - `s://localhost/path`: the host is dropped
/// - `s://host[:port]/path`: the authority, port included, becomes the first
///   path segment
///
/// The result is percent-decoded but otherwise untouched: no tilde or glob
/// expansion and no cleaning.
pub fn parse_uri(raw: &str, scheme: &str) -> Result<String, ResolveError> {
    let normalized = normalize_opaque_form(raw, scheme);
    let url = Url::parse(&normalized)
        .map_err(|e| ResolveError::InvalidUri(format!("{raw}: {e}")))?;

    if !url.scheme().eq_ignore_ascii_case(scheme) {
        return Err(ResolveError::UnsupportedScheme(url.scheme().to_string()));
    }

    let authority = raw_authority(&normalized);
    let encoded = if authority.eq_ignore_ascii_case(LOCALHOST) {
        Cow::Borrowed(url.path())
    } else {
        Cow::Owned(format!("{authority}{}", url.path()))
    };

    let decoded = decode_path(&encoded)?;
    if decoded.is_empty() {
        return Err(ResolveError::InvalidUri(format!("{raw}: empty path")));
    }

    Ok(strip_drive_slash(decoded, cfg!(windows)))
}

/// `s:rest` without an authority becomes `s:///rest`, or `s://~rest` when the
/// payload is home-relative so the tilde survives as the leading segment.
fn normalize_opaque_form<'a>(raw: &'a str, scheme: &str) -> Cow<'a, str> {
    let Some(rest) = strip_scheme_prefix(raw, scheme) else {
        return Cow::Borrowed(raw);
    };
    if rest.starts_with("//") {
        return Cow::Borrowed(raw);
    }
    if rest.starts_with('~') {
        return Cow::Owned(format!("{scheme}://{rest}"));
    }
    Cow::Owned(format!("{scheme}:///{}", rest.trim_start_matches('/')))
}

fn strip_scheme_prefix<'a>(raw: &'a str, scheme: &str) -> Option<&'a str> {
    let head = raw.get(..scheme.len())?;
    if !head.eq_ignore_ascii_case(scheme) {
        return None;
    }
    raw[scheme.len()..].strip_prefix(':')
}

/// Host and port exactly as written, without userinfo. `Url` normalizes the
/// port away (`C:` loses its colon, `h:80` its port), so the text is taken
/// from the input itself.
fn raw_authority(normalized: &str) -> &str {
    let Some((_, after)) = normalized.split_once("://") else {
        return "";
    };
    let end = after.find(['/', '?', '#']).unwrap_or(after.len());
    let authority = &after[..end];
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
}

/// Percent-decode, rejecting truncated or non-hex escapes and non-UTF-8 output.
fn decode_path(encoded: &str) -> Result<String, ResolveError> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|b| *b == b'%') {
        let at = i + offset;
        let escape = bytes.get(at + 1..at + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            let shown: String = encoded[at..].chars().take(3).collect();
            return Err(ResolveError::InvalidUri(format!(
                "invalid path encoding: malformed escape {shown:?}"
            )));
        }
        i = at + 3;
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| ResolveError::InvalidUri(format!("invalid path encoding: {e}")))
}

/// `/C:/Users` → `C:/Users` on drive-letter platforms.
fn strip_drive_slash(path: String, drive_letters: bool) -> String {
    let bytes = path.as_bytes();
    if drive_letters
        && bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':'
    {
        return path[1..].to_string();
    }
    path
}
