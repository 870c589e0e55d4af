//! URL string helpers for the stash protocol.
//!
//! Both helpers work on the raw string: nothing is decoded, normalised or
//! stripped, so the form key and layer path are exactly what the caller gave.

/// Everything after the last `/` of `url`, or the whole string if it has none.
///
/// Query strings and fragments are kept, and a trailing slash yields `""`.
pub fn filename_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}

/// Location of a stashed file: `stash_url + "/" + id`
pub fn layer_url(stash_url: &str, id: &str) -> String {
    format!("{}/{}", stash_url, id)
}
