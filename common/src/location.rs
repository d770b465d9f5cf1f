use serde::Serialize;

/// Build a redirect target for `path`, carrying `query` url-encoded.
///
/// Falls back to the plain path if the query can't be encoded.
pub fn with_query<T: Serialize + ?Sized>(path: &str, query: &T) -> String {
    match serde_urlencoded::to_string(query) {
        Ok(query) if query.is_empty() => path.to_string(),
        Ok(query) => format!("{path}?{query}"),
        Err(err) => {
            log::warn!("failed to encode redirect query: {err}");
            path.to_string()
        }
    }
}
