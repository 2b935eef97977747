/// Cache key derivation
///
/// `path?name=value&...` with names in ascending order, so two calls with the
/// same path and parameter set always land on the same entry. The API key is
/// deliberately absent: responses do not depend on which key fetched them.
use crate::apis::QueryParams;

pub fn derive_key(path: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, params.canonical_query())
    }
}
