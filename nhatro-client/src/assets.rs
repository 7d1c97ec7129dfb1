//! Static asset URL resolution
//!
//! Images and uploaded files are served from the API host's origin, not
//! from under the API root. A relative path is therefore joined to the
//! origin left over after stripping the API root's path suffix.

/// Turns stored asset paths into absolute URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    origin: String,
}

impl AssetResolver {
    /// Build from the API root URL (e.g. `http://localhost:8000/api`)
    pub fn new(api_root: &str) -> Self {
        Self {
            origin: origin_of(api_root).to_string(),
        }
    }

    /// Host origin assets are served from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Resolve a possibly-relative path; absolute URLs pass through unchanged.
    pub fn resolve(&self, path: Option<&str>) -> Option<String> {
        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
            return Some(path.to_string());
        }
        Some(format!("{}/{}", self.origin, path.trim_start_matches('/')))
    }
}

fn origin_of(url: &str) -> &str {
    let url = url.trim_end_matches('/');
    let authority_start = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[authority_start..].find('/') {
        Some(slash) => &url[..authority_start + slash],
        None => url,
    }
}
