use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use reqwest::Url;

use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Transport – how remote bytes are retrieved
// ---------------------------------------------------------------------------

/// Retrieves the body of a remote resource in one attempt.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Blocking HTTP(S) GET with no retries and no timeout.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>> {
        let download_err = |reason: String| DataError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| download_err(e.to_string()))?;

        let body = response.bytes().map_err(|e| download_err(e.to_string()))?;
        Ok(body.to_vec())
    }
}

// ---------------------------------------------------------------------------
// ensure_local
// ---------------------------------------------------------------------------

/// Make sure `directory/filename` exists, downloading it from `url` only if
/// it is absent. Returns the local path.
///
/// The URL is checked before anything touches the filesystem or network.
/// An existing file is never re-downloaded.
pub fn ensure_local(
    transport: &dyn Transport,
    directory: &Path,
    filename: &str,
    url: &str,
) -> Result<PathBuf> {
    let url = parse_url(url)?;
    let path = directory.join(filename);

    if path.exists() {
        debug!("{} already present, skipping download", path.display());
        return Ok(path);
    }

    std::fs::create_dir_all(directory).map_err(|source| DataError::FileSystem {
        path: directory.to_path_buf(),
        source,
    })?;

    info!("Downloading {url} → {}", path.display());
    let body = transport.get(&url)?;

    write_verbatim(&path, &body).map_err(|e| DataError::Download {
        url: url.to_string(),
        reason: format!("writing {}: {e}", path.display()),
    })?;

    info!("Wrote {} bytes to {}", body.len(), path.display());
    Ok(path)
}

fn parse_url(url: &str) -> Result<Url> {
    let invalid = |reason: String| DataError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

/// Written via a sibling `.part` file; the final name only ever holds a
/// complete body.
fn write_verbatim(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let mut file = std::fs::File::create(&partial)?;
    file.write_all(body)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&partial, path)
}
