use hyper::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::Response;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::errors::{ToolkitError, ToolkitResult};
use crate::types::Tools;
use crate::upload::sniff_content_type;

impl Tools {
    /// **DOWNLOAD STATIC FILE**
    ///
    /// **PURPOSE**: Serves `<dir>/<file>` as an attachment named `display_name`
    /// **SAFETY**: `file` must stay inside `dir`; `..` and absolute paths are refused
    /// **HEADERS**: `Content-Disposition`, exact `Content-Length`, sniffed `Content-Type`
    pub fn download_static_file(
        &self,
        dir: impl AsRef<Path>,
        file: &str,
        display_name: &str,
    ) -> ToolkitResult<Response<Vec<u8>>> {
        let path = resolve(dir.as_ref(), file)?;
        if !path.is_file() {
            return Err(ToolkitError::FileNotFound { path });
        }

        let data = fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ToolkitError::FileNotFound { path: path.clone() },
            _ => ToolkitError::Io(e),
        })?;

        let content_type = HeaderValue::from_str(&sniff_content_type(&data))
            .map_err(|_| ToolkitError::InvalidHeader { name: "Content-Type" })?;
        let disposition = content_disposition(display_name)?;
        let length = HeaderValue::from(data.len() as u64);

        log::debug!("serving {} as '{}'", path.display(), display_name);

        let mut response = Response::new(data);
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, content_type);
        headers.insert(CONTENT_LENGTH, length);
        headers.insert(CONTENT_DISPOSITION, disposition);
        Ok(response)
    }
}

/// Joins `file` onto `dir`, accepting only plain relative paths.
fn resolve(dir: &Path, file: &str) -> ToolkitResult<PathBuf> {
    let relative = Path::new(file);
    let plain = !file.is_empty()
        && !file.contains('\0')
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

    if !plain {
        log::warn!("refusing download path '{}'", file);
        return Err(ToolkitError::InvalidPath {
            path: file.to_string(),
        });
    }
    Ok(dir.join(relative))
}

/// `attachment; filename="..."`, plus an RFC 6266 `filename*` parameter when
/// the name is not plain ASCII.
pub fn content_disposition(display_name: &str) -> ToolkitResult<HeaderValue> {
    let quoted = display_name.replace('\\', "\\\\").replace('"', "\\\"");
    let mut value = format!("attachment; filename=\"{}\"", quoted);
    if !display_name.is_ascii() {
        value.push_str("; filename*=UTF-8''");
        value.push_str(&urlencoding::encode(display_name));
    }

    HeaderValue::from_bytes(value.as_bytes()).map_err(|_| ToolkitError::InvalidHeader {
        name: "Content-Disposition",
    })
}
