use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::fmt;

use crate::errors::{ToolkitError, ToolkitResult};
use crate::response::types::JsonResponse;
use crate::types::Tools;

pub const APPLICATION_JSON: &str = "application/json";

impl Tools {
    /// Serializes `data` as the body of a response with the given status.
    pub fn write_json<T>(&self, status: StatusCode, data: &T) -> ToolkitResult<Response<Vec<u8>>>
    where
        T: Serialize + ?Sized,
    {
        self.write_json_with_headers(status, data, &HeaderMap::new())
    }

    /// Like [`Tools::write_json`], copying `headers` onto the response first.
    ///
    /// `Content-Type` is always `application/json`, whatever `headers` says.
    pub fn write_json_with_headers<T>(
        &self,
        status: StatusCode,
        data: &T,
        headers: &HeaderMap,
    ) -> ToolkitResult<Response<Vec<u8>>>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(data).map_err(ToolkitError::Serialization)?;

        let mut response = Response::new(body);
        *response.status_mut() = status;

        let out = response.headers_mut();
        for (name, value) in headers {
            out.append(name.clone(), value.clone());
        }
        out.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

        log::debug!("writing JSON response {} ({} bytes)", status, response.body().len());
        Ok(response)
    }

    /// Error envelope `{"error": true, "message": ...}` with `400 Bad Request`.
    pub fn error_json<E>(&self, err: &E) -> ToolkitResult<Response<Vec<u8>>>
    where
        E: fmt::Display + ?Sized,
    {
        self.error_json_with_status(err, StatusCode::BAD_REQUEST)
    }

    pub fn error_json_with_status<E>(
        &self,
        err: &E,
        status: StatusCode,
    ) -> ToolkitResult<Response<Vec<u8>>>
    where
        E: fmt::Display + ?Sized,
    {
        self.write_json(status, &JsonResponse::failure(err.to_string()))
    }
}
