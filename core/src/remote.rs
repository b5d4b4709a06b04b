//! # OUTBOUND JSON
//!
//! Posts a JSON payload to another service with a blocking `reqwest` client.

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::errors::{ToolkitError, ToolkitResult};
use crate::response::APPLICATION_JSON;
use crate::types::Tools;

impl Tools {
    /// POSTs `data` as JSON to `uri` with a default client.
    ///
    /// The remote status is available on the returned response; non-2xx
    /// answers are not turned into errors.
    pub fn push_json_to_remote<T>(&self, uri: &str, data: &T) -> ToolkitResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let client = Client::builder().build()?;
        self.push_json_to_remote_with_client(&client, uri, data)
    }

    pub fn push_json_to_remote_with_client<T>(
        &self,
        client: &Client,
        uri: &str,
        data: &T,
    ) -> ToolkitResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(data).map_err(ToolkitError::Serialization)?;
        let response = client
            .post(uri)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(body)
            .send()?;

        log::debug!("pushed JSON to {}: {}", uri, response.status());
        Ok(response)
    }
}
