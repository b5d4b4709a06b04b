use serde::de::DeserializeOwned;
use std::io::{BufReader, Read};

use crate::errors::ToolkitError;
use crate::request::classify::classify;
use crate::request::limiter::LimitedReader;
use crate::types::Tools;

impl Tools {
    /// **READ JSON**
    ///
    /// **PURPOSE**: Decodes exactly one JSON value from `body` into `T`.
    /// **LIMITS**: At most `max_json_bytes` are read. Unless
    /// `allow_unknown_json_fields` is set, keys `T` does not declare are rejected.
    /// **GUARANTEE**: Anything after the value other than whitespace fails with
    /// `MultipleJsonValues`.
    pub fn read_json<T, R>(&self, body: R) -> Result<T, ToolkitError>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let mut limited = LimitedReader::new(body, self.max_json_bytes);
        let mut unknown_field: Option<String> = None;
        let mut track = serde_path_to_error::Track::new();

        let (decoded, trailing) = {
            let mut de = serde_json::Deserializer::from_reader(BufReader::new(&mut limited));
            let tracked = serde_path_to_error::Deserializer::new(&mut de, &mut track);
            let decoded: Result<T, _> = serde_ignored::deserialize(tracked, |path| {
                unknown_field.get_or_insert_with(|| path.to_string());
            });
            let trailing = match decoded {
                Ok(_) => de.end().err(),
                Err(_) => None,
            };
            (decoded, trailing)
        };
        let error_path = Some(track.path().to_string()).filter(|p| p != ".");

        let signals = limited.signals();
        let strict_unknown = unknown_field.filter(|_| !self.allow_unknown_json_fields);

        let value = match decoded {
            Ok(value) => value,
            Err(err) => {
                let classified = classify(
                    &err,
                    signals,
                    strict_unknown.as_deref(),
                    error_path.as_deref(),
                );
                log::warn!("rejected JSON body: {}", classified);
                return Err(classified);
            }
        };

        if let Some(field) = strict_unknown {
            log::warn!("rejected JSON body with unknown key '{}'", field);
            return Err(ToolkitError::UnknownJsonField { field });
        }

        match trailing {
            None => {
                log::debug!("decoded JSON body into {}", std::any::type_name::<T>());
                Ok(value)
            }
            Some(err) if err.is_io() => Err(classify(&err, signals, None, None)),
            Some(_) => {
                log::warn!("rejected JSON body with trailing content");
                Err(ToolkitError::MultipleJsonValues)
            }
        }
    }
}
