pub use crate::directory::create_dir_if_not_exist;
pub use crate::errors::{ToolkitError, ToolkitResult, UploadError};
pub use crate::random::{random_string, random_string_from, Alphabet};
pub use crate::response::{content_disposition, JsonResponse};
pub use crate::slug::slugify;
pub use crate::types::{Tools, UploadOptions, UploadedFile};
pub use crate::upload::sniff_content_type;
