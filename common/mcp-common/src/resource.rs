//! Helpers for serving static text resources
//!
//! Servers that expose documents (rather than tools) describe them with
//! [`text_resource`] in `list_resources` and answer `read_resource` with
//! [`text_contents`].

use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};

/// Describe a text resource for `resources/list`
pub fn text_resource(uri: &str, name: &str, description: &str, mime_type: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some(mime_type.to_string());
    raw.no_annotation()
}

/// Wrap a single text body as a `resources/read` response
pub fn text_contents(uri: &str, text: impl Into<String>) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri)],
    }
}
