//! Error types for XML decoding.

/// Errors that can occur while converting an XML document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// An error from the underlying quick-xml library.
    #[error("XML processing error: {0}")]
    QuickXml(#[from] quick_xml::Error),

    /// An error from quick-xml attribute handling.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// The document has no root element.
    #[error("missing required XML element: {0}")]
    MissingElement(String),

    /// The document is truncated or has content after the root element.
    #[error("unexpected XML element: {0}")]
    UnexpectedElement(String),

    /// Text or an entity reference could not be decoded.
    #[error("failed to parse value: {0}")]
    ParseError(String),
}
