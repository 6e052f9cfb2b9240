use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeoError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("generated XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
