use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("no panels found in markup document")]
    NoPanels,
    #[error("panel {index} has no heading text")]
    MissingHeading { index: usize },
    #[error("panel '{heading}' has no content division")]
    MissingContent { heading: String },
    #[error("panel '{heading}' contained no lines")]
    EmptyPanel { heading: String },
    #[error("annotation in section '{heading}' appears before any entry: {text}")]
    OrphanAnnotation { heading: String, text: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("section marker '{marker}' not found in layout text")]
    MissingMarker { marker: String },
    #[error("no entries could be parsed after section marker '{marker}'")]
    NoEntries { marker: String },
}
