use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum RucolaError {
    #[error("Invalid argument: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(rucola::invalid_argument),
            help("pass a non-empty application name to .app_name() on the builder")
        )
    )]
    InvalidArgument(String),

    #[error("Failed to deserialize merged configuration: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(code(rucola::deserialize))
    )]
    Deserialize(#[from] serde_json::Error),
}
