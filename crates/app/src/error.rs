use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("report error: {0}")]
    Report(#[from] report::ReportError),
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        source: crate::script::ParseError,
    },
}
