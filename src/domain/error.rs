//! Domain error types.

/// Top-level error type for stratbench.
#[derive(Debug, thiserror::Error)]
pub enum StratbenchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to fetch bars for {ticker}: {reason}")]
    DataFetch { ticker: String, reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("invalid bar series for {ticker}: {reason}")]
    InvalidSeries { ticker: String, reason: String },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("failed to render report: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratbenchError> for std::process::ExitCode {
    fn from(err: &StratbenchError) -> Self {
        let code: u8 = match err {
            StratbenchError::Io(_) | StratbenchError::Report { .. } => 1,
            StratbenchError::ConfigParse { .. }
            | StratbenchError::ConfigMissing { .. }
            | StratbenchError::ConfigInvalid { .. } => 2,
            StratbenchError::DataFetch { .. } | StratbenchError::InvalidSeries { .. } => 3,
            StratbenchError::UnknownStrategy { .. } => 4,
            StratbenchError::NoData { .. } | StratbenchError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

/// A fault raised inside a single strategy evaluation.
///
/// The backtest engine downgrades these to a hold for the offending bar; the
/// evaluator skips a strategy whose parameters fail validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error("invalid price {price} at bar {index}")]
    InvalidPrice { price: f64, index: usize },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Arithmetic faults in oscillator math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("division undefined: window range is zero")]
    DivisionUndefined,
}
