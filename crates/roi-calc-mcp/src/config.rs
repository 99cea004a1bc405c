use roi_calc_core::{Market, ParseMarketError};
use roi_calc_report::{NumberStyle, ParseNumberStyleError, ReportOptions};
use thiserror::Error;

pub const ENV_MARKET: &str = "ROI_CALC_MARKET";
pub const ENV_NUMBER_STYLE: &str = "ROI_CALC_NUMBER_STYLE";
pub const ENV_CURRENCY: &str = "ROI_CALC_CURRENCY";
pub const ENV_TRANSPORT: &str = "ROI_CALC_TRANSPORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid ROI_CALC_MARKET: {0}")]
    Market(#[from] ParseMarketError),

    #[error("invalid ROI_CALC_NUMBER_STYLE: {0}")]
    NumberStyle(#[from] ParseNumberStyleError),

    #[error("ROI_CALC_TRANSPORT must be stdio, got '{0}'")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerConfig {
    /// Constant set used when a call does not name one.
    pub market: Market,
    pub report: ReportOptions,
    pub transport: Transport,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key/value source. Values are trimmed and
    /// empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let market = match value(ENV_MARKET) {
            Some(v) => v.parse::<Market>()?,
            None => Market::default(),
        };
        let style = match value(ENV_NUMBER_STYLE) {
            Some(v) => v.parse::<NumberStyle>()?,
            None => NumberStyle::default(),
        };
        let currency_symbol =
            value(ENV_CURRENCY).unwrap_or_else(|| ReportOptions::default().currency_symbol);
        let transport = match value(ENV_TRANSPORT) {
            None => Transport::Stdio,
            Some(v) if v.eq_ignore_ascii_case("stdio") => Transport::Stdio,
            Some(v) => return Err(ConfigError::Transport(v)),
        };

        Ok(Self {
            market,
            report: ReportOptions {
                style,
                currency_symbol,
            },
            transport,
        })
    }
}
