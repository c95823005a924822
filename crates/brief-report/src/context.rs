//! Shared provider context for the report commands
//!
//! One context carries every provider client a command may need. Tushare is
//! always present; the fundamentals and news clients are optional, and
//! recipes that need a missing one answer with a fixed sentinel line instead
//! of failing at startup.

use crate::error::Result;
use brief_data::{
    EastmoneyClient, EastmoneyConfig, HithinkClient, HithinkConfig, TushareClient, TushareConfig,
};

/// Configuration for a report context
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Tushare settings; always required
    pub tushare: TushareConfig,

    /// Fundamentals settings; `None` disables profile and indicator reports
    pub hithink: Option<HithinkConfig>,

    /// News settings; `None` disables the news briefing
    pub eastmoney: Option<EastmoneyConfig>,
}

impl ReportConfig {
    /// Create a config with all providers enabled at their defaults
    pub fn new(tushare: TushareConfig) -> Self {
        Self {
            tushare,
            hithink: Some(HithinkConfig::new()),
            eastmoney: Some(EastmoneyConfig::new()),
        }
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            tushare: TushareConfig::from_env()?,
            hithink: Some(HithinkConfig::from_env()),
            eastmoney: Some(EastmoneyConfig::from_env()),
        })
    }

    /// Override the fundamentals settings
    pub fn with_hithink(mut self, hithink: HithinkConfig) -> Self {
        self.hithink = Some(hithink);
        self
    }

    /// Override the news settings
    pub fn with_eastmoney(mut self, eastmoney: EastmoneyConfig) -> Self {
        self.eastmoney = Some(eastmoney);
        self
    }

    /// Disable the fundamentals provider
    pub fn without_hithink(mut self) -> Self {
        self.hithink = None;
        self
    }

    /// Disable the news provider
    pub fn without_eastmoney(mut self) -> Self {
        self.eastmoney = None;
        self
    }
}

/// Provider clients shared by the report recipes
pub struct ReportContext {
    tushare: TushareClient,
    hithink: Option<HithinkClient>,
    eastmoney: Option<EastmoneyClient>,
}

impl ReportContext {
    /// Build all configured clients
    pub fn with_config(config: ReportConfig) -> Result<Self> {
        Ok(Self {
            tushare: TushareClient::with_config(config.tushare)?,
            hithink: config.hithink.map(HithinkClient::with_config).transpose()?,
            eastmoney: config
                .eastmoney
                .map(EastmoneyClient::with_config)
                .transpose()?,
        })
    }

    /// Build a context from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(ReportConfig::from_env()?)
    }

    /// The Tushare client
    pub fn tushare(&self) -> &TushareClient {
        &self.tushare
    }

    /// The fundamentals client, when configured
    pub fn hithink(&self) -> Option<&HithinkClient> {
        self.hithink.as_ref()
    }

    /// The news client, when configured
    pub fn eastmoney(&self) -> Option<&EastmoneyClient> {
        self.eastmoney.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_enables_all_providers() {
        let config = ReportConfig::new(TushareConfig::new("test-token"));
        assert!(config.hithink.is_some());
        assert!(config.eastmoney.is_some());

        let context = ReportContext::with_config(config).unwrap();
        assert!(context.hithink().is_some());
        assert!(context.eastmoney().is_some());
    }

    #[test]
    fn test_disabled_providers_stay_disabled() {
        let config = ReportConfig::new(TushareConfig::new("test-token"))
            .without_hithink()
            .without_eastmoney();
        let context = ReportContext::with_config(config).unwrap();
        assert!(context.hithink().is_none());
        assert!(context.eastmoney().is_none());
    }
}
