use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Margin and commission figures used to derive an item price from its
/// cost and expense when no personalized item price exists.
#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub service_margin: Decimal,
    pub product_margin: Decimal,
    pub sales_commission: Decimal,
    pub markup: Decimal,
}

#[derive(Clone, Debug)]
pub struct PackageSettings {
    pub allow_recalc: bool,
    pub rounding: RoundingMode,
}

/// Whether package prices leave the engine as computed or charm-rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    Exact,
    Charm,
}

#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    pub pricing: PricingConfig,
    pub package: PackageSettings,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("could not parse config: {0}")]
    Parse(toml::de::Error),
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            service_margin: Decimal::new(30, 2),
            product_margin: Decimal::new(25, 2),
            sales_commission: Decimal::new(10, 2),
            markup: Decimal::ZERO,
        }
    }
}

impl Default for PackageSettings {
    fn default() -> Self {
        // legacy host behavior: recalculation on, prices charm-rounded
        Self { allow_recalc: true, rounding: RoundingMode::Charm }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "charm" => Ok(Self::Charm),
            other => Err(ConfigError::Validation(format!(
                "unsupported rounding mode `{other}` (expected exact|charm)"
            ))),
        }
    }
}

impl EngineConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("revela-pricing.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let patch = toml::from_str::<EngineConfigPatch>(raw).map_err(ConfigError::Parse)?;
        let mut config = Self::default();
        config.apply_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn apply_patch(&mut self, patch: EngineConfigPatch) {
        if let Some(pricing) = patch.pricing {
            if let Some(service_margin) = pricing.service_margin {
                self.pricing.service_margin = service_margin;
            }
            if let Some(product_margin) = pricing.product_margin {
                self.pricing.product_margin = product_margin;
            }
            if let Some(sales_commission) = pricing.sales_commission {
                self.pricing.sales_commission = sales_commission;
            }
            if let Some(markup) = pricing.markup {
                self.pricing.markup = markup;
            }
        }

        if let Some(package) = patch.package {
            if let Some(allow_recalc) = package.allow_recalc {
                self.package.allow_recalc = allow_recalc;
            }
            if let Some(rounding) = package.rounding {
                self.package.rounding = rounding;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_margin("pricing.service_margin", self.pricing.service_margin)?;
        validate_margin("pricing.product_margin", self.pricing.product_margin)?;

        if self.pricing.sales_commission < Decimal::ZERO {
            return Err(ConfigError::Validation(
                "pricing.sales_commission must not be negative".to_string(),
            ));
        }
        if self.pricing.markup < Decimal::ZERO {
            return Err(ConfigError::Validation(
                "pricing.markup must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_margin(field: &str, margin: Decimal) -> Result<(), ConfigError> {
    if margin < Decimal::ZERO || margin >= Decimal::ONE {
        return Err(ConfigError::Validation(format!(
            "{field} must be at least 0 and below 1 (a fraction of the price, not a percent)"
        )));
    }
    Ok(())
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("revela-pricing.toml"), PathBuf::from("config/revela-pricing.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<EngineConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<EngineConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[derive(Debug, Default, Deserialize)]
struct EngineConfigPatch {
    pricing: Option<PricingPatch>,
    package: Option<PackagePatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    service_margin: Option<Decimal>,
    product_margin: Option<Decimal>,
    sales_commission: Option<Decimal>,
    markup: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct PackagePatch {
    allow_recalc: Option<bool>,
    rounding: Option<RoundingMode>,
}
