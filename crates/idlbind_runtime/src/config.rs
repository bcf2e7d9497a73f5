//! Generator configuration.
//!
//! A [`GeneratorConfig`] can be built in code, loaded from a TOML file, or
//! both, with command-line flags applied last.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use idlbind_engine::{MixinCollision, MixinOrder, ResolverPolicy, ValidatorOptions};
use idlbind_foundation::{Error, ErrorKind, Result};

/// Serialization used for the emitted binding model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// `MessagePack` with named fields.
    Msgpack,
    /// Definition text rendered from the model.
    Idl,
}

impl OutputFormat {
    /// Returns the conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Msgpack => "msgpack",
            Self::Idl => "webidl",
        }
    }

    /// Returns true for formats that are not valid UTF-8 text.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Msgpack)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Msgpack => write!(f, "msgpack"),
            Self::Idl => write!(f, "idl"),
        }
    }
}

/// Settings for one generator run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Output serialization.
    pub format: OutputFormat,

    /// Unknown extended attributes are errors instead of warnings.
    pub strict: bool,

    /// Order in which mixins contribute members.
    pub mixin_order: MixinOrder,

    /// How mixin members colliding with inherited ones are handled.
    pub mixin_collision: MixinCollision,

    /// Abort on the first syntax error instead of reporting and continuing.
    pub fail_on_syntax_errors: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            strict: false,
            mixin_order: MixinOrder::Declaration,
            mixin_collision: MixinCollision::KeepInherited,
            fail_on_syntax_errors: false,
        }
    }
}

impl GeneratorConfig {
    /// A configuration that rejects anything questionable.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            mixin_collision: MixinCollision::Reject,
            fail_on_syntax_errors: true,
            ..Self::default()
        }
    }

    /// A configuration that accepts as much as possible.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict: false,
            mixin_collision: MixinCollision::Shadow,
            fail_on_syntax_errors: false,
            ..Self::default()
        }
    }

    /// Loads a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    /// Returns a `Config` error if the text is not a valid configuration.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an `Io` error if the file cannot be read, or a `Config`
    /// error if its contents are invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read '{}': {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    /// Returns a `Serialization` error if encoding fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
    }

    /// Builder method to set the output format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method to enable/disable strict attribute checking.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builder method to set the mixin order.
    #[must_use]
    pub const fn with_mixin_order(mut self, order: MixinOrder) -> Self {
        self.mixin_order = order;
        self
    }

    /// Builder method to set the mixin collision policy.
    #[must_use]
    pub const fn with_mixin_collision(mut self, collision: MixinCollision) -> Self {
        self.mixin_collision = collision;
        self
    }

    /// Builder method to abort on syntax errors.
    #[must_use]
    pub const fn with_fail_on_syntax_errors(mut self, fail: bool) -> Self {
        self.fail_on_syntax_errors = fail;
        self
    }

    /// Returns the resolver policy these settings describe.
    #[must_use]
    pub fn policy(&self) -> ResolverPolicy {
        ResolverPolicy::default()
            .with_mixin_order(self.mixin_order)
            .with_mixin_collision(self.mixin_collision)
    }

    /// Returns the validator options these settings describe.
    #[must_use]
    pub fn validator_options(&self) -> ValidatorOptions {
        ValidatorOptions::default()
            .with_strict(self.strict)
            .with_policy(self.policy())
    }
}
