//! Command definitions: declared positional parameters and named options
//!
//! Definitions are plain immutable data. Commands produce them through
//! [`CommandDefinition::builder`] or by deserializing a manifest.

use serde::Deserialize;

use crate::domain::value::{Value, ValueType};

/// A positional parameter.
///
/// A parameter without a `default` is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParamDefinition {
    pub name: String,
    #[serde(default, rename = "type")]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub help: String,
}

impl ParamDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: None,
            default: None,
            help: String::new(),
        }
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A named option, addressable as `--name` or through its single-character flag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptionDefinition {
    pub name: String,
    #[serde(default)]
    pub flag: Option<char>,
    #[serde(default)]
    pub required: bool,
    /// Toggles take no value; presence sets them to `true`.
    #[serde(default)]
    pub toggle: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default, rename = "type")]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub help: String,
}

impl OptionDefinition {
    /// A value-taking option.
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: None,
            required: false,
            toggle: false,
            default: None,
            value_type: None,
            help: String::new(),
        }
    }

    /// An option that carries no value.
    pub fn toggle(name: impl Into<String>) -> Self {
        Self {
            toggle: true,
            ..Self::value(name)
        }
    }

    pub fn flag(mut self, flag: char) -> Self {
        self.flag = Some(flag);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Value the options record holds before any token is consumed.
    pub fn initial_value(&self) -> Value {
        if self.toggle {
            Value::Boolean(false)
        } else {
            self.default.clone().unwrap_or_default()
        }
    }
}

/// Everything the binder needs to know about a command.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommandDefinition {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub params: Vec<ParamDefinition>,
    #[serde(default)]
    pub options: Vec<OptionDefinition>,
}

impl CommandDefinition {
    pub fn builder() -> CommandDefinitionBuilder {
        CommandDefinitionBuilder::default()
    }

    /// Number of parameters without a declared default.
    pub fn required_param_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_required()).count()
    }

    pub fn option(&self, name: &str) -> Option<&OptionDefinition> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn option_by_flag(&self, flag: char) -> Option<&OptionDefinition> {
        self.options.iter().find(|o| o.flag == Some(flag))
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CommandDefinitionBuilder {
    definition: CommandDefinition,
}

impl CommandDefinitionBuilder {
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.definition.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.definition.description = description.into();
        self
    }

    pub fn param(mut self, param: ParamDefinition) -> Self {
        self.definition.params.push(param);
        self
    }

    pub fn option(mut self, option: OptionDefinition) -> Self {
        self.definition.options.push(option);
        self
    }

    pub fn build(self) -> CommandDefinition {
        self.definition
    }
}
