//! Token classification and option/parameter binding
//!
//! Tokens are consumed left to right from a queue. A help token anywhere
//! stops processing; everything else is bound into an [`Invocation`].

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::domain::definition::{CommandDefinition, OptionDefinition};
use crate::domain::error::DomainError;
use crate::domain::invocation::Invocation;
use crate::domain::value::coerce;

/// Classification of a single argv token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `-h`, `-?` or `--help`
    Help,
    /// `--name`, with the leading dashes stripped
    Long(&'a str),
    /// `-abc`, with the leading dash stripped
    Flags(&'a str),
    Positional(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(raw: &'a str) -> Self {
        match raw {
            "-h" | "-?" | "--help" => Token::Help,
            _ => {
                if let Some(name) = raw.strip_prefix("--") {
                    Token::Long(name)
                } else if let Some(cluster) = raw.strip_prefix('-') {
                    Token::Flags(cluster)
                } else {
                    Token::Positional(raw)
                }
            }
        }
    }
}

/// Terminal state of binding.
#[derive(Debug, Clone)]
pub enum BindOutcome {
    /// Help was requested; nothing is dispatched.
    Help,
    Bound(Invocation),
}

/// Binds an argv tail against one command's definitions.
pub struct Binder<'d> {
    definition: &'d CommandDefinition,
}

impl<'d> Binder<'d> {
    pub fn new(definition: &'d CommandDefinition) -> Self {
        Self { definition }
    }

    /// Consume `tokens` into a fresh [`Invocation`].
    #[instrument(level = "debug", skip(self))]
    pub fn bind(&self, tokens: &[String]) -> Result<BindOutcome, DomainError> {
        let mut invocation = Invocation::new(self.definition);
        let mut queue: VecDeque<&str> = tokens.iter().map(String::as_str).collect();

        while let Some(raw) = queue.pop_front() {
            match Token::classify(raw) {
                Token::Help => {
                    debug!("help requested");
                    return Ok(BindOutcome::Help);
                }
                Token::Long(name) => self.bind_long(name, &mut queue, &mut invocation)?,
                Token::Flags(cluster) => self.bind_flags(cluster, &mut queue, &mut invocation)?,
                Token::Positional(token) => invocation.bind_positional(self.definition, token),
            }
        }

        Ok(BindOutcome::Bound(invocation))
    }

    fn bind_long(
        &self,
        name: &str,
        queue: &mut VecDeque<&str>,
        invocation: &mut Invocation,
    ) -> Result<(), DomainError> {
        let option = self
            .definition
            .option(name)
            .ok_or_else(|| DomainError::UnknownOptionName(name.to_string()))?;
        self.apply(option, queue, invocation)
    }

    fn bind_flags(
        &self,
        cluster: &str,
        queue: &mut VecDeque<&str>,
        invocation: &mut Invocation,
    ) -> Result<(), DomainError> {
        let mut chars = cluster.chars().peekable();
        while let Some(flag) = chars.next() {
            let option = self
                .definition
                .option_by_flag(flag)
                .ok_or(DomainError::UnknownOptionFlag(flag))?;
            let is_last = chars.peek().is_none();
            if !is_last && !option.toggle {
                return Err(DomainError::NonTerminalFlagTakesValue {
                    flag,
                    option: option.name.clone(),
                });
            }
            self.apply(option, queue, invocation)?;
        }
        Ok(())
    }

    /// Satisfy a required option and store its value, consuming the next
    /// token when the option is not a toggle.
    fn apply(
        &self,
        option: &OptionDefinition,
        queue: &mut VecDeque<&str>,
        invocation: &mut Invocation,
    ) -> Result<(), DomainError> {
        if option.required {
            invocation.satisfy(&option.name);
        }

        let value = if option.toggle {
            true.into()
        } else {
            let raw = match queue.pop_front() {
                None => return Err(DomainError::MissingOptionValue(option.name.clone())),
                Some(raw) if raw.starts_with('-') => {
                    return Err(DomainError::OptionValueLooksLikeOption {
                        option: option.name.clone(),
                        value: raw.to_string(),
                    })
                }
                Some(raw) => raw,
            };
            coerce(raw, option.value_type)
        };

        debug!("option {} = {:?}", option.name, value);
        invocation.set_option(&option.name, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::definition::ParamDefinition;
    use crate::domain::value::{Value, ValueType};
    use rstest::{fixture, rstest};

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[fixture]
    fn definition() -> CommandDefinition {
        CommandDefinition::builder()
            .param(ParamDefinition::new("name").typed(ValueType::String))
            .option(OptionDefinition::toggle("force").flag('f'))
            .option(OptionDefinition::toggle("verbose").flag('v'))
            .option(
                OptionDefinition::value("output")
                    .flag('o')
                    .typed(ValueType::String),
            )
            .option(
                OptionDefinition::value("level")
                    .flag('l')
                    .typed(ValueType::Number)
                    .default_value(1.0),
            )
            .build()
    }

    fn bound(def: &CommandDefinition, tokens: &[&str]) -> Invocation {
        match Binder::new(def).bind(&argv(tokens)).expect("bind") {
            BindOutcome::Bound(inv) => inv,
            BindOutcome::Help => panic!("unexpected help"),
        }
    }

    #[rstest]
    #[case("-h", Token::Help)]
    #[case("-?", Token::Help)]
    #[case("--help", Token::Help)]
    #[case("--force", Token::Long("force"))]
    #[case("-fv", Token::Flags("fv"))]
    #[case("-", Token::Flags(""))]
    #[case("--", Token::Long(""))]
    #[case("-help", Token::Flags("help"))]
    #[case("widget", Token::Positional("widget"))]
    fn test_classify(#[case] raw: &str, #[case] expected: Token<'_>) {
        assert_eq!(Token::classify(raw), expected);
    }

    #[rstest]
    fn given_all_toggle_cluster_when_binding_then_all_true_and_nothing_consumed(
        definition: CommandDefinition,
    ) {
        let inv = bound(&definition, &["-fv", "widget"]);

        assert_eq!(inv.options()["force"], Value::Boolean(true));
        assert_eq!(inv.options()["verbose"], Value::Boolean(true));
        assert_eq!(inv.params(), &[Value::String("widget".into())]);
    }

    #[rstest]
    fn given_cluster_ending_in_value_flag_when_binding_then_next_token_is_value(
        definition: CommandDefinition,
    ) {
        let inv = bound(&definition, &["-fo", "out.txt", "widget"]);

        assert_eq!(inv.options()["force"], Value::Boolean(true));
        assert_eq!(inv.options()["output"], Value::String("out.txt".into()));
        assert_eq!(inv.params(), &[Value::String("widget".into())]);
    }

    #[rstest]
    fn given_value_flag_before_last_when_binding_then_fails(definition: CommandDefinition) {
        let err = Binder::new(&definition)
            .bind(&argv(&["-of", "out.txt"]))
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::NonTerminalFlagTakesValue {
                flag: 'o',
                option: "output".into()
            }
        );
    }

    #[rstest]
    fn given_long_value_option_when_binding_then_value_is_coerced(definition: CommandDefinition) {
        let inv = bound(&definition, &["--level", "5"]);

        assert_eq!(inv.options()["level"], Value::Number(5.0));
    }

    #[rstest]
    fn given_no_tokens_when_binding_then_options_are_seeded(definition: CommandDefinition) {
        let inv = bound(&definition, &[]);

        assert_eq!(inv.options()["force"], Value::Boolean(false));
        assert_eq!(inv.options()["level"], Value::Number(1.0));
        assert_eq!(inv.options()["output"], Value::Undefined);
    }

    #[rstest]
    #[case(&["--nope"], DomainError::UnknownOptionName("nope".into()))]
    #[case(&["-x"], DomainError::UnknownOptionFlag('x'))]
    #[case(&["-fx"], DomainError::UnknownOptionFlag('x'))]
    #[case(&["--output"], DomainError::MissingOptionValue("output".into()))]
    #[case(&["-o"], DomainError::MissingOptionValue("output".into()))]
    #[case(
        &["--output", "-f"],
        DomainError::OptionValueLooksLikeOption { option: "output".into(), value: "-f".into() }
    )]
    #[case(&["--"], DomainError::UnknownOptionName("".into()))]
    fn test_bind_errors(
        definition: CommandDefinition,
        #[case] tokens: &[&str],
        #[case] expected: DomainError,
    ) {
        let err = Binder::new(&definition).bind(&argv(tokens)).unwrap_err();
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(&["--help"])]
    #[case(&["widget", "-h"])]
    #[case(&["-f", "-?", "--nope"])]
    fn given_help_token_when_binding_then_help_short_circuits(
        definition: CommandDefinition,
        #[case] tokens: &[&str],
    ) {
        let outcome = Binder::new(&definition).bind(&argv(tokens)).expect("bind");
        assert!(matches!(outcome, BindOutcome::Help));
    }

    #[test]
    fn given_required_option_via_flag_or_long_when_binding_then_satisfied() {
        let def = CommandDefinition::builder()
            .option(OptionDefinition::value("owner").flag('u').required())
            .build();

        for tokens in [&["-u", "ann"][..], &["--owner", "ann"][..]] {
            let inv = bound(&def, tokens);
            assert!(inv.pending_required().is_empty(), "tokens {tokens:?}");
            // untyped option values coerce to undefined
            assert_eq!(inv.options()["owner"], Value::Undefined);
        }
        assert_eq!(bound(&def, &[]).pending_required(), ["owner"]);
    }

    #[test]
    fn given_lone_dash_when_binding_then_it_is_an_empty_cluster() {
        let def = CommandDefinition::builder()
            .param(ParamDefinition::new("name").typed(ValueType::String))
            .build();

        let inv = bound(&def, &["-"]);

        assert!(inv.params().is_empty());
        assert!(inv.extra().is_empty());
    }
}
