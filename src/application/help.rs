//! Help text rendering for a command definition

use crate::domain::{CommandDefinition, CommandPath, OptionDefinition, ParamDefinition};

fn param_left(param: &ParamDefinition) -> String {
    if param.is_required() {
        format!("<{}>", param.name)
    } else {
        format!("[{}]", param.name)
    }
}

fn param_right(param: &ParamDefinition) -> String {
    let mut out = param.help.trim().to_string();
    if let Some(default) = &param.default {
        push_note(&mut out, &format!("[default: {default}]"));
    }
    out
}

fn option_left(option: &OptionDefinition) -> String {
    let mut out = match option.flag {
        Some(flag) => format!("-{flag}, --{}", option.name),
        None => format!("    --{}", option.name),
    };
    if !option.toggle {
        let value_name = option
            .value_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "VALUE".to_string());
        out.push_str(&format!(" <{value_name}>"));
    }
    out
}

fn option_right(option: &OptionDefinition) -> String {
    let mut out = option.help.trim().to_string();
    if option.required {
        push_note(&mut out, "(required)");
    }
    if let (false, Some(default)) = (option.toggle, &option.default) {
        push_note(&mut out, &format!("[default: {default}]"));
    }
    out
}

fn push_note(out: &mut String, note: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(note);
}

fn push_table(out: &mut String, title: &str, rows: Vec<(String, String)>) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, right) in rows {
        if right.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {right}\n"));
        }
    }
}

/// Render usage, description, arguments and options for `definition`.
pub fn render(definition: &CommandDefinition, command_path: &CommandPath) -> String {
    let mut usage = vec![command_path.to_string()];
    usage.extend(definition.params.iter().map(param_left));
    if definition.has_options() {
        usage.push("[options]".to_string());
    }

    let mut out = format!("Usage: {}\n", usage.join(" "));
    if !definition.summary.trim().is_empty() {
        out.push_str(&format!("\n{}\n", definition.summary.trim()));
    }
    if !definition.description.trim().is_empty() {
        out.push_str(&format!("\n{}\n", definition.description.trim_end()));
    }

    push_table(
        &mut out,
        "Arguments",
        definition
            .params
            .iter()
            .map(|p| (param_left(p), param_right(p)))
            .collect(),
    );
    push_table(
        &mut out,
        "Options",
        definition
            .options
            .iter()
            .map(|o| (option_left(o), option_right(o)))
            .collect(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueType;

    #[test]
    fn given_params_and_options_when_rendering_then_usage_and_tables_are_listed() {
        let def = CommandDefinition::builder()
            .summary("Create a widget")
            .param(ParamDefinition::new("name").typed(ValueType::String).help("Widget name"))
            .param(ParamDefinition::new("size").default_value(10.0))
            .option(OptionDefinition::toggle("force").flag('f').help("Overwrite"))
            .option(OptionDefinition::value("owner").typed(ValueType::String).required())
            .build();
        let path: CommandPath = ["tool", "create"].into_iter().collect();

        let text = render(&def, &path);

        assert!(text.starts_with("Usage: tool create <name> [size] [options]\n"), "{text}");
        assert!(text.contains("Create a widget"));
        assert!(text.contains("<name>  Widget name"));
        assert!(text.contains("[size]  [default: 10]"));
        assert!(text.contains("-f, --force"));
        assert!(text.contains("--owner <STRING>"));
        assert!(text.contains("(required)"));
    }

    #[test]
    fn given_bare_command_when_rendering_then_only_usage() {
        let text = render(&CommandDefinition::default(), &CommandPath::new("tool"));
        assert_eq!(text, "Usage: tool\n");
    }
}
