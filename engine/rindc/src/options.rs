//! Flag parsing shared by every command.

use rind_indent::IndentConfig;
use rind_lexer_core::{Bracket, DeepIndent, ResumePolicy};

use crate::CliError;

/// Parsed arguments after the command name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOptions {
    pub config: IndentConfig,
    /// `--write`: rewrite the file in place.
    pub write: bool,
    /// `--backward`: navigate towards the start of the block.
    pub backward: bool,
    /// `--count=N`: repeat a navigation.
    pub count: u32,
    /// Arguments that are not flags, in order.
    pub positional: Vec<String>,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            config: IndentConfig::default(),
            write: false,
            backward: false,
            count: 1,
            positional: Vec::new(),
        }
    }
}

impl CommandOptions {
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut options = Self::default();
        for arg in args {
            if !arg.starts_with("--") {
                options.positional.push(arg.clone());
                continue;
            }
            options.flag(arg)?;
        }
        options.config.validate()?;
        Ok(options)
    }

    fn flag(&mut self, arg: &str) -> Result<(), CliError> {
        let config = &mut self.config;
        match arg {
            "--write" => self.write = true,
            "--backward" => self.backward = true,
            "--tabs" => config.use_tabs = true,
            "--simple-nav" => config.advanced_navigation = false,
            _ => {
                let Some((name, value)) = arg.split_once('=') else {
                    return Err(CliError::usage(format!("unknown flag '{arg}'")));
                };
                match name {
                    "--indent" => config.indent_unit = parse_number(name, value)?,
                    "--tab-width" => config.tab_width = parse_number(name, value)?,
                    "--count" => self.count = parse_number(name, value)?,
                    "--paren" => set_style(config, Bracket::Paren, value)?,
                    "--bracket" => set_style(config, Bracket::Square, value)?,
                    "--brace" => set_style(config, Bracket::Curly, value)?,
                    "--resume" => config.resume = parse_resume(value)?,
                    _ => return Err(CliError::usage(format!("unknown flag '{name}'"))),
                }
            }
        }
        Ok(())
    }

    /// The positional argument at `index`, named `what` in errors.
    pub fn positional(&self, index: usize, what: &str) -> Result<&str, CliError> {
        self.positional
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CliError::usage(format!("missing {what}")))
    }

    /// A 1-based line number argument, returned 0-based.
    pub fn line(&self, index: usize) -> Result<u32, CliError> {
        let raw = self.positional(index, "line number")?;
        match raw.parse::<u32>() {
            Ok(line) if line > 0 => Ok(line - 1),
            _ => Err(CliError::usage(format!(
                "line number must be a positive integer, got '{raw}'"
            ))),
        }
    }
}

fn parse_number(flag: &str, value: &str) -> Result<u32, CliError> {
    value
        .parse()
        .map_err(|_| CliError::usage(format!("{flag} expects a number, got '{value}'")))
}

fn set_style(config: &mut IndentConfig, bracket: Bracket, value: &str) -> Result<(), CliError> {
    config
        .deep_indent
        .set(bracket, DeepIndent::parse_optional(value)?);
    Ok(())
}

fn parse_resume(value: &str) -> Result<ResumePolicy, CliError> {
    match value.split_once(':') {
        None if value == "start" => Ok(ResumePolicy::BufferStart),
        None if value == "statement" => Ok(ResumePolicy::default()),
        Some(("statement", limit)) => Ok(ResumePolicy::StatementStart {
            max_lines: Some(parse_number("--resume", limit)?),
            verify: true,
        }),
        _ => Err(CliError::usage(format!(
            "--resume expects start, statement or statement:N, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests;
