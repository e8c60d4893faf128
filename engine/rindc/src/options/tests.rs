#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use super::*;
use pretty_assertions::assert_eq;

fn parse(args: &[&str]) -> Result<CommandOptions, CliError> {
    let args: Vec<String> = args.iter().map(|&a| a.to_owned()).collect();
    CommandOptions::parse(&args)
}

#[test]
fn defaults_without_flags() {
    let options = parse(&["file.rb"]).unwrap();
    assert_eq!(options.config, IndentConfig::default());
    assert_eq!(options.count, 1);
    assert_eq!(options.positional, vec!["file.rb".to_owned()]);
}

#[test]
fn config_flags() {
    let options = parse(&[
        "--indent=4",
        "--tabs",
        "--tab-width=4",
        "--simple-nav",
        "a.rb",
        "--paren=off",
        "--brace=unit",
    ])
    .unwrap();
    let config = options.config;
    assert_eq!(config.indent_unit, 4);
    assert_eq!(config.tab_width, 4);
    assert!(config.use_tabs);
    assert!(!config.advanced_navigation);
    assert_eq!(config.deep_indent.get(Bracket::Paren), None);
    assert_eq!(
        config.deep_indent.get(Bracket::Curly),
        Some(DeepIndent::IndentUnit)
    );
    assert_eq!(
        config.deep_indent.get(Bracket::Square),
        Some(DeepIndent::Space)
    );
}

#[test]
fn command_flags() {
    let options = parse(&["a.rb", "3", "--backward", "--count=2", "--write"]).unwrap();
    assert!(options.backward);
    assert!(options.write);
    assert_eq!(options.count, 2);
    assert_eq!(options.line(1).unwrap(), 2);
}

#[test]
fn resume_flags() {
    let policy = |arg: &str| parse(&[arg]).unwrap().config.resume;
    assert_eq!(policy("--resume=start"), ResumePolicy::BufferStart);
    assert_eq!(policy("--resume=statement"), ResumePolicy::default());
    assert_eq!(
        policy("--resume=statement:50"),
        ResumePolicy::StatementStart {
            max_lines: Some(50),
            verify: true
        }
    );
}

// === Errors ===

#[test]
fn unknown_flags_are_usage_errors() {
    assert!(matches!(parse(&["--frobnicate"]), Err(CliError::Usage(_))));
    assert!(matches!(parse(&["--color=red"]), Err(CliError::Usage(_))));
    assert!(matches!(parse(&["--resume=never"]), Err(CliError::Usage(_))));
    assert!(matches!(parse(&["--indent=two"]), Err(CliError::Usage(_))));
}

#[test]
fn bad_style_and_zero_widths() {
    assert!(matches!(parse(&["--paren=wide"]), Err(CliError::Style(_))));
    assert!(matches!(parse(&["--indent=0"]), Err(CliError::Config(_))));
}

#[test]
fn line_numbers_are_one_based() {
    let options = parse(&["a.rb", "0", "x"]).unwrap();
    assert!(matches!(options.line(1), Err(CliError::Usage(_))));
    assert!(matches!(options.line(2), Err(CliError::Usage(_))));
    assert!(matches!(options.line(3), Err(CliError::Usage(_))));
    assert_eq!(options.positional(0, "file").unwrap(), "a.rb");
}
