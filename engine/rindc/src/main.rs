//! Rind CLI
//!
//! Ruby indentation and block navigation from the command line.

use rindc::commands::{check_file, classify_line, indent_file, move_block, show_column};
use rindc::{init_tracing, CliError, CommandOptions};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let result = match command.as_str() {
        "indent" => run(&args, "rind indent <file.rb> [--write]", indent_file),
        "check" => run(&args, "rind check <file.rb>", |options| {
            if !check_file(options)? {
                std::process::exit(1);
            }
            Ok(())
        }),
        "column" => run(&args, "rind column <file.rb> <line>", show_column),
        "block" => run(
            &args,
            "rind block <file.rb> <line> [--backward] [--count=N]",
            move_block,
        ),
        "classify" => run(&args, "rind classify <file.rb> <line>", classify_line),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-v" => {
            println!("rind {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Parse the arguments after the command and run `handler`, printing the
/// command's usage line on argument errors.
fn run(
    args: &[String],
    usage: &str,
    handler: impl FnOnce(&CommandOptions) -> Result<(), CliError>,
) -> Result<(), CliError> {
    let result = CommandOptions::parse(&args[2..]).and_then(|options| handler(&options));
    if let Err(CliError::Usage(message)) = &result {
        eprintln!("error: {message}");
        eprintln!("Usage: {usage}");
        std::process::exit(1);
    }
    result
}

fn print_usage() {
    println!("Rind: Ruby indentation engine");
    println!();
    println!("Usage: rind <command> [options]");
    println!();
    println!("Commands:");
    println!("  indent <file.rb> [--write]     Reindent a file (prints to stdout)");
    println!("  check <file.rb>                List misindented lines, exit 1 if any");
    println!("  column <file.rb> <line>        Computed column for a line");
    println!("  block <file.rb> <line>         Move to the end of the block");
    println!("  classify <file.rb> <line>      Dump the scan state at a line start");
    println!("  help                           Show this help message");
    println!("  version                        Show version information");
    println!();
    println!("Lines are 1-based.");
    println!();
    println!("Block options:");
    println!("  --backward          Move towards the start of the block");
    println!("  --count=N           Repeat the move N times");
    println!();
    println!("Indentation options:");
    println!("  --indent=N          Columns per nesting level (default: 2)");
    println!("  --tabs              Indent with tabs where whole stops fit");
    println!("  --tab-width=N       Columns per tab stop (default: 8)");
    println!("  --paren=STYLE       Deep indent for ( : aligned, space, indent-unit, off");
    println!("  --bracket=STYLE     Deep indent for [ (default: space)");
    println!("  --brace=STYLE       Deep indent for {{ (default: off)");
    println!("  --simple-nav        Navigate by indentation instead of nesting");
    println!("  --resume=POLICY     start, statement, or statement:N (default: statement)");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=rind_indent=debug     Enable debug output");
    println!("  RIND_LOG_TREE=1                Hierarchical log output");
}
