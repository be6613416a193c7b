use clap::{Args, Parser as ClapParser, Subcommand};
use rule_lang::{
    EngineConfig, ParseMode,
    cli::{self, CheckOptions, CheckResult, CliError, CombineOptions, EvalOptions},
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "rule")]
#[command(about = "Rule - parse, combine and evaluate eligibility rules")]
#[command(version)]
struct Cli {
    /// Log filter directive, e.g. `debug` or `rule_lang=trace` (overrides RULE_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Reject operands that are not part of a comparison (overrides RULE_PARSE_MODE)
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RuleSources {
    /// Rule text; may be repeated
    #[arg(short, long = "rule")]
    rules: Vec<String>,

    /// Rule tree in canonical JSON form; may be repeated
    #[arg(short, long = "ast")]
    asts: Vec<String>,

    /// Operator joining the rules, AND or OR (overrides RULE_COMBINE_OPERATOR)
    #[arg(short, long)]
    operator: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rule and print its canonical tree
    Check {
        /// The rule text
        rule: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't print the tree
        #[arg(long)]
        syntax_only: bool,
    },

    /// Combine rules and print the combined canonical tree
    Combine {
        #[command(flatten)]
        sources: RuleSources,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Evaluate a JSON record against the combined rules
    Eval {
        #[command(flatten)]
        sources: RuleSources,

        /// JSON record (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(EngineConfig::log_level_from_env);
    init_tracing(&log_level);

    let config = EngineConfig::from_env();

    let strict = cli.strict || config.parse_mode == ParseMode::Strict;
    let default_operator = config.combine_operator.to_string();

    let result = match cli.command {
        Commands::Check {
            rule,
            pretty,
            syntax_only,
        } => run_check(rule, pretty, syntax_only, strict),
        Commands::Combine { sources, pretty } => {
            let options = CombineOptions {
                rules: sources.rules,
                asts: sources.asts,
                operator: sources.operator.unwrap_or(default_operator),
                strict,
            };
            cli::execute_combine(&options).and_then(|tree| print_json(&tree, pretty))
        }
        Commands::Eval { sources, input } => run_eval(sources, input, default_operator, strict),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|e| {
        eprintln!("invalid log level filter '{log_level}': {e}; using 'info'");
        EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }?;
    println!("{}", json);
    Ok(())
}

fn run_check(rule: String, pretty: bool, syntax_only: bool, strict: bool) -> Result<(), CliError> {
    let options = CheckOptions {
        rule,
        strict,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Ast(tree) => print_json(&tree, pretty)?,
    }
    Ok(())
}

fn run_eval(
    sources: RuleSources,
    input: Option<String>,
    default_operator: String,
    strict: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = EvalOptions {
        rules: sources.rules,
        asts: sources.asts,
        operator: sources.operator.unwrap_or(default_operator),
        input,
        strict,
    };

    let output = cli::execute_eval(&options)?;
    print_json(&output, false)
}
