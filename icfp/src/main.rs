use std::{io::Read, path::PathBuf};

use anyhow::{anyhow, Result};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use icfp::{codec, parser, prelude::Span, programs, Error};
use num_bigint::BigInt;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use util::repl::{self, ReplConfig};

fn build_report(e: &Error, span: Span) -> Report<Span> {
    let report = Report::build(ReportKind::Error, (), span.start).with_message(e);
    match e {
        Error::OutOfAlphabet { found, .. } => report.with_label(
            Label::new(span)
                .with_message(format!(
                    "{} has no place in the wire alphabet",
                    format!("{found:?}").fg(Color::Red)
                ))
                .with_color(Color::Red),
        ),
        Error::MalformedProgram { reason, .. } => report.with_label(
            Label::new(span)
                .with_message(format!("{}", reason.fg(Color::Red)))
                .with_color(Color::Red),
        ),
        Error::NegativeIntegerUnsupported(_) | Error::EmptyInteger => report,
    }
    .finish()
}

/// Prints `e`, annotated against `input` when it points into it.
fn report_error(input: &str, e: &anyhow::Error) -> Result<()> {
    let len = input.chars().count();
    let located = e
        .downcast_ref::<Error>()
        .and_then(|e| e.span().map(|span| (e, span)))
        .filter(|_| len > 0);
    match located {
        Some((e, span)) => {
            // Point at the last character when the program ended early.
            let span = if span.start >= len {
                len - 1..len
            } else {
                span.start..span.end.max(span.start + 1).min(len)
            };
            build_report(e, span).eprint(Source::from(input))?;
        }
        None => eprintln!("Error: {e:#}"),
    }
    Ok(())
}

fn tokenize(input: &str) -> Result<String> {
    let tokens = parser::tokenize(input)?
        .into_iter()
        .map(|token| token.forget_span())
        .collect::<Vec<_>>();
    Ok(format!("{tokens:?}"))
}

fn pretty(input: &str) -> Result<String> {
    Ok(icfp::parse_wire(input)?.to_string())
}

fn canonical_wire(input: &str) -> Result<String> {
    Ok(icfp::term_to_wire(&icfp::parse_wire(input)?)?)
}

fn encode(input: &str) -> Result<String> {
    Ok(codec::encode_text(input)?)
}

fn decode(input: &str) -> Result<String> {
    Ok(codec::decode_text(input)?)
}

fn encode_int(input: &str) -> Result<String> {
    let n = input
        .parse::<BigInt>()
        .map_err(|e| anyhow!("`{input}` is not a decimal integer: {e}"))?;
    Ok(codec::encode_integer(&n)?)
}

fn decode_int(input: &str) -> Result<String> {
    Ok(codec::decode_integer(input)?.to_string())
}

fn compile(input: &str) -> Result<String> {
    let program = programs::by_name(input).ok_or_else(|| {
        anyhow!(
            "Unknown program `{input}`, expected one of {}",
            programs::NAMES.join(", ")
        )
    })?;
    Ok(icfp::term_to_wire(&program)?)
}

/// Resolves a command name or its abbreviation. Text passed to `encode` keeps its
/// surrounding whitespace; every other command trims its input.
fn lookup_command(cmd: &str) -> Option<(fn(&str) -> Result<String>, bool)> {
    Some(match cmd {
        "to" | "tokenize" => (tokenize as fn(&str) -> Result<String>, true),
        "" | "p" | "parse" | "pretty" => (pretty, true),
        "w" | "wire" => (canonical_wire, true),
        "en" | "encode" => (encode, false),
        "de" | "decode" => (decode, true),
        "ei" | "encode-int" => (encode_int, true),
        "di" | "decode-int" => (decode_int, true),
        "c" | "compile" => (compile, true),
        _ => return None,
    })
}

type CommandResult<'a> = Result<(), (&'a str, anyhow::Error)>;

fn run<'i>(
    handler: fn(&str) -> Result<String>,
    trim: bool,
    input: &'i str,
) -> CommandResult<'i> {
    let input = if trim { input.trim() } else { input };
    let output = handler(input).map_err(|e| (input, e))?;
    println!("{output}");
    Ok(())
}

struct Repl;
impl Repl {
    fn show_help() {
        println!(
            "{}",
            r#"
wire                -- same as :parse wire
:tokenize   wire    -- show decoded tokens
:parse      wire    -- show the parsed term
:wire       wire    -- re-emit the program in canonical wire form
:encode     text    -- encode text as a string token body
:decode     body    -- decode a string token body
:encode-int n       -- encode a decimal integer as base-94 digits
:decode-int body    -- decode base-94 digits to decimal
:compile    name    -- emit a built-in program (repeat, factorial, spiral, lambdaman8)
:help               -- show this message
        "#
            .trim()
        );
    }

    fn handle_repl_input<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let (cmd, input) = if let Some(stripped) = input.strip_prefix(':') {
            stripped
                .trim_start()
                .split_once(' ')
                .unwrap_or((stripped.trim_start(), ""))
        } else {
            ("", input)
        };
        match cmd {
            "h" | "he" | "hel" | "help" => Self::show_help(),
            _ => match lookup_command(cmd) {
                Some((handler, trim)) => run(handler, trim, input)?,
                None => {
                    eprintln!("Unknown command {cmd}");
                    Self::show_help();
                }
            },
        }
        Ok(())
    }
}
impl repl::Repl for Repl {
    type Error = anyhow::Error;
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Ok(());
        }
        if let Err((input, e)) = self.handle_repl_input(&input) {
            report_error(input, &e)?;
        }
        Ok(())
    }
}

#[derive(Parser)]
#[command(name = "icfp")]
#[command(about = "Encode, decode and inspect programs in the ICFP wire format")]
struct Cli {
    /// File the REPL loads and saves its history in
    #[arg(long, default_value = "/tmp/icfp.history")]
    history: PathBuf,

    /// Do not read or write REPL history
    #[arg(long)]
    no_history: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Pretty-print a wire program
    Pretty { input: Option<String> },
    /// Show the decoded tokens of a wire program
    Tokens { input: Option<String> },
    /// Re-emit a wire program in canonical form
    Wire { input: Option<String> },
    /// Encode text as a string token body
    Encode { input: Option<String> },
    /// Decode a string token body
    Decode { input: Option<String> },
    /// Encode a decimal integer as base-94 digits
    EncodeInt { input: Option<String> },
    /// Decode base-94 digits to decimal
    DecodeInt { input: Option<String> },
    /// Emit a built-in program in wire form
    Compile { program: String },
}

impl Command {
    fn split(self) -> (&'static str, Option<String>) {
        match self {
            Command::Pretty { input } => ("pretty", input),
            Command::Tokens { input } => ("tokenize", input),
            Command::Wire { input } => ("wire", input),
            Command::Encode { input } => ("encode", input),
            Command::Decode { input } => ("decode", input),
            Command::EncodeInt { input } => ("encode-int", input),
            Command::DecodeInt { input } => ("decode-int", input),
            Command::Compile { program } => ("compile", Some(program)),
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().lock().read_to_string(&mut input)?;
    if input.ends_with('\n') {
        input.pop();
    }
    Ok(input)
}

fn one_shot(subcommand: Command) -> Result<()> {
    let (cmd, input) = subcommand.split();
    let input = match input {
        Some(input) => input,
        None => read_stdin()?,
    };
    debug!(cmd, bytes = input.len(), "running one-shot command");
    let (handler, trim) = lookup_command(cmd).ok_or_else(|| anyhow!("no handler for {cmd}"))?;
    if let Err((input, e)) = run(handler, trim, &input) {
        report_error(input, &e)?;
        std::process::exit(1);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("icfp=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Some(command) = cli.command {
        return one_shot(command);
    }
    let config = ReplConfig {
        history: (!cli.no_history).then_some(cli.history),
        ..ReplConfig::default()
    };
    println!("Hi, this is an ICFP wire-format REPL. :h to show help");
    println!();
    repl::start_repl(&config, Repl)?;
    Ok(())
}
