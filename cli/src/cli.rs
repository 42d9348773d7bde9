use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "sparexpr")]
/// Sparexpr command line evaluator of SPARQL function calls
pub struct Args {
    /// Logs every evaluation step on stderr
    ///
    /// It overrides the RUST_LOG environment variable.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Format of the log messages
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a function call and print its result in N-Triples
    ///
    /// The arguments are N-Triples terms like <http://example.com/> or "foo"@en,
    /// SPARQL shorthands like 12, -77.036 or true, or variables like ?lat.
    Eval {
        /// Name of the function to call
        ///
        /// It can be a built-in function keyword like STRLEN, an IRI,
        /// or a cast like xsd:integer.
        #[arg(short, long)]
        function: String,
        /// Arguments of the function call
        #[arg(allow_negative_numbers = true)]
        args: Vec<String>,
        /// Binds a variable to a term, like lat=38.898
        #[arg(short, long = "bind", value_name = "VAR=TERM")]
        bind: Vec<String>,
        /// File in the SPARQL JSON results format with the binding rows to evaluate against
        ///
        /// The function call is evaluated once per row and one result is printed per line.
        #[arg(long, value_hint = ValueHint::FilePath)]
        bindings: Option<PathBuf>,
        /// Prints the effective boolean value of the result as a FILTER would, evaluation errors being false
        #[arg(long)]
        filter: bool,
    },
    /// List the registered functions with the kinds of their arguments
    Functions,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per line
    Json,
}
