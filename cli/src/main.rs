use crate::bindings::read_sparql_json_bindings;
use crate::cli::{Args, Command, LogFormat};
use anyhow::{Context, Result, bail};
use clap::Parser;
use sparexpr::{
    BindingRow, Expression, ExpressionEvaluator, FunctionName, FunctionRegistry, TracingSink,
};
use sparterm::{Term, Variable};
use std::fs::File;
use std::io::{BufReader, Write, stdout};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod bindings;
mod cli;

pub fn main() -> Result<()> {
    let matches = Args::parse();
    init_logging(matches.verbose, matches.log_format)?;
    let registry = Arc::new(function_registry());
    match matches.command {
        Command::Eval {
            function,
            args,
            bind,
            bindings,
            filter,
        } => {
            let name = resolve_function_name(&registry, &function)?;
            let expression = Expression::call(
                name,
                args.iter()
                    .map(|arg| parse_argument(arg))
                    .collect::<Result<Vec<_>>>()?,
            );
            let row = bind
                .iter()
                .map(|binding| parse_binding(binding))
                .collect::<Result<BindingRow>>()?;
            let rows = if let Some(file) = bindings {
                let reader = BufReader::new(
                    File::open(&file)
                        .with_context(|| format!("Failed to open {}", file.display()))?,
                );
                let rows = read_sparql_json_bindings(reader)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                rows.into_iter()
                    .map(|solution| {
                        solution.merge(&row).with_context(|| {
                            format!("The binding row {solution} conflicts with {row}")
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            } else {
                vec![row]
            };
            let evaluator =
                ExpressionEvaluator::new(registry).with_trace_sink(Arc::new(TracingSink));
            let mut stdout = stdout().lock();
            for (index, row) in rows.iter().enumerate() {
                tracing::debug!(index, %row, "evaluating {expression}");
                if filter {
                    writeln!(stdout, "{}", evaluator.evaluate_filter(&expression, row))?;
                } else {
                    let result = evaluator
                        .evaluate(&expression, row)
                        .with_context(|| format!("Failed to evaluate {expression} on {row}"))?;
                    writeln!(stdout, "{result}")?;
                }
            }
            stdout.flush()?;
            Ok(())
        }
        Command::Functions => {
            let mut functions = registry
                .iter()
                .map(|(name, function)| format!("{name}{}", function.signature()))
                .collect::<Vec<_>>();
            functions.sort();
            let mut stdout = stdout().lock();
            for function in functions {
                writeln!(stdout, "{function}")?;
            }
            stdout.flush()?;
            Ok(())
        }
    }
}

fn function_registry() -> FunctionRegistry {
    let registry = FunctionRegistry::with_builtins();
    #[cfg(feature = "geo")]
    let registry = spargcd::register_geo_functions(registry);
    registry
}

/// Parses the function name given on the command line.
///
/// A bare keyword that is not a built-in function also names the registered extension function
/// whose IRI ends with it, for example `gcdistance`.
fn resolve_function_name(registry: &FunctionRegistry, function: &str) -> Result<FunctionName> {
    let name = FunctionName::from_str(function)?;
    let FunctionName::Builtin(keyword) = &name else {
        return Ok(name);
    };
    if registry.contains(&name) {
        return Ok(name);
    }
    let mut candidates = registry.iter().filter_map(|(candidate, _)| {
        let FunctionName::Custom(iri) = candidate else {
            return None;
        };
        let local_name = iri.as_str().rsplit(['/', '#']).next()?;
        local_name.eq_ignore_ascii_case(keyword).then_some(candidate)
    });
    match (candidates.next(), candidates.next()) {
        (Some(candidate), None) => Ok(candidate.clone()),
        (Some(first), Some(second)) => {
            bail!("The function name {function} is ambiguous, it matches {first} and {second}")
        }
        (None, _) => Ok(name),
    }
}

fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

fn parse_argument(arg: &str) -> Result<Expression> {
    if arg.starts_with(['?', '$']) {
        return Ok(Variable::from_str(arg)
            .with_context(|| format!("Invalid variable {arg}"))?
            .into());
    }
    Ok(Term::from_str(arg)
        .with_context(|| format!("Invalid term {arg}"))?
        .into())
}

fn parse_binding(binding: &str) -> Result<(Variable, Term)> {
    let Some((name, term)) = binding.split_once('=') else {
        bail!("Invalid binding {binding}, it should be of the form VAR=TERM");
    };
    let name = name.trim();
    let name = name
        .strip_prefix(['?', '$'])
        .unwrap_or(name);
    let variable =
        Variable::new(name).with_context(|| format!("Invalid variable name {name}"))?;
    let term = Term::from_str(term.trim()).with_context(|| format!("Invalid term {term}"))?;
    Ok((variable, term))
}
