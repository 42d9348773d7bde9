#![allow(clippy::panic_in_result_fn)]

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::NamedTempFile;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("sparexpr")?)
}

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::starts_with("Sparexpr"));
    Ok(())
}

#[test]
fn cli_eval_builtin() -> Result<()> {
    cli_command()?
        .args(["eval", "--function", "strlen", "\"Washington\""])
        .assert()
        .success()
        .stdout("\"10\"^^<http://www.w3.org/2001/XMLSchema#integer>\n");
    Ok(())
}

#[test]
fn cli_eval_gcdistance() -> Result<()> {
    cli_command()?
        .args([
            "eval",
            "--function",
            "http://kasei.us/code/rdf-query/functions/gcdistance",
            "--bind",
            "lat=38.898",
            "?lat",
            "-77.037",
            "38.897",
            "-77.036",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("\"0.14")
                .and(predicate::str::ends_with(
                    "\"^^<http://www.w3.org/2001/XMLSchema#float>\n",
                )),
        );
    Ok(())
}

#[test]
fn cli_eval_extension_function_by_short_name() -> Result<()> {
    cli_command()?
        .args([
            "eval", "--function", "gcdistance", "38.898", "-77.037", "38.897", "-77.036",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\"0.14"));
    Ok(())
}

#[test]
fn cli_eval_unbound_variable() -> Result<()> {
    cli_command()?
        .args(["eval", "--function", "STR", "?missing"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("The variable ?missing is not bound"));
    Ok(())
}

#[test]
fn cli_eval_unknown_function() -> Result<()> {
    cli_command()?
        .args(["eval", "--function", "http://example.com/nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not registered"));
    Ok(())
}

#[test]
fn cli_eval_filter() -> Result<()> {
    cli_command()?
        .args(["eval", "--filter", "--function", "STR", "_:b"])
        .assert()
        .success()
        .stdout("false\n");
    cli_command()?
        .args(["eval", "--filter", "--function", "xsd:boolean", "\"1\""])
        .assert()
        .success()
        .stdout("true\n");
    Ok(())
}

#[test]
fn cli_eval_bindings_file() -> Result<()> {
    let file = NamedTempFile::new("bindings.srj")?;
    file.write_str(
        r#"{
            "head": {"vars": ["city"]},
            "results": {"bindings": [
                {"city": {"type": "literal", "value": "Paris"}},
                {"city": {"type": "literal", "value": "Washington", "xml:lang": "en"}}
            ]}
        }"#,
    )?;
    cli_command()?
        .args(["eval", "--function", "UCASE", "?city", "--bindings"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("\"PARIS\"\n\"WASHINGTON\"@en\n");
    Ok(())
}

#[test]
fn cli_eval_conflicting_bindings() -> Result<()> {
    let file = NamedTempFile::new("bindings.srj")?;
    file.write_str(
        r#"{"results": {"bindings": [{"city": {"type": "literal", "value": "Paris"}}]}}"#,
    )?;
    cli_command()?
        .args(["eval", "--function", "UCASE", "?city", "--bind", "city=\"Rome\"", "--bindings"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicts"));
    Ok(())
}

#[test]
fn cli_functions() -> Result<()> {
    cli_command()?
        .arg("functions")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("STRLEN(term)\n").and(predicate::str::contains(
                "<http://kasei.us/code/rdf-query/functions/gcdistance>(numeric, numeric, numeric, numeric)\n",
            )),
        );
    Ok(())
}

#[test]
fn cli_verbose_traces_on_stderr() -> Result<()> {
    cli_command()?
        .args(["--verbose", "eval", "--function", "LCASE", "\"A\""])
        .assert()
        .success()
        .stdout("\"a\"\n")
        .stderr(
            predicate::str::contains("function returned")
                .and(predicate::str::contains("evaluating LCASE(\"A\")")),
        );
    Ok(())
}
