//! CLI help output specs

use crate::prelude::*;

#[test]
fn mw_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn mw_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("spawn")
        .stdout_has("set-state")
        .stdout_has("trigger")
        .stdout_has("resolve");
}

#[test]
fn mw_spawn_help_shows_model_flag() {
    cli()
        .args(&["spawn", "--help"])
        .passes()
        .stdout_has("--model");
}

#[test]
fn mw_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn mw_unknown_command_fails() {
    cli().args(&["launch"]).fails().stderr_has("unrecognized subcommand");
}
