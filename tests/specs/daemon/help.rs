//! mwd flag specs

use crate::prelude::*;

#[test]
fn mwd_version() {
    Workspace::empty()
        .mwd()
        .args(&["--version"])
        .passes()
        .stdout_has("mwd 0.1");
}

#[test]
fn mwd_help_names_environment() {
    Workspace::empty()
        .mwd()
        .args(&["--help"])
        .passes()
        .stdout_has("MW_WORKSPACE")
        .stdout_has("MW_STATE_DIR");
}

#[test]
fn mwd_rejects_unknown_arguments() {
    Workspace::empty()
        .mwd()
        .args(&["--foreground"])
        .fails()
        .stderr_has("unexpected argument '--foreground'");
}
