use assert_cmd::Command;
use predicates::prelude::*;

fn rtk_codegen() -> Command {
    let mut cmd = Command::cargo_bin("rtk-codegen").unwrap();
    cmd.env_remove("RTK_CODEGEN_EXPORT_NAME")
        .env_remove("RTK_CODEGEN_HOOKS")
        .env_remove("RTK_CODEGEN_BASE_URL");
    cmd
}

#[test]
fn config_show_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    rtk_codegen()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved settings:"))
        .stdout(predicate::str::contains("export_name: api <- default"))
        .stdout(predicate::str::contains("hooks: false <- default"))
        .stdout(predicate::str::contains("arg_suffix: ApiArg <- default"))
        .stdout(predicate::str::contains("response_suffix: ApiResponse <- default"))
        .stdout(predicate::str::contains("create_api_import_path: base <- default"));
}

#[test]
fn config_show_project_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join(".rtk-codegen.toml"),
        "export_name = \"petApi\"\nhooks = true\n",
    )
    .unwrap();

    rtk_codegen()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(".rtk-codegen.toml"))
        .stdout(predicate::str::contains("export_name: petApi <- project config ("))
        .stdout(predicate::str::contains("hooks: true <- project config ("));
}

#[test]
fn config_show_env_var() {
    let tmp = tempfile::tempdir().unwrap();
    rtk_codegen()
        .env("RTK_CODEGEN_HOOKS", "true")
        .env("RTK_CODEGEN_BASE_URL", "/api")
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("hooks: true <- env var (RTK_CODEGEN_HOOKS)"))
        .stdout(predicate::str::contains("base_url: /api <- env var (RTK_CODEGEN_BASE_URL)"));
}

#[test]
fn config_show_explicit_file() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("codegen.toml"), "reducer_path = \"pets\"\n").unwrap();

    rtk_codegen()
        .args([
            "config",
            "show",
            "--path",
            tmp.path().to_str().unwrap(),
            "--config",
            "codegen.toml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("reducer_path: pets <- project config ("));
}

#[test]
fn invalid_config_fails() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".rtk-codegen.toml"), "hooks = [").unwrap();

    rtk_codegen()
        .args(["config", "show", "--path", tmp.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project config"));
}
