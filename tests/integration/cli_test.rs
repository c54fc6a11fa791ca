use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

const FIXTURES: &[&str] = &[
    "petstore.yaml",
    "customBaseQuery.ts",
    "customBaseQueryWithoutDefault.ts",
    "tsconfig.json",
];

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A scratch directory holding a copy of the fixtures.
fn workspace() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    for name in FIXTURES {
        std::fs::copy(fixture_path(name), tmp.path().join(name)).unwrap();
    }
    tmp
}

fn rtk_codegen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rtk-codegen").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn generated(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("out/api.ts")).unwrap()
}

#[test]
fn prints_to_stdout_without_file() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args(["generate", "petstore.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import { createApi, fetchBaseQuery } from '@reduxjs/toolkit/query';",
        ))
        .stdout(predicate::str::contains("export const api = createApi({"))
        .stdout(predicate::str::contains(
            "baseQuery: fetchBaseQuery({ baseUrl: '/api/v3' }),",
        ))
        .stdout(predicate::str::contains(
            "getPetById: build.query<GetPetByIdApiResponse, GetPetByIdApiArg>({",
        ))
        .stdout(predicate::str::contains(
            "query: (queryArg) => ({ url: `/pet/${queryArg.petId}` }),",
        ))
        .stdout(predicate::str::contains(
            "export type GetPetByIdApiResponse = Pet;",
        ))
        .stdout(predicate::str::contains(
            "export type FindPetsByStatusApiResponse = Pet[];",
        ))
        .stdout(predicate::str::contains("export type Pet = {"));
}

#[test]
fn writes_file_with_hooks() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args(["generate", "--hooks", "-f", "out/api.ts", "petstore.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let output = generated(ws.path());
    assert!(output.starts_with("import { createApi } from '@reduxjs/toolkit/query/react';\n"));
    let expected_hooks = [
        "useGetHealthcheckQuery",
        "useUpdatePetMutation",
        "useAddPetMutation",
        "useFindPetsByStatusQuery",
        "useFindPetsByTagsQuery",
        "useGetPetByIdQuery",
        "useUpdatePetWithFormMutation",
        "useDeletePetMutation",
        "useUploadFileMutation",
        "useGetInventoryQuery",
        "usePlaceOrderMutation",
        "useGetOrderByIdQuery",
        "useDeleteOrderMutation",
        "useCreateUserMutation",
        "useCreateUsersWithListInputMutation",
        "useLoginUserQuery",
        "useLogoutUserQuery",
        "useGetUserByNameQuery",
        "useUpdateUserMutation",
        "useDeleteUserMutation",
    ];
    let hooks_line = output
        .lines()
        .find(|l| l.starts_with("export const {"))
        .unwrap();
    for hook in expected_hooks {
        assert!(hooks_line.contains(hook), "missing {hook}");
    }
    assert!(hooks_line.ends_with("} = api;"));
}

#[test]
fn base_query_file_not_found() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "nonExistantFile.ts",
            "-f",
            "out/api.ts",
            "petstore.yaml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module not found: nonExistantFile.ts"));
    assert!(!ws.path().join("out/api.ts").exists());
}

#[test]
fn base_query_without_default_export() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "customBaseQueryWithoutDefault.ts",
            "petstore.yaml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no default export"));
}

#[test]
fn base_query_named_export_missing() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "customBaseQuery.ts:missingFunctionName",
            "petstore.yaml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not export `missingFunctionName`"));
}

#[test]
fn base_query_named_export() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "customBaseQuery.ts:anotherNamedBaseQuery",
            "-f",
            "out/api.ts",
            "petstore.yaml",
        ])
        .assert()
        .success();

    let output = generated(ws.path());
    assert!(!output.contains("fetchBaseQuery"));
    assert!(output.contains("import { anotherNamedBaseQuery } from '../customBaseQuery';"));
    assert!(output.contains("baseQuery: anotherNamedBaseQuery,"));
}

#[test]
fn base_query_default_export() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "customBaseQuery.ts",
            "-f",
            "out/api.ts",
            "petstore.yaml",
        ])
        .assert()
        .success();

    let output = generated(ws.path());
    assert!(!output.contains("fetchBaseQuery"));
    assert!(output.contains("import { default as customBaseQuery } from '../customBaseQuery';"));
}

#[test]
fn path_alias_not_found() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "@/hoge/fuga/nonExistantFile",
            "-c",
            "tsconfig.json",
            "petstore.yaml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module not found"));
}

#[test]
fn path_alias_is_kept_in_import() {
    for alias in ["@/customBaseQuery", "@/customBaseQuery.ts"] {
        let ws = workspace();
        rtk_codegen(ws.path())
            .args([
                "generate",
                "--base-query",
                &format!("{alias}:anotherNamedBaseQuery"),
                "-c",
                "tsconfig.json",
                "-f",
                "out/api.ts",
                "petstore.yaml",
            ])
            .assert()
            .success();

        let output = generated(ws.path());
        assert!(!output.contains("fetchBaseQuery"));
        assert!(output.contains("import { anotherNamedBaseQuery } from '@/customBaseQuery';"));
    }
}

#[test]
fn missing_tsconfig_fails() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args(["generate", "-c", "missing.json", "petstore.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tsconfig not found"));
}

#[test]
fn fallback_policy_uses_fetch_base_query() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--base-query",
            "nonExistantFile.ts",
            "--base-query-fallback",
            "petstore.yaml",
        ])
        .env("RUST_LOG", "warn")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetchBaseQuery({ baseUrl: '/api/v3' })"))
        .stderr(predicate::str::contains("falling back to fetchBaseQuery"));
}

#[test]
fn filter_and_options() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args([
            "generate",
            "--filter",
            "*Order*",
            "--export-name",
            "storeApi",
            "--reducer-path",
            "store",
            "--arg-suffix",
            "Args",
            "--response-suffix",
            "Result",
            "--base-url",
            "https://example.com",
            "petstore.yaml",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("export const storeApi = createApi({\n  reducerPath: 'store',"))
        .stdout(predicate::str::contains("baseUrl: 'https://example.com'"))
        .stdout(predicate::str::contains(
            "getOrderById: build.query<GetOrderByIdResult, GetOrderByIdArgs>({",
        ))
        .stdout(predicate::str::contains("placeOrder: build.mutation<"))
        .stdout(predicate::str::contains("getPetById").not());
}

#[test]
fn missing_schema_file() {
    let ws = workspace();
    rtk_codegen(ws.path())
        .args(["generate", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Module not found: "));
}

#[test]
fn output_files_from_project_config() {
    let ws = workspace();
    std::fs::write(
        ws.path().join(".rtk-codegen.toml"),
        r#"
schema_file = "petstore.yaml"
hooks = true

[output_files."out/pets.ts"]
filter_endpoints = ["*Pet*"]
export_name = "petApi"

[output_files."out/store.ts"]
filter_endpoints = "*Order*"
export_name = "storeApi"
hooks = false
"#,
    )
    .unwrap();

    rtk_codegen(ws.path()).arg("generate").assert().success();

    let pets = std::fs::read_to_string(ws.path().join("out/pets.ts")).unwrap();
    assert!(pets.contains("export const petApi = createApi({"));
    assert!(pets.contains("useGetPetByIdQuery"));
    assert!(!pets.contains("getOrderById"));

    let store = std::fs::read_to_string(ws.path().join("out/store.ts")).unwrap();
    assert!(store.contains("export const storeApi = createApi({"));
    assert!(store.contains("getOrderById"));
    assert!(!store.contains("export const {"));
}
