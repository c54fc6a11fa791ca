//! Sequences loading, extraction, import synthesis and AST assembly into one
//! generated module per output target.

use crate::codegen::ast::{Expr, ImportDecl, Module, ObjectLit, Stmt};
use crate::codegen::builder::{
    create_api_statement, object_literal, package_imports, string_literal_array, CreateApiCall,
};
use crate::codegen::endpoints::{generate_endpoint, EndpointSettings};
use crate::codegen::hooks::build_hooks_export;
use crate::codegen::{build_import, ImportTarget};
use crate::config::tsconfig::find_path_map;
use crate::config::{OutputTarget, ResolvedConfig};
use crate::errors::{CodegenError, Result};
use crate::openapi::operations::OperationSelection;
use crate::openapi::schema_types::{schema_to_type, type_name};
use crate::openapi::{extract, EndpointKind, OpenApiDocument, OperationDefinition};
use crate::resolve::fetch::{remote_url, RemoteFetcher};
use crate::resolve::{CompilerPathMap, ModuleResolver};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A generated module and where it goes.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// `None` means stdout.
    pub output_file: Option<PathBuf>,
    pub module: Module,
}

/// An operation that survived filtering, with its name and kind.
#[derive(Debug, Clone)]
pub struct SelectedOperation {
    pub definition: OperationDefinition,
    pub name: String,
    pub kind: EndpointKind,
}

/// How the generated `createApi` obtains its `baseQuery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseQuery {
    /// A user module, imported under `alias`.
    Custom { import: ImportDecl, alias: String },
    /// `fetchBaseQuery({ baseUrl })` from the toolkit.
    Fetch { base_url: String },
}

impl BaseQuery {
    fn expression(&self) -> Expr {
        match self {
            BaseQuery::Custom { alias, .. } => Expr::ident(alias.as_str()),
            BaseQuery::Fetch { base_url } => Expr::call(
                Expr::ident("fetchBaseQuery"),
                vec![Expr::Object(object_literal(
                    [("baseUrl", Expr::string(base_url.as_str()))],
                    false,
                ))],
            ),
        }
    }
}

/// Generate every configured output target.
pub async fn generate<F: RemoteFetcher>(
    config: &ResolvedConfig,
    working_dir: &Path,
    fetcher: &F,
) -> Result<Vec<GeneratedFile>> {
    let schema_file = config
        .schema_file
        .as_deref()
        .ok_or_else(|| CodegenError::Config("No OpenAPI schema file given".to_string()))?;
    let location = if remote_url(schema_file).is_some() {
        schema_file.to_string()
    } else {
        working_dir.join(schema_file).display().to_string()
    };
    let document = OpenApiDocument::load(&location, fetcher).await?;

    // The resolver only tries URLs when a path map is present, so runs
    // without a tsconfig use an empty one.
    let paths = find_path_map(working_dir, config.tsconfig.as_deref())?.unwrap_or_default();

    let mut files = Vec::new();
    for target in config.targets() {
        let module = generate_target(config, &target, &document, working_dir, &paths, fetcher).await?;
        tracing::info!(
            output = %target.output_file.as_ref().map_or_else(|| "stdout".to_string(), |p| p.display().to_string()),
            statements = module.statements.len(),
            "module generated"
        );
        files.push(GeneratedFile {
            output_file: target.output_file,
            module,
        });
    }
    Ok(files)
}

async fn generate_target<F: RemoteFetcher>(
    config: &ResolvedConfig,
    target: &OutputTarget,
    document: &OpenApiDocument,
    working_dir: &Path,
    paths: &CompilerPathMap,
    fetcher: &F,
) -> Result<Module> {
    let selection = target.selection()?;
    let operations = select_operations(document, &selection)?;

    let resolver = ModuleResolver::new(working_dir, Some(paths), fetcher);
    let base_query = resolve_base_query(config, target, document, &resolver).await?;

    Ok(assemble_module(config, target, document, &operations, &base_query))
}

/// Extract, filter, classify, and reject name collisions.
pub fn select_operations(
    document: &OpenApiDocument,
    selection: &OperationSelection,
) -> Result<Vec<SelectedOperation>> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut selected = Vec::new();

    for definition in extract(document)? {
        let name = definition.name();
        if !selection.includes(&name) {
            tracing::debug!(operation = %name, "filtered out");
            continue;
        }
        if let Some(first) = seen.get(&name) {
            return Err(CodegenError::DuplicateOperationName {
                name,
                first: first.clone(),
                second: definition.describe(),
            });
        }
        seen.insert(name.clone(), definition.describe());

        let kind = selection.classify(&definition);
        selected.push(SelectedOperation {
            definition,
            name,
            kind,
        });
    }

    tracing::debug!(count = selected.len(), "operations selected");
    Ok(selected)
}

/// Smart-import the configured base query, or fall back to `fetchBaseQuery`.
///
/// A failed import is terminal unless `base_query_fallback` is set, in which
/// case it is logged and the default base query is used.
pub async fn resolve_base_query<F: RemoteFetcher>(
    config: &ResolvedConfig,
    target: &OutputTarget,
    document: &OpenApiDocument,
    resolver: &ModuleResolver<'_, F>,
) -> Result<BaseQuery> {
    let fetch = || BaseQuery::Fetch {
        base_url: config
            .base_url
            .clone()
            .or_else(|| document.servers().into_iter().next())
            .unwrap_or_default(),
    };

    let Some(argument) = config.base_query.as_deref() else {
        return Ok(fetch());
    };

    let import_target = ImportTarget::from_argument(argument);
    match build_import(&import_target, target.output_file.as_deref(), resolver).await {
        Ok(resolved) => Ok(BaseQuery::Custom {
            import: resolved.declaration,
            alias: resolved.alias,
        }),
        Err(err) if config.base_query_fallback => {
            tracing::warn!(
                base_query = argument,
                error = %err,
                "base query import failed, falling back to fetchBaseQuery"
            );
            Ok(fetch())
        }
        Err(err) => Err(err),
    }
}

/// Imports, the `createApi` statement, type aliases, then hooks.
pub fn assemble_module(
    config: &ResolvedConfig,
    target: &OutputTarget,
    document: &OpenApiDocument,
    operations: &[SelectedOperation],
    base_query: &BaseQuery,
) -> Module {
    let settings = EndpointSettings {
        document,
        arg_suffix: &config.arg_suffix,
        response_suffix: &config.response_suffix,
        endpoint_builder: &config.endpoint_builder,
    };

    let mut endpoint_properties = Vec::with_capacity(operations.len());
    let mut types = Vec::new();
    for op in operations {
        let endpoint = generate_endpoint(&settings, &op.definition, &op.name, op.kind);
        endpoint_properties.push(endpoint.property);
        types.extend(endpoint.types);
    }
    types.extend(component_types(document));

    let uses_fetch_base_query = matches!(base_query, BaseQuery::Fetch { .. });
    let mut statements = package_imports(
        config.create_api_import_path,
        target.hooks,
        uses_fetch_base_query,
    );
    if let BaseQuery::Custom { import, .. } = base_query {
        statements.push(Stmt::Import(import.clone()));
    }

    statements.push(create_api_statement(CreateApiCall {
        export_name: target.export_name.clone(),
        reducer_path: target.reducer_path.clone(),
        create_api_fn: Expr::ident("createApi"),
        base_query: base_query.expression(),
        tag_types: string_literal_array(&config.tag_types),
        endpoint_builder: config.endpoint_builder.clone(),
        endpoint_definitions: ObjectLit {
            properties: endpoint_properties,
            multiline: true,
        },
    }));
    statements.extend(types);

    if target.hooks {
        statements.push(build_hooks_export(
            &target.export_name,
            operations.iter().map(|op| (op.name.as_str(), op.kind)),
        ));
    }

    Module { statements }
}

/// `export type <Schema> = ...` for every `components.schemas` entry.
fn component_types(document: &OpenApiDocument) -> Vec<Stmt> {
    document
        .component_schemas()
        .map(|schemas| {
            schemas
                .iter()
                .map(|(name, schema)| Stmt::TypeAlias {
                    exported: true,
                    name: type_name(name),
                    ty: schema_to_type(schema),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverrideEntry;
    use crate::output::printer::render;
    use crate::resolve::fetch::test_support::StaticFetcher;

    const PETSTORE: &str = r##"{
  "openapi": "3.0.0",
  "servers": [{ "url": "https://petstore.example.com/v2" }],
  "paths": {
    "/pet": {
      "post": {
        "operationId": "addPet",
        "requestBody": {
          "required": true,
          "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
        },
        "responses": { "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } } }
      }
    },
    "/pet/{petId}": {
      "get": {
        "operationId": "getPetById",
        "parameters": [{ "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } }],
        "responses": { "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } } }
      }
    }
  },
  "components": {
    "schemas": {
      "Pet": {
        "type": "object",
        "required": ["name"],
        "properties": { "id": { "type": "integer" }, "name": { "type": "string" } }
      }
    }
  }
}"##;

    fn document() -> OpenApiDocument {
        OpenApiDocument::parse("petstore.json", PETSTORE).unwrap()
    }

    fn target(hooks: bool) -> OutputTarget {
        OutputTarget {
            output_file: None,
            export_name: "api".into(),
            reducer_path: None,
            hooks,
            filter_endpoints: Vec::new(),
            endpoint_overrides: Vec::new(),
        }
    }

    #[test]
    fn selection_classifies_and_filters() {
        let doc = document();
        let all = select_operations(&doc, &OperationSelection::default()).unwrap();
        let names: Vec<(&str, EndpointKind)> =
            all.iter().map(|o| (o.name.as_str(), o.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("addPet", EndpointKind::Mutation),
                ("getPetById", EndpointKind::Query),
            ]
        );

        let mut t = target(false);
        t.filter_endpoints = vec!["get*".into()];
        t.endpoint_overrides = vec![OverrideEntry {
            patterns: vec!["getPet*".into()],
            kind: EndpointKind::Mutation,
        }];
        let filtered = select_operations(&doc, &t.selection().unwrap()).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].kind, EndpointKind::Mutation);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let doc = OpenApiDocument::parse(
            "dup.json",
            r#"{ "paths": {
                "/a": { "get": { "operationId": "same" } },
                "/b": { "post": { "operationId": "same" } }
            } }"#,
        )
        .unwrap();
        let err = select_operations(&doc, &OperationSelection::default()).unwrap_err();
        match err {
            CodegenError::DuplicateOperationName { name, first, second } => {
                assert_eq!(name, "same");
                assert_eq!(first, "GET /a");
                assert_eq!(second, "POST /b");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn module_order_and_hooks() {
        let doc = document();
        let config = ResolvedConfig::default();
        let ops = select_operations(&doc, &OperationSelection::default()).unwrap();
        let base_query = BaseQuery::Fetch {
            base_url: "https://petstore.example.com/v2".into(),
        };
        let module = assemble_module(&config, &target(true), &doc, &ops, &base_query);
        let code = render(&module);

        assert!(code.starts_with(
            "import { createApi } from '@reduxjs/toolkit/query/react';\n\
             import { fetchBaseQuery } from '@reduxjs/toolkit/query';\n"
        ));
        assert!(code.contains(
            "  baseQuery: fetchBaseQuery({ baseUrl: 'https://petstore.example.com/v2' }),\n"
        ));
        assert!(code.contains(
            "    addPet: build.mutation<AddPetApiResponse, AddPetApiArg>({\n      query: (queryArg) => ({ url: '/pet', method: 'POST', body: queryArg.body }),\n    }),\n"
        ));
        assert!(code.contains("export type AddPetApiResponse = Pet;\n"));
        assert!(code.contains("export type AddPetApiArg = {\n  body: Pet;\n};\n"));
        assert!(code.contains("export type GetPetByIdApiResponse = Pet;\n"));
        assert!(code.contains("export type Pet = {\n  id?: number;\n  name: string;\n};\n"));
        assert!(code.ends_with("export const { useAddPetMutation, useGetPetByIdQuery } = api;\n"));

        let create_api = code.find("export const api").unwrap();
        let first_type = code.find("export type").unwrap();
        assert!(create_api < first_type);
    }

    #[test]
    fn without_hooks_no_hooks_statement() {
        let doc = document();
        let config = ResolvedConfig::default();
        let ops = select_operations(&doc, &OperationSelection::default()).unwrap();
        let module = assemble_module(
            &config,
            &target(false),
            &doc,
            &ops,
            &BaseQuery::Fetch { base_url: String::new() },
        );
        let code = render(&module);
        assert!(code.starts_with(
            "import { createApi, fetchBaseQuery } from '@reduxjs/toolkit/query';\n"
        ));
        assert!(!code.contains("useGetPetByIdQuery"));
    }

    #[tokio::test]
    async fn base_query_defaults_to_first_server() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = StaticFetcher::default();
        let paths = CompilerPathMap::default();
        let resolver = ModuleResolver::new(tmp.path(), Some(&paths), &fetcher);
        let doc = document();

        let bq = resolve_base_query(&ResolvedConfig::default(), &target(false), &doc, &resolver)
            .await
            .unwrap();
        assert_eq!(
            bq,
            BaseQuery::Fetch {
                base_url: "https://petstore.example.com/v2".into()
            }
        );

        let config = ResolvedConfig {
            base_url: Some("/api".into()),
            ..Default::default()
        };
        let bq = resolve_base_query(&config, &target(false), &doc, &resolver)
            .await
            .unwrap();
        assert_eq!(bq, BaseQuery::Fetch { base_url: "/api".into() });
    }

    #[tokio::test]
    async fn failed_import_is_terminal_unless_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("noDefault.ts"), "export const x = 1;\n").unwrap();
        let fetcher = StaticFetcher::default();
        let paths = CompilerPathMap::default();
        let resolver = ModuleResolver::new(tmp.path(), Some(&paths), &fetcher);
        let doc = document();

        let config = ResolvedConfig {
            base_query: Some("./noDefault.ts".into()),
            ..Default::default()
        };
        let err = resolve_base_query(&config, &target(false), &doc, &resolver)
            .await
            .unwrap_err();
        assert!(matches!(err, CodegenError::DefaultExportMissing { .. }));

        let config = ResolvedConfig {
            base_query_fallback: true,
            ..config
        };
        let bq = resolve_base_query(&config, &target(false), &doc, &resolver)
            .await
            .unwrap();
        assert!(matches!(bq, BaseQuery::Fetch { .. }));
    }

    #[tokio::test]
    async fn generate_end_to_end_with_custom_base_query() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("petstore.json"), PETSTORE).unwrap();
        std::fs::create_dir(tmp.path().join("src")).unwrap();
        std::fs::write(
            tmp.path().join("src/customBaseQuery.ts"),
            "export default function customBaseQuery() {}\n",
        )
        .unwrap();

        let config = ResolvedConfig {
            schema_file: Some("petstore.json".into()),
            base_query: Some("./src/customBaseQuery.ts".into()),
            output_file: Some(PathBuf::from("src/api/generated.ts")),
            ..Default::default()
        };
        let files = generate(&config, tmp.path(), &StaticFetcher::default())
            .await
            .unwrap();
        assert_eq!(files.len(), 1);
        let code = render(&files[0].module);
        assert!(code.contains(
            "import { default as customBaseQuery } from '../customBaseQuery';\n"
        ));
        assert!(code.contains("  baseQuery: customBaseQuery,\n"));
        assert!(!code.contains("fetchBaseQuery"));
    }

    #[tokio::test]
    async fn missing_schema_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = generate(&ResolvedConfig::default(), tmp.path(), &StaticFetcher::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CodegenError::Config(_)));

        let config = ResolvedConfig {
            schema_file: Some("missing.yaml".into()),
            ..Default::default()
        };
        let err = generate(&config, tmp.path(), &StaticFetcher::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CodegenError::FileNotFound { .. }));
    }
}
