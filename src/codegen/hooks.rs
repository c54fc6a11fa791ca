use crate::codegen::ast::{Binding, Expr, Stmt};
use crate::openapi::naming;
use crate::openapi::EndpointKind;

/// `useGetPetByIdQuery`, `useAddPetMutation`
pub fn hook_name(operation_name: &str, kind: EndpointKind) -> String {
    format!(
        "use{}{}",
        naming::upper_first(operation_name),
        kind.hook_suffix()
    )
}

/// `export const { useXQuery, useYMutation } = <api>;` in endpoint order.
pub fn build_hooks_export<'a>(
    export_name: &str,
    endpoints: impl IntoIterator<Item = (&'a str, EndpointKind)>,
) -> Stmt {
    Stmt::Const {
        exported: true,
        binding: Binding::ObjectPattern(
            endpoints
                .into_iter()
                .map(|(name, kind)| hook_name(name, kind))
                .collect(),
        ),
        init: Expr::ident(export_name),
    }
}
