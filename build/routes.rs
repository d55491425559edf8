use std::{collections::HashMap, path::Path};

use syn::{
    Expr, ExprLit, ExprMethodCall, FnArg, GenericArgument, Item, Lit, PathArguments, Type,
    visit::Visit,
};

use crate::utils::{escape_rust_string, parse_rust_file};

#[derive(Debug, Clone)]
pub(crate) struct RouteEntry {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) source: String,
    pub(crate) access: String,
}

struct RouteVisitor<'a> {
    prefix: &'a str,
    source: String,
    access: &'a HashMap<String, &'static str>,
    routes: Vec<RouteEntry>,
}

impl<'ast> Visit<'ast> for RouteVisitor<'_> {
    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        if node.method == "route" {
            match node.args.first().and_then(extract_string_literal) {
                Some(path) => {
                    let handlers = node
                        .args
                        .iter()
                        .nth(1)
                        .map(extract_route_handlers)
                        .unwrap_or_default();
                    for (method, handler) in handlers {
                        let access = handler
                            .as_ref()
                            .and_then(|name| self.access.get(name).copied())
                            .unwrap_or("public");
                        self.routes.push(RouteEntry {
                            method,
                            path: format!("{}{}", self.prefix, path),
                            source: self.source.clone(),
                            access: access.to_string(),
                        });
                    }
                }
                None => println!(
                    "cargo:warning=Skipping non-literal route path in {}",
                    self.source
                ),
            }
        }
        syn::visit::visit_expr_method_call(self, node);
    }
}

fn extract_string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Some(value.value()),
        Expr::Paren(expr) => extract_string_literal(&expr.expr),
        Expr::Reference(expr) => extract_string_literal(&expr.expr),
        _ => None,
    }
}

/// `get(a).post(b)` becomes `[("GET", a), ("POST", b)]`.
fn extract_route_handlers(expr: &Expr) -> Vec<(String, Option<String>)> {
    let mut handlers = Vec::new();
    collect_route_handlers(expr, &mut handlers);
    handlers.reverse();
    handlers
}

fn collect_route_handlers(expr: &Expr, out: &mut Vec<(String, Option<String>)>) {
    match expr {
        Expr::Call(call) => {
            if let Expr::Path(func) = call.func.as_ref() {
                let method = func
                    .path
                    .segments
                    .last()
                    .and_then(|segment| normalize_method(&segment.ident.to_string()));
                if let Some(method) = method {
                    let handler = call.args.first().and_then(extract_handler_ident);
                    out.push((method.to_string(), handler));
                }
            }
        }
        Expr::MethodCall(call) => {
            if let Some(method) = normalize_method(&call.method.to_string()) {
                let handler = call.args.first().and_then(extract_handler_ident);
                out.push((method.to_string(), handler));
            }
            collect_route_handlers(&call.receiver, out);
        }
        Expr::Paren(expr) => collect_route_handlers(&expr.expr, out),
        _ => {}
    }
}

fn extract_handler_ident(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        Expr::Paren(expr) => extract_handler_ident(&expr.expr),
        _ => None,
    }
}

fn normalize_method(name: &str) -> Option<&'static str> {
    match name {
        "get" => Some("GET"),
        "post" => Some("POST"),
        "put" => Some("PUT"),
        "patch" => Some("PATCH"),
        "delete" => Some("DELETE"),
        _ => None,
    }
}

/// Access level implied by a guard extractor type.
fn guard_access(ty: &Type) -> Option<&'static str> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let last = type_path.path.segments.last()?;
    match last.ident.to_string().as_str() {
        "AuthGuard" | "Claims" => Some("authenticated"),
        "EditorGuard" => Some("EDITOR"),
        "AdminGuard" => Some("ADMIN"),
        "SuperAdminGuard" => Some("SUPER_ADMIN"),
        "AuthRoleGuard" => {
            let PathArguments::AngleBracketed(args) = &last.arguments else {
                return None;
            };
            args.args.iter().find_map(|arg| match arg {
                GenericArgument::Type(inner) => role_marker(inner),
                _ => None,
            })
        }
        _ => None,
    }
}

fn role_marker(ty: &Type) -> Option<&'static str> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    match type_path.path.segments.last()?.ident.to_string().as_str() {
        "EditorRole" => Some("EDITOR"),
        "AdminRole" => Some("ADMIN"),
        "SuperAdminRole" => Some("SUPER_ADMIN"),
        _ => None,
    }
}

fn collect_handler_access(items: &[Item]) -> HashMap<String, &'static str> {
    let mut out = HashMap::new();
    for item in items {
        let Item::Fn(item_fn) = item else {
            continue;
        };
        let access = item_fn.sig.inputs.iter().find_map(|input| match input {
            FnArg::Typed(pat_type) => guard_access(&pat_type.ty),
            FnArg::Receiver(_) => None,
        });
        if let Some(access) = access {
            out.insert(item_fn.sig.ident.to_string(), access);
        }
    }
    out
}

pub(crate) fn parse_routes_file(path: &Path, manifest_dir: &Path, prefix: &str) -> Vec<RouteEntry> {
    let parsed = parse_rust_file(path);
    let access = collect_handler_access(&parsed.items);
    let source = path
        .strip_prefix(manifest_dir)
        .unwrap_or(path)
        .display()
        .to_string();

    let mut visitor = RouteVisitor {
        prefix,
        source,
        access: &access,
        routes: Vec::new(),
    };
    for item in &parsed.items {
        if let Item::Fn(item_fn) = item {
            visitor.visit_block(&item_fn.block);
        }
    }
    visitor.routes
}

pub(crate) fn write_routes(out_dir: &Path, routes: &[RouteEntry]) {
    let out_path = out_dir.join("routes_generated.rs");
    let mut output = String::from("pub static ROUTES: &[RouteInfo] = &[\n");
    for route in routes {
        output.push_str(&format!(
            "    RouteInfo {{ method: \"{}\", path: \"{}\", source: \"{}\", access: \"{}\" }},\n",
            escape_rust_string(&route.method),
            escape_rust_string(&route.path),
            escape_rust_string(&route.source),
            escape_rust_string(&route.access),
        ));
    }
    output.push_str("];\n");

    std::fs::write(&out_path, output)
        .unwrap_or_else(|err| panic!("failed to write {}: {}", out_path.display(), err));
}
