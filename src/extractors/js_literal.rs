//! JavaScript object-literal decoding
//!
//! Script state is frequently not strict JSON (unquoted keys, single quotes,
//! trailing commas). Such literals are parsed with SWC and converted from the
//! AST; anything that is not plain data (calls, identifiers, functions) makes
//! the decode fail.

use serde_json::{Map, Number, Value};
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// Decode a captured literal, strict JSON first
pub fn decode(literal: &str) -> Option<Value> {
    serde_json::from_str(literal)
        .ok()
        .or_else(|| decode_js(literal))
}

fn decode_js(literal: &str) -> Option<Value> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), format!("var __state = {literal};"));

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );

    let mut parser = Parser::new_from(lexer);
    let script = parser.parse_script().ok()?;

    match script.body.first()? {
        Stmt::Decl(Decl::Var(var_decl)) => {
            let init = var_decl.decls.first()?.init.as_ref()?;
            expr_to_json(init)
        }
        _ => None,
    }
}

fn expr_to_json(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|v| Value::String(v.to_string())),
        Expr::Lit(Lit::Num(n)) => number(n.value),
        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),
        Expr::Lit(Lit::Null(_)) => Some(Value::Null),
        Expr::Ident(ident) if ident.sym.as_ref() == "undefined" => Some(Value::Null),

        Expr::Object(obj) => {
            let mut map = Map::new();
            for prop in &obj.props {
                if let PropOrSpread::Prop(prop) = prop {
                    if let Prop::KeyValue(kv) = &**prop {
                        map.insert(prop_name_to_string(&kv.key)?, expr_to_json(&kv.value)?);
                    }
                }
            }
            Some(Value::Object(map))
        }

        Expr::Array(arr) => arr
            .elems
            .iter()
            .map(|elem| match elem {
                Some(ExprOrSpread { expr, .. }) => expr_to_json(expr),
                None => Some(Value::Null),
            })
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),

        // JSON.parse('...')
        Expr::Call(call) if is_json_parse_call(call) => {
            let ExprOrSpread { expr: arg, .. } = call.args.first()?;
            match &**arg {
                Expr::Lit(Lit::Str(s)) => serde_json::from_str(s.value.as_str()?).ok(),
                _ => None,
            }
        }

        Expr::Unary(unary) => match (unary.op, &*unary.arg) {
            (UnaryOp::Minus, Expr::Lit(Lit::Num(n))) => number(-n.value),
            (UnaryOp::Plus, Expr::Lit(Lit::Num(n))) => number(n.value),
            // Minifiers emit !0 / !1 for booleans
            (UnaryOp::Bang, Expr::Lit(Lit::Num(n))) => Some(Value::Bool(n.value == 0.0)),
            _ => None,
        },

        Expr::Paren(paren) => expr_to_json(&paren.expr),

        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .map(|quasi| Value::String(quasi.raw.as_str().to_string())),

        _ => None,
    }
}

fn number(value: f64) -> Option<Value> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(Value::Number(Number::from(value as i64)))
    } else {
        Number::from_f64(value).map(Value::Number)
    }
}

fn is_json_parse_call(call: &CallExpr) -> bool {
    let Callee::Expr(expr) = &call.callee else {
        return false;
    };
    let Expr::Member(member) = &**expr else {
        return false;
    };
    match (&*member.obj, &member.prop) {
        (Expr::Ident(obj), MemberProp::Ident(prop)) => {
            obj.sym.as_ref() == "JSON" && prop.sym.as_ref() == "parse"
        }
        _ => false,
    }
}

fn prop_name_to_string(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.as_str().to_string()),
        PropName::Str(s) => s.value.as_str().map(|v| v.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
