///
/// Lowering of the parsed program into the node arena.
/// Every production becomes a node whose children sit at fixed positions.
///
use crate::compile::ast::{
    NodeArena, NodeId, NodeKind,
    parsed::{Block, Expr, FunctionDecl, Param, Program, Stmt},
};

pub fn elab(program: Program, arena: &mut NodeArena) -> NodeId {
    let items = arena.create(NodeKind::Items, &[]);

    for item in program.items {
        let item = elab_fn(item, arena);
        arena.extend(items, &[item]);
    }

    arena.create(NodeKind::Crate, &[items])
}

fn elab_ident(name: String, arena: &mut NodeArena) -> NodeId {
    let atom = arena.atom(name);
    arena.create(NodeKind::Ident, &[atom])
}

fn elab_type(ty: Option<String>, arena: &mut NodeArena) -> NodeId {
    match ty {
        Some(ty) => {
            let ident = elab_ident(ty, arena);
            arena.create(NodeKind::TyPath, &[ident])
        }
        None => arena.none(),
    }
}

fn elab_pat(name: String, mutable: bool, arena: &mut NodeArena) -> NodeId {
    let mode = arena.atom(if mutable { "MutMutable" } else { "MutImmutable" });
    let ident = elab_ident(name, arena);

    arena.create(NodeKind::PatIdent, &[mode, ident])
}

fn elab_fn(decl: FunctionDecl, arena: &mut NodeArena) -> NodeId {
    let FunctionDecl {
        name,
        params,
        ret,
        body,
        ..
    } = decl;

    let name = elab_ident(name, arena);

    let args = arena.create(NodeKind::Args, &[]);
    for Param { name, ty } in params {
        let pat = elab_pat(name, false, arena);
        let ty = elab_type(Some(ty), arena);
        let arg = arena.create(NodeKind::Arg, &[pat, ty]);
        arena.extend(args, &[arg]);
    }

    let ret = elab_type(ret, arena);
    let fn_decl = arena.create(NodeKind::FnDecl, &[args, ret]);
    let body = elab_block(body, arena);

    arena.create(NodeKind::ItemFn, &[name, fn_decl, body])
}

fn elab_block(block: Block, arena: &mut NodeArena) -> NodeId {
    let node = arena.create(NodeKind::ExprBlock, &[]);

    for stmt in block.stmts {
        let stmt = elab_stmt(stmt, arena);
        arena.extend(node, &[stmt]);
    }

    node
}

fn elab_stmt(stmt: Stmt, arena: &mut NodeArena) -> NodeId {
    match stmt {
        Stmt::Let {
            name,
            mutable,
            ty,
            init,
            ..
        } => {
            let pat = elab_pat(name, mutable, arena);
            let ty = elab_type(ty, arena);
            let init = match init {
                Some(init) => elab_expr(init, arena),
                None => arena.none(),
            };

            arena.create(NodeKind::DeclLocal, &[pat, ty, init])
        }
        Stmt::Item(decl) => elab_fn(decl, arena),
        Stmt::Expr(expr) => elab_expr(expr, arena),
    }
}

fn elab_literal(kind: NodeKind, text: String, arena: &mut NodeArena) -> NodeId {
    let atom = arena.atom(text);
    let lit = arena.create(kind, &[atom]);

    arena.create(NodeKind::ExprLit, &[lit])
}

fn elab_expr(expr: Expr, arena: &mut NodeArena) -> NodeId {
    match expr {
        Expr::Int(value, _) => elab_literal(NodeKind::LitInteger, value, arena),
        Expr::Float(value, _) => elab_literal(NodeKind::LitFloat, value, arena),
        Expr::Str(value, _) => elab_literal(NodeKind::LitStr, value, arena),
        Expr::Bool(value, _) => elab_literal(NodeKind::LitBool, value.to_string(), arena),
        Expr::Path(name, _) => {
            let ident = elab_ident(name, arena);
            arena.create(NodeKind::ExprPath, &[ident])
        }
        Expr::Unary(op, rhs) => {
            let op = arena.atom(op.tag());
            let rhs = elab_expr(*rhs, arena);

            arena.create(NodeKind::ExprUnary, &[op, rhs])
        }
        Expr::Binary(op, lhs, rhs) => {
            let op = arena.atom(op.tag());
            let lhs = elab_expr(*lhs, arena);
            let rhs = elab_expr(*rhs, arena);

            arena.create(NodeKind::ExprBinary, &[op, lhs, rhs])
        }
        Expr::Assign(target, value) => {
            let target = elab_expr(*target, arena);
            let value = elab_expr(*value, arena);

            arena.create(NodeKind::ExprAssign, &[target, value])
        }
        Expr::If(cond, then, otherwise) => {
            let cond = elab_expr(*cond, arena);
            let then = elab_block(then, arena);
            let node = arena.create(NodeKind::ExprIf, &[cond, then]);

            match otherwise {
                Some(otherwise) => {
                    let otherwise = elab_expr(*otherwise, arena);
                    arena.extend(node, &[otherwise])
                }
                None => node,
            }
        }
        Expr::While(cond, body) => {
            let label = arena.none();
            let cond = elab_expr(*cond, arena);
            let body = elab_block(body, arena);

            arena.create(NodeKind::ExprWhile, &[label, cond, body])
        }
        // An `else { .. }` arm and a bare block both lower to the block node.
        Expr::Block(block) => elab_block(block, arena),
    }
}
