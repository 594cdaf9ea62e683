use std::fmt::Write;

use crate::compile::ast::{
    NodeArena, NodeId, NodeKind,
    parsed::{BinaryOp, UnaryOp},
};

const STEP: &str = "    ";

/// Renders the program below `root` back into source form. Identifiers and
/// literals are taken from their leaf text; nested operators are always
/// parenthesised.
pub fn export(arena: &NodeArena, root: NodeId) -> Result<String, std::fmt::Error> {
    let mut printer = PrettyPrinter {
        arena,
        out: String::new(),
    };
    printer.item_list(root, 0)?;

    Ok(printer.out)
}

struct PrettyPrinter<'a> {
    arena: &'a NodeArena,
    out: String,
}

impl<'a> PrettyPrinter<'a> {
    fn indent(&mut self, level: usize) -> std::fmt::Result {
        for _ in 0..level {
            self.out.write_str(STEP)?;
        }

        Ok(())
    }

    fn ident(&self, id: NodeId) -> &'a str {
        self.arena.find_ident(id).unwrap_or_default()
    }

    fn item_list(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        let arena = self.arena;
        match arena.kind(id) {
            NodeKind::Crate | NodeKind::Items => {
                for (i, child) in arena.children(id).iter().enumerate() {
                    if i > 0 && arena.kind(*child) == NodeKind::ItemFn {
                        writeln!(self.out)?;
                    }
                    self.item_list(*child, level)?;
                }

                Ok(())
            }
            NodeKind::ItemFn => self.item_fn(id, level),
            _ => self.stmt(id, level),
        }
    }

    fn item_fn(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        let arena = self.arena;
        let name = arena.child(id, 0).map(|n| self.ident(n)).unwrap_or_default();

        self.indent(level)?;
        write!(self.out, "fn {name}(")?;

        let fn_decl = arena.child(id, 1);
        let args = fn_decl.and_then(|decl| arena.child(decl, 0));
        for (i, arg) in args.map(|a| arena.children(a)).unwrap_or_default().iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }

            let name = arena.child(*arg, 0).map(|n| self.ident(n)).unwrap_or_default();
            let ty = arena.child(*arg, 1).map(|t| self.ident(t)).unwrap_or_default();
            write!(self.out, "{name}: {ty}")?;
        }
        self.out.write_char(')')?;

        let ret = fn_decl
            .and_then(|decl| arena.child(decl, 1))
            .filter(|ret| arena.kind(*ret) == NodeKind::TyPath);
        if let Some(ret) = ret {
            write!(self.out, " -> {}", self.ident(ret))?;
        }

        self.out.write_char(' ')?;
        match arena.child(id, 2) {
            Some(body) => self.block(body, level)?,
            None => self.out.write_str("{}")?,
        }

        writeln!(self.out)
    }

    fn block(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        writeln!(self.out, "{{")?;

        let arena = self.arena;
        for stmt in arena.children(id) {
            self.stmt(*stmt, level + 1)?;
        }

        self.indent(level)?;
        self.out.write_char('}')
    }

    fn stmt(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        let arena = self.arena;
        match arena.kind(id) {
            NodeKind::ItemFn => self.item_fn(id, level),
            NodeKind::DeclLocal => {
                self.indent(level)?;
                self.decl_local(id, level)?;
                writeln!(self.out, ";")
            }
            NodeKind::ExprIf | NodeKind::ExprWhile | NodeKind::ExprBlock => {
                self.indent(level)?;
                self.expr(id, level)?;
                writeln!(self.out)
            }
            _ => {
                self.indent(level)?;
                self.expr(id, level)?;
                writeln!(self.out, ";")
            }
        }
    }

    fn decl_local(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        let arena = self.arena;
        let &[pat, ty, init] = arena.children(id) else {
            return self.out.write_str("let");
        };

        let mutable = arena
            .child(pat, 0)
            .and_then(|mode| arena.text(mode))
            .is_some_and(|mode| mode == "MutMutable");

        self.out.write_str("let ")?;
        if mutable {
            self.out.write_str("mut ")?;
        }
        self.out.write_str(self.ident(pat))?;

        if arena.kind(ty) == NodeKind::TyPath {
            write!(self.out, ": {}", self.ident(ty))?;
        }

        if arena.kind(init) != NodeKind::None {
            self.out.write_str(" = ")?;
            self.expr(init, level)?;
        }

        Ok(())
    }

    fn operand(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        match self.arena.kind(id) {
            NodeKind::ExprBinary | NodeKind::ExprAssign => {
                self.out.write_char('(')?;
                self.expr(id, level)?;
                self.out.write_char(')')
            }
            _ => self.expr(id, level),
        }
    }

    fn expr(&mut self, id: NodeId, level: usize) -> std::fmt::Result {
        let arena = self.arena;
        let children = arena.children(id);

        match (arena.kind(id), children) {
            (NodeKind::ExprLit, &[lit]) => {
                let text = arena.child(lit, 0).and_then(|atom| arena.text(atom)).unwrap_or_default();
                match arena.kind(lit) {
                    NodeKind::LitStr => write!(self.out, "\"{text}\""),
                    _ => self.out.write_str(text),
                }
            }
            (NodeKind::ExprPath, _) => self.out.write_str(self.ident(id)),
            (NodeKind::ExprUnary, &[op, rhs]) => {
                let symbol = arena.text(op).and_then(UnaryOp::from_tag).map(|op| op.symbol());
                self.out.write_str(symbol.unwrap_or_default())?;
                self.operand(rhs, level)
            }
            (NodeKind::ExprBinary, &[op, lhs, rhs]) => {
                let symbol = arena.text(op).and_then(BinaryOp::from_tag).map(|op| op.symbol());

                self.operand(lhs, level)?;
                write!(self.out, " {} ", symbol.unwrap_or_default())?;
                self.operand(rhs, level)
            }
            (NodeKind::ExprAssign, &[lhs, rhs]) => {
                self.expr(lhs, level)?;
                self.out.write_str(" = ")?;
                self.expr(rhs, level)
            }
            (NodeKind::ExprIf, &[cond, then, ..]) => {
                self.out.write_str("if ")?;
                self.expr(cond, level)?;
                self.out.write_char(' ')?;
                self.block(then, level)?;

                if let Some(otherwise) = children.get(2) {
                    self.out.write_str(" else ")?;
                    self.expr(*otherwise, level)?;
                }

                Ok(())
            }
            (NodeKind::ExprWhile, &[_, cond, body]) => {
                self.out.write_str("while ")?;
                self.expr(cond, level)?;
                self.out.write_char(' ')?;
                self.block(body, level)
            }
            (NodeKind::ExprBlock, _) => self.block(id, level),
            (kind, _) => write!(self.out, "<{kind}>"),
        }
    }
}
