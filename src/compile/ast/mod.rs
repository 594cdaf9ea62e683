use std::fmt::Display;

pub mod parsed;

pub type SourcePos = core::ops::Range<usize>;

pub type NodeId = usize;

/// Grammar productions a node can stand for. Child positions of each kind
/// are fixed by the elaboration of the parsed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Crate,
    Items,
    ItemFn,
    FnDecl,
    Args,
    Arg,
    DeclLocal,
    PatIdent,
    TyPath,
    Ident,
    ExprBlock,
    ExprLit,
    ExprPath,
    ExprUnary,
    ExprBinary,
    ExprAssign,
    ExprIf,
    ExprWhile,
    LitInteger,
    LitFloat,
    LitStr,
    LitBool,
    None,
    Atom,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crate => "crate",
            Self::Items => "Items",
            Self::ItemFn => "ItemFn",
            Self::FnDecl => "FnDecl",
            Self::Args => "Args",
            Self::Arg => "Arg",
            Self::DeclLocal => "DeclLocal",
            Self::PatIdent => "PatIdent",
            Self::TyPath => "TyPath",
            Self::Ident => "ident",
            Self::ExprBlock => "ExprBlock",
            Self::ExprLit => "ExprLit",
            Self::ExprPath => "ExprPath",
            Self::ExprUnary => "ExprUnary",
            Self::ExprBinary => "ExprBinary",
            Self::ExprAssign => "ExprAssign",
            Self::ExprIf => "ExprIf",
            Self::ExprWhile => "ExprWhile",
            Self::LitInteger => "LitInteger",
            Self::LitFloat => "LitFloat",
            Self::LitStr => "LitStr",
            Self::LitBool => "LitBool",
            Self::None => "<none>",
            Self::Atom => "atom",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::LitInteger | Self::LitFloat | Self::LitStr | Self::LitBool
        )
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    // Only atoms carry text.
    pub text: Option<String>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The label a leaf is printed with: its text for atoms, its kind
    /// otherwise.
    pub fn label(&self) -> &str {
        match self.text {
            Some(ref text) => text.as_str(),
            None => self.kind.as_str(),
        }
    }
}

/// Owns every node of one compilation. Nodes are addressed by index and
/// are only released together.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        let id = self.nodes.len();

        tracing::trace!(id, arity = children.len(), %kind, "new node");
        for (i, child) in children.iter().enumerate() {
            tracing::trace!(arg = i, child, kind = %self.nodes[*child].kind, "  node argument");
        }

        self.nodes.push(Node {
            kind,
            children: children.to_vec(),
            text: None,
        });

        id
    }

    /// Appends `extra` to the children of `node`. The returned id is the
    /// one to keep using; with index addressing it is always `node` itself.
    pub fn extend(&mut self, node: NodeId, extra: &[NodeId]) -> NodeId {
        let arity = self.nodes[node].children.len();

        tracing::trace!(
            id = node,
            arity,
            new_arity = arity + extra.len(),
            kind = %self.nodes[node].kind,
            "extending node"
        );

        self.nodes[node].children.extend_from_slice(extra);

        node
    }

    pub fn atom(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.create(NodeKind::Atom, &[]);
        self.nodes[id].text = Some(text.into());

        id
    }

    pub fn none(&mut self) -> NodeId {
        self.create(NodeKind::None, &[])
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn child(&self, id: NodeId, position: usize) -> Option<NodeId> {
        self.nodes.get(id)?.children.get(position).copied()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id)?.text.as_deref()
    }

    /// Text of the first `ident` found in a pre-order walk of `id`.
    pub fn find_ident(&self, id: NodeId) -> Option<&str> {
        let node = self.get(id)?;

        if node.kind == NodeKind::Ident {
            return node.children.first().and_then(|atom| self.text(*atom));
        }

        node.children
            .iter()
            .find_map(|child| self.find_ident(*child))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Releases every node at once.
    pub fn teardown(&mut self) {
        tracing::debug!(nodes = self.nodes.len(), "tearing down node arena");
        self.nodes.clear();
    }
}
