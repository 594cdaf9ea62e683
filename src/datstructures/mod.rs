pub mod pushback;
pub mod scope_tree;
