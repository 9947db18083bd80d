pub mod item_ops;
pub mod share;
pub mod subtask_tree;
