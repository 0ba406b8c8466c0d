pub mod todo;

pub use todo::{TodoItem, TodoList};
