//! 非交互子命令：list / add / toggle / remove
//!
//! 每个命令都走 load → mutate → persist → flush，与 TUI 共用同一个 Synchronizer。

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tracing::info;

use super::Commands;
use crate::error::{Result, TodoError};
use crate::model::{TodoItem, TodoList};
use crate::storage::{KeyValueStore, TODOS_STORAGE_KEY};
use crate::sync::Synchronizer;

/// 执行子命令，输出写到 `out`
pub async fn execute(
    store: Arc<dyn KeyValueStore>,
    command: Commands,
    out: &mut impl Write,
) -> Result<()> {
    let (mut sync, list) = load(store).await;

    match command {
        Commands::Tui => Ok(()),
        Commands::List => print_list(&list, out),
        Commands::Add { text } => {
            let text = text.join(" ");
            let next = list.add(&text);
            if TodoList::same(&list, &next) {
                return Err(TodoError::invalid_data("task text is empty"));
            }
            save(&mut sync, &next).await?;
            if let Some(item) = next.items().last() {
                writeln!(out, "Added: {}", format_line(next.len() - 1, item))?;
            }
            Ok(())
        }
        Commands::Toggle { selector } => {
            let item = find(&list, &selector)?;
            let next = list.toggle(&item.id);
            save(&mut sync, &next).await?;
            if let Some(index) = next.position(&item.id) {
                writeln!(out, "{}", format_line(index, &next.items()[index]))?;
            }
            Ok(())
        }
        Commands::Remove { selector, yes } => {
            let item = find(&list, &selector)?;
            if !yes && !confirm(&item.text)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            let next = list.remove(&item.id);
            save(&mut sync, &next).await?;
            writeln!(out, "Deleted: {}", item.text)?;
            Ok(())
        }
    }
}

async fn load(store: Arc<dyn KeyValueStore>) -> (Synchronizer, TodoList) {
    let mut sync = Synchronizer::start(store, TODOS_STORAGE_KEY);
    let list = sync.wait_loaded().await.unwrap_or_default();
    (sync, list)
}

/// 写入并等待落盘，写入失败作为错误返回
async fn save(sync: &mut Synchronizer, list: &TodoList) -> Result<()> {
    sync.persist(list);
    sync.flush().await;
    match sync.take_write_failure() {
        Some(failure) => Err(TodoError::storage(failure.error)),
        None => Ok(()),
    }
}

fn find(list: &TodoList, selector: &str) -> Result<TodoItem> {
    list.resolve(selector)
        .cloned()
        .ok_or_else(|| TodoError::not_found(format!("no task matches '{}'", selector)))
}

fn print_list(list: &TodoList, out: &mut impl Write) -> Result<()> {
    if list.is_empty() {
        writeln!(out, "No tasks yet. Add one!")?;
        return Ok(());
    }
    for (index, item) in list.iter().enumerate() {
        writeln!(out, "{}", format_line(index, item))?;
    }
    writeln!(out, "{}/{} done", list.completed_count(), list.len())?;
    Ok(())
}

/// `[x] 1. text  (id)`
fn format_line(index: usize, item: &TodoItem) -> String {
    let mark = if item.completed { 'x' } else { ' ' };
    format!("[{}] {}. {}  ({})", mark, index + 1, item.text, item.id)
}

fn confirm(text: &str) -> Result<bool> {
    print!("Are you sure you want to delete \"{}\"? [y/N] ", text);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let accepted = parse_answer(&answer);
    info!(accepted, "delete confirmation answered");
    Ok(accepted)
}

fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
