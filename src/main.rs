mod app;
mod cli;
mod dialogs;
mod error;
mod event;
mod logging;
mod model;
mod storage;
mod sync;
mod theme;
mod ui;

use std::io;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::DefaultTerminal;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use app::App;
use cli::{Cli, Commands};
use storage::config::{self, Config};
use storage::FileStore;
use sync::Synchronizer;

/// 退出时等待写队列清空的最长时间
const EXIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// 启动 TUI 界面
fn run_tui(rt: Runtime, store: Arc<FileStore>, config: Config) -> io::Result<()> {
    // Synchronizer 需要在 runtime 上下文中 spawn 读写任务
    let guard = rt.enter();

    let mut app = App::new(store, config, config::config_path().ok());

    // 初始化终端
    let mut terminal = ratatui::init();

    // 运行主循环
    let result = run(&mut terminal, &mut app);

    // 恢复终端
    ratatui::restore();
    drop(guard);

    drain_writes(rt, &app.sync, EXIT_FLUSH_TIMEOUT);
    info!("tui closed");

    result
}

/// 等待已入队的写入完成后关闭 runtime，整体耗时受 `grace` 限制
///
/// 返回 false 表示仍有写入未完成，这些写入被丢弃。
fn drain_writes(rt: Runtime, sync: &Synchronizer, grace: Duration) -> bool {
    let drained = rt.block_on(async { tokio::time::timeout(grace, sync.flush()).await.is_ok() });
    if !drained {
        warn!(grace_ms = grace.as_millis() as u64, "pending writes dropped at exit");
    }
    // 不等待卡住的 blocking 文件操作
    rt.shutdown_timeout(grace);
    drained
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::todo::render(frame, app))?;

        if !event::handle_events(app)? {
            break;
        }
    }
    Ok(())
}

fn execute(args: Cli) -> error::Result<()> {
    let (config, config_error) = match config::config_path() {
        Ok(path) => config::load_config_or_default(&path),
        Err(e) => (Config::default(), Some(e)),
    };
    let data_dir = config.data_dir(args.data_dir.as_deref())?;

    if let Err(e) = logging::init(&data_dir, &config.log.level) {
        eprintln!("Logging disabled: {}", e);
    }
    // 日志初始化之后再报告配置问题
    if let Some(e) = config_error {
        warn!(error = %e, "ignoring unreadable config, using defaults");
    }

    let rt = Runtime::new()?;
    let store = Arc::new(FileStore::new(data_dir));
    info!(data_dir = %store.root().display(), "starting");

    match args.command.unwrap_or(Commands::Tui) {
        Commands::Tui => run_tui(rt, store, config)?,
        command => rt.block_on(cli::tasks::execute(store, command, &mut io::stdout()))?,
    }

    Ok(())
}

fn main() {
    // Enable backtraces by default so panics show call stacks
    if std::env::var("RUST_BACKTRACE").is_err() {
        // SAFETY: called at the very start of main, before any other threads
        unsafe {
            std::env::set_var("RUST_BACKTRACE", "1");
        }
    }

    // Set up panic hook to restore terminal state on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    // 解析命令行参数
    let args = Cli::parse();

    if let Err(e) = execute(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
