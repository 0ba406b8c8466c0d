//! 终端 / 系统深浅色检测

use std::process::Command;

/// 检测是否应使用深色主题
///
/// 优先读取终端设置的 `COLORFGBG`，其次在 macOS 上读取系统外观，其余情况默认深色。
pub fn detect_system_theme() -> bool {
    if let Some(dark) = std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| parse_colorfgbg(&value))
    {
        return dark;
    }

    if cfg!(target_os = "macos") {
        // AppleInterfaceStyle 不存在（命令失败）时为浅色模式
        return Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|output| {
                output.status.success()
                    && String::from_utf8_lossy(&output.stdout)
                        .trim()
                        .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(false);
    }

    true
}

/// 解析 "fg;bg" 或 "fg;default;bg"，背景色为 0-6 或 8 时视为深色
fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(bg <= 6 || bg == 8)
}
