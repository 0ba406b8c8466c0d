//! 主题颜色定义

use ratatui::style::Color;

use super::ThemeColors;

/// 深色主题（默认）
pub fn dark_colors() -> ThemeColors {
    ThemeColors {
        bg: Color::Rgb(24, 24, 24),           // 深灰背景
        bg_secondary: Color::Rgb(48, 48, 48), // 选中行背景
        title: Color::Rgb(0, 255, 136),       // 亮绿色
        highlight: Color::Rgb(0, 255, 136),
        text: Color::White,
        muted: Color::Rgb(128, 128, 128),
        border: Color::Rgb(68, 68, 68),
        done: Color::Rgb(0, 200, 110),
        danger: Color::Rgb(255, 85, 85),
        warning: Color::Rgb(255, 213, 79),
    }
}

/// 浅色主题
pub fn light_colors() -> ThemeColors {
    ThemeColors {
        bg: Color::Rgb(250, 250, 250),
        bg_secondary: Color::Rgb(230, 230, 230),
        title: Color::Rgb(0, 128, 68), // 深绿色
        highlight: Color::Rgb(0, 128, 68),
        text: Color::Rgb(30, 30, 30),
        muted: Color::Rgb(120, 120, 120),
        border: Color::Rgb(200, 200, 200),
        done: Color::Rgb(0, 150, 80),
        danger: Color::Rgb(200, 50, 50),
        warning: Color::Rgb(255, 152, 0),
    }
}

/// Dracula 主题
pub fn dracula_colors() -> ThemeColors {
    ThemeColors {
        bg: Color::Rgb(40, 42, 54),
        bg_secondary: Color::Rgb(68, 71, 90),
        title: Color::Rgb(189, 147, 249),     // 紫色
        highlight: Color::Rgb(255, 121, 198), // 粉色
        text: Color::Rgb(248, 248, 242),
        muted: Color::Rgb(98, 114, 164), // 注释色
        border: Color::Rgb(68, 71, 90),
        done: Color::Rgb(80, 250, 123),
        danger: Color::Rgb(255, 85, 85),
        warning: Color::Rgb(241, 250, 140),
    }
}

/// Nord 主题
pub fn nord_colors() -> ThemeColors {
    ThemeColors {
        bg: Color::Rgb(46, 52, 64),           // polar night
        bg_secondary: Color::Rgb(59, 66, 82), // polar night lighter
        title: Color::Rgb(136, 192, 208),     // frost
        highlight: Color::Rgb(129, 161, 193), // frost darker
        text: Color::Rgb(236, 239, 244),      // snow storm
        muted: Color::Rgb(76, 86, 106),
        border: Color::Rgb(59, 66, 82),
        done: Color::Rgb(163, 190, 140),     // aurora green
        danger: Color::Rgb(191, 97, 106),    // aurora red
        warning: Color::Rgb(235, 203, 139), // aurora yellow
    }
}
