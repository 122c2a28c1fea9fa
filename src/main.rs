// 基于 ratatui + crossterm 的题库浏览 TUI
// 功能：
// - 从题库 JSON 导出文件载入题目（--file 或环境变量 QBANK_DATA）
// - 列表页按题型/难度/是否有图筛选，可选筛选变化即提交（默认关闭）
// - 详情页 ←/→ 切换上一题/下一题，a/e 显隐答案与解析，y 复制题干
// - 操作结果以右下角提示显示，日志写入 --log-dir

use std::{io, path::PathBuf, time::Duration, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use qbank_viewer::app::App;
use qbank_viewer::clipboard::ClipboardHelper;
use qbank_viewer::config::ViewerConfig;
use qbank_viewer::logging;
use qbank_viewer::store::QuestionBank;
use qbank_viewer::ui::{theme_of, ui, ThemeKind};

#[derive(Debug, Clone, Parser)]
#[command(name = "qbank-viewer", about = "题库浏览 TUI 工具", version)]
struct Cli {
    /// 题库 JSON 文件，默认读取环境变量 QBANK_DATA 或自动探测 data/questions.json
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// 配置文件路径，默认读取 QBANK_CONFIG 或向上查找 qbank.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// 筛选条件变化时自动提交（覆盖配置文件）
    #[arg(long = "auto-submit")]
    auto_submit: bool,

    /// 提示显示时长（毫秒）
    #[arg(long = "toast-ms")]
    toast_ms: Option<u64>,

    /// 每页题目数
    #[arg(long = "per-page")]
    per_page: Option<usize>,

    /// 主题（外观）：dark | light
    #[arg(long = "theme", value_enum, default_value_t = ThemeKind::Dark)]
    theme: ThemeKind,

    /// 日志目录
    #[arg(long = "log-dir", default_value = "logs")]
    log_dir: PathBuf,
}

fn default_data_path(cli: &Cli) -> PathBuf {
    if let Some(p) = &cli.file {
        return p.clone();
    }
    if let Ok(envp) = std::env::var("QBANK_DATA") {
        return PathBuf::from(envp);
    }

    // 自动探测：从当前目录向上查找常见路径
    if let Ok(cwd) = std::env::current_dir() {
        for anc in cwd.ancestors() {
            for c in ["data/questions.json", "questions.json"] {
                let p = anc.join(c);
                if p.exists() {
                    return p;
                }
            }
        }
    }
    // 最后返回默认路径（可能不存在，load 时会给出清晰错误）
    PathBuf::from("data/questions.json")
}

fn apply_cli(cfg: &mut ViewerConfig, cli: &Cli) {
    if cli.auto_submit {
        cfg.auto_submit_on_filter_change = true;
    }
    if let Some(ms) = cli.toast_ms {
        cfg.toast_duration_ms = ms;
    }
    if let Some(n) = cli.per_page {
        cfg.per_page = n.max(1);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&cli.log_dir)?;

    let mut config = ViewerConfig::discover(cli.config.as_deref()).context("载入配置失败")?;
    apply_cli(&mut config, &cli);
    let data_path = default_data_path(&cli);
    let bank = QuestionBank::load(&data_path)?;
    tracing::info!(
        data = %data_path.display(),
        auto_submit = config.auto_submit_on_filter_change,
        "启动"
    );

    let mut app = App::new(
        bank,
        data_path,
        config,
        theme_of(cli.theme),
        ClipboardHelper::system(),
    );

    // TUI 初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // 退出还原
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(e) = &res {
        tracing::error!("异常退出: {:#}", e);
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, app))?;
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(k) = event::read()? {
                match app.handle_key(k) {
                    Ok(true) => break,
                    Ok(false) => {}
                    // 重载失败等不中断界面，只提示
                    Err(e) => {
                        tracing::warn!("{:#}", e);
                        app.toasts.show(format!("{}", e), None);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "qbank-viewer",
            "--auto-submit",
            "--toast-ms",
            "800",
            "--per-page",
            "0",
        ]);
        let mut cfg = ViewerConfig::default();
        apply_cli(&mut cfg, &cli);
        assert!(cfg.auto_submit_on_filter_change);
        assert_eq!(cfg.toast_duration_ms, 800);
        assert_eq!(cfg.per_page, 1);
    }

    #[test]
    fn explicit_file_wins() {
        let cli = Cli::parse_from(["qbank-viewer", "-f", "bank.json"]);
        assert_eq!(default_data_path(&cli), PathBuf::from("bank.json"));
    }
}
