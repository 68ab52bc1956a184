use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use clap::Parser;
use colonmoji_core::{
    config::Config,
    key_event::{Action, InputEvent},
    layout::Viewport,
    matcher::SubstringMatcher,
    relay::{RelayMessage, RelayOutcome},
    session::Session,
    surface::EditingSurface,
};
use colonmoji_dom::{
    Document, MemoryClipboard,
    host::{press, type_text},
};
use tracing::debug;

/// colonmoji 交互演示：在内存编辑器里输入文本，`:` 触发候选。
#[derive(Debug, Parser)]
#[command(name = "colonmoji", version)]
struct Cli {
    /// 数据集（`{"all": [...]}` JSON）
    #[arg(long, default_value_os_t = default_data_path())]
    data: PathBuf,
    /// TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,
    /// 视口高度（px），用于演示 overlay 上下翻转
    #[arg(long, default_value_t = 600.0)]
    viewport_height: f64,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("asset").join("emoji.json")
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))
}

struct Repl {
    session: Session<SubstringMatcher>,
    doc: Document,
    clipboard: MemoryClipboard,
    viewport: Viewport,
    next_surface: u64,
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "config loaded");
    let mut session = Session::with_config(SubstringMatcher, config);
    session.load_store(colonmoji_dataset::load_or_empty(&cli.data));

    let doc = Document::new(1);
    session.on_surface_attached(doc.id());
    session.on_focus_in(doc.id());

    let mut repl = Repl {
        session,
        doc,
        clipboard: MemoryClipboard::new(),
        viewport: Viewport {
            width: 1024.0,
            height: cli.viewport_height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        },
        next_surface: 2,
    };
    repl.run(&cli.data)
}

impl Repl {
    fn run(&mut self, data: &Path) -> Result<()> {
        let mut out = io::stdout();
        writeln!(
            out,
            "colonmoji demo | data: {} ({} entries)",
            data.display(),
            self.session.store().len()
        )?;
        writeln!(out, "输入文本后回车（逐字符送入编辑器）；/help 查看命令，/quit 退出。")?;

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            print!("text> ");
            out.flush()?;
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let input = line.trim_end_matches(['\r', '\n']);
            if input.is_empty() {
                continue;
            }
            match self.command(input, &mut out)? {
                Flow::Quit => break,
                Flow::Continue => self.show(&mut out)?,
            }
        }
        Ok(())
    }

    fn command(&mut self, input: &str, out: &mut impl Write) -> Result<Flow> {
        let Some(cmd) = input.strip_prefix('/') else {
            let actions = type_text(&mut self.session, &mut self.doc, input);
            report(&actions, out)?;
            return Ok(Flow::Continue);
        };
        let (name, arg) = cmd.split_once(' ').unwrap_or((cmd, ""));
        let key = match name {
            "up" => Some(InputEvent::ArrowUp),
            "down" => Some(InputEvent::ArrowDown),
            "left" => Some(InputEvent::ArrowLeft),
            "right" => Some(InputEvent::ArrowRight),
            "enter" => Some(InputEvent::Enter),
            "tab" => Some(InputEvent::Tab),
            "esc" => Some(InputEvent::Escape),
            "bs" => Some(InputEvent::Backspace),
            _ => None,
        };
        if let Some(ev) = key {
            let actions = press(&mut self.session, &mut self.doc, ev);
            report(&actions, out)?;
            return Ok(Flow::Continue);
        }

        match name {
            "q" | "quit" | "exit" => return Ok(Flow::Quit),
            "help" | "h" => print_help(out)?,
            "click" => match arg.trim().parse::<usize>() {
                Ok(n) if n >= 1 => {
                    self.session.on_pointer_down(true);
                    let actions = self.session.on_option_click(&mut self.doc, n - 1);
                    report(&actions, out)?;
                }
                _ => writeln!(out, "用法：/click <1-8>")?,
            },
            "outside" => {
                let actions = self.session.on_pointer_down(false);
                report(&actions, out)?;
            }
            "relay" => self.relay(arg.trim(), out)?,
            "compose" => {
                let actions = self.session.on_composition_start();
                report(&actions, out)?;
            }
            "endcompose" => self.session.on_composition_end(),
            "rerender" => self.doc.rerender(),
            "clear" => {
                let actions = self.session.on_surface_detached(self.doc.id());
                report(&actions, out)?;
                self.doc = Document::new(self.next_surface);
                self.next_surface += 1;
                self.session.on_surface_attached(self.doc.id());
                self.session.on_focus_in(self.doc.id());
            }
            "blur" => {
                // 模拟没有活动 surface：relay 走剪贴板回退
                let actions = self.session.on_surface_detached(self.doc.id());
                report(&actions, out)?;
            }
            "show" => {}
            _ => writeln!(out, "未知命令 /{name}，输入 /help 查看")?,
        }
        Ok(Flow::Continue)
    }

    fn relay(&mut self, arg: &str, out: &mut impl Write) -> Result<()> {
        let value = if arg.starts_with('{') {
            match RelayMessage::from_json(arg) {
                Ok(RelayMessage::Insert { value }) => value,
                Err(err) => {
                    writeln!(out, "relay 消息无效：{err}")?;
                    return Ok(());
                }
            }
        } else if arg.is_empty() {
            writeln!(out, "用法：/relay <value> 或 /relay {{\"action\":\"insertEmoji\",\"emoji\":\"🙂\"}}")?;
            return Ok(());
        } else {
            arg.to_owned()
        };

        let target = (self.session.active_surface() == Some(self.doc.id()))
            .then_some(&mut self.doc as &mut dyn EditingSurface);
        match self.session.apply_insertion(&value, target, &mut self.clipboard) {
            RelayOutcome::Inserted(_) => writeln!(out, "insert: {value}")?,
            RelayOutcome::Copied { status_for } => writeln!(
                out,
                "copied to clipboard: {} (status {}ms)",
                self.clipboard.contents().unwrap_or_default(),
                status_for.as_millis()
            )?,
            RelayOutcome::Dropped => writeln!(out, "(dropped)")?,
        }
        Ok(())
    }

    fn show(&self, out: &mut impl Write) -> Result<()> {
        let before = self.doc.text_before_caret().unwrap_or_default();
        let text = self.doc.text();
        let after = text.strip_prefix(before.as_str()).unwrap_or("");
        writeln!(out, "> {before}|{after}")?;
        if self.session.is_composing() {
            writeln!(out, "  (composing)")?;
        }
        if let Some(view) = self.session.view(&self.doc, self.viewport) {
            writeln!(
                out,
                "  overlay @ ({:.0}, {:.0}) {:?}",
                view.placement.left, view.placement.top, view.placement.side
            )?;
            for o in &view.options {
                let mark = if o.highlighted { '>' } else { ' ' };
                writeln!(out, "  {mark}{}. {} {}", o.index + 1, o.value, o.label)?;
            }
        }
        Ok(())
    }
}

enum Flow {
    Continue,
    Quit,
}

fn report(actions: &[Action], out: &mut impl Write) -> io::Result<()> {
    for a in actions {
        if let Action::Commit { value, .. } = a {
            writeln!(out, "commit: {value}")?;
        }
    }
    Ok(())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "普通文本：逐字符输入；`:` 开始触发，例如 `hello :gri`")?;
    writeln!(out, "/up /down /left /right /enter /tab /esc /bs  按键")?;
    writeln!(out, "/click <n>   点击第 n 个候选")?;
    writeln!(out, "/outside     点击 overlay 以外的位置")?;
    writeln!(out, "/relay <v>   picker 发来的插入命令（也接受 JSON 消息）")?;
    writeln!(out, "/compose /endcompose  输入法组字开始/结束")?;
    writeln!(out, "/rerender    宿主重渲染（旧节点失效）")?;
    writeln!(out, "/blur        移除编辑区域（relay 回退到剪贴板）")?;
    writeln!(out, "/clear       换一个新的编辑区域")?;
    writeln!(out, "/show /quit")
}
