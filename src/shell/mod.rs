pub mod command;
pub mod parse;

use crate::shell::{
    command::{execute_command, Command, Session},
    parse::parse_command,
};
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal,
};
use std::{
    error::Error,
    io::stdout,
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};
use virtual_floppy::{
    config::{HISTORY_FILE, HISTORY_SIZE},
    disk::{
        init::{perform_disk_initialization, BootProgress},
        VirtualDisk,
    },
};

const COMMANDS: [&str; 13] = [
    "help", "info", "pos", "seek", "read", "write", "fill", "load", "save", "format", "stat",
    "exit", "quit",
];

pub fn start_shell(image_path: PathBuf) -> Result<(), Box<dyn Error>> {
    let disk = boot(&image_path)?;
    welcome()?;

    let username = whoami::username();
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_string());
    let mut session = Session::new(disk, image_path);

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    let history_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HISTORY_FILE);

    let mut line_editor = Reedline::create();
    match FileBackedHistory::with_file(HISTORY_SIZE, history_path) {
        Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
        Err(e) => log::warn!("command history disabled: {e}"),
    }

    let completer = DefaultCompleter::new_with_wordlen(
        COMMANDS.iter().map(|c| c.to_string()).collect(),
        2,
    );
    line_editor = line_editor.with_completer(Box::new(completer));

    loop {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(format!(
                "{}@{}:{}",
                username.green().bold(),
                hostname.cyan().bold(),
                session.disk.cursor().to_string().blue()
            )),
            DefaultPromptSegment::Basic("vfloppy".bright_blue().bold().to_string()),
        );

        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut session) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        } else if cmd == Command::Exit {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command or bad arguments. Type 'help' for command list."
                            .yellow()
                    ),
                }
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting floppy shell...".yellow());
                break;
            }
            Ok(_) => {
                println!();
                continue;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    println!("{}", "GoodBye!".bright_yellow());
    Ok(())
}

/// 在后台线程里加载镜像，前台用进度条展示
fn boot(image_path: &Path) -> Result<VirtualDisk, Box<dyn Error>> {
    println!("{}", "[Floppy Booting...]".bright_yellow().bold());

    let (tx, rx) = mpsc::channel();
    let path = image_path.to_path_buf();
    let worker = thread::spawn(move || perform_disk_initialization(path, tx));

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .map(|style| style.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut outcome = None;
    for message in rx {
        match message {
            BootProgress::Step(step) => pb.set_message(step),
            BootProgress::Progress(pos) => pb.set_position(pos),
            BootProgress::Finished(result) => outcome = Some(result),
        }
    }
    let _ = worker.join();

    match outcome {
        Some(Ok(disk)) => {
            pb.finish_with_message("✅ Ready!");
            Ok(disk)
        }
        Some(Err(e)) => {
            pb.abandon_with_message("❌ Boot failed");
            Err(e.into())
        }
        None => {
            pb.abandon();
            Err("disk initialization exited without a result".into())
        }
    }
}

fn welcome() -> Result<(), Box<dyn Error>> {
    let mut stdout = stdout();
    execute!(
        stdout,
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print(format!(
            "Virtual Floppy v{} (1.44M, 2 × 80 × 18 × 512)\n",
            env!("CARGO_PKG_VERSION")
        )),
        ResetColor
    )?;
    Ok(())
}
