use colored::*;
use dialoguer::Confirm;
use std::{error::Error, fs, path::PathBuf};

use virtual_floppy::disk::{
    Chs, VirtualDisk, CYLINDER_COUNT, DISK_SIZE, SECTORS_PER_TRACK, SECTOR_SIZE, SECTOR_TOTAL,
    TRACKS_PER_CYLINDER,
};

use crate::utils::{format_timestamp, hex_dump};

/// 命令行里输入的原始地址，越界值交给磁盘去截断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub sector: i64,
    pub track: i64,
    pub cylinder: i64,
}

impl Address {
    pub fn to_chs(self) -> Chs {
        Chs::new(self.sector, self.track, self.cylinder)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Info,
    Pos,
    Seek(Address),
    Read(Address, usize),
    Write(Address, String),
    Fill(Address, u8, usize),
    Load(Option<String>),
    Save(Option<String>),
    Format,
    Stat,
    Exit,
}

/// 一次 shell 会话持有的状态
#[derive(Debug)]
pub struct Session {
    pub disk: VirtualDisk,
    pub image_path: PathBuf,
    pub dirty: bool,
}

impl Session {
    pub fn new(disk: VirtualDisk, image_path: PathBuf) -> Self {
        Self {
            disk,
            image_path,
            dirty: false,
        }
    }

    fn target(&self, path: &Option<String>) -> PathBuf {
        path.as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.image_path.clone())
    }
}

pub fn execute_command(cmd: &Command, session: &mut Session) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => print_help(),
        Command::Info => print_info(session),
        Command::Pos => println!("📍 {}", session.disk.cursor().to_string().cyan()),
        Command::Seek(addr) => {
            let pos = session.disk.seek(addr.sector, addr.track, addr.cylinder);
            println!("📍 Moved to {}", pos.to_string().cyan());
        }
        Command::Read(addr, count) => {
            let start = addr.to_chs();
            let bytes = session.disk.read_at(start, (*count).min(SECTOR_TOTAL));
            println!(
                "📖 {} sector(s) from {}",
                bytes.len() / SECTOR_SIZE,
                start.to_string().cyan()
            );
            print!("{}", hex_dump(&bytes));
            println!(
                "{} {}",
                "cursor now at".bright_black(),
                session.disk.cursor().to_string().bright_black()
            );
        }
        Command::Write(addr, text) => {
            let start = addr.to_chs();
            session.disk.write_at(start, text.as_bytes());
            session.dirty = true;
            println!(
                "✏️  Wrote {} bytes at {}",
                text.len(),
                start.to_string().cyan()
            );
        }
        Command::Fill(addr, byte, count) => {
            let start = addr.to_chs();
            let data = vec![*byte; (*count).clamp(1, SECTOR_TOTAL) * SECTOR_SIZE];
            session.disk.write_at(start, &data);
            session.dirty = true;
            println!(
                "✏️  Filled {} sector(s) from {} with 0x{:02x}",
                data.len() / SECTOR_SIZE,
                start.to_string().cyan(),
                byte
            );
        }
        Command::Load(path) => {
            let target = session.target(path);
            if session.dirty && !confirm("Discard unsaved changes?")? {
                println!("{}", "Load cancelled.".yellow());
                return Ok(());
            }
            session.disk.load(&target)?;
            session.dirty = target != session.image_path;
            println!(
                "💾 Loaded {} ({} sector(s) in use)",
                target.display().to_string().green(),
                session.disk.used_sectors()
            );
        }
        Command::Save(path) => {
            let target = session.target(path);
            if target != session.image_path
                && target.exists()
                && !confirm(&format!("Overwrite {}?", target.display()))?
            {
                println!("{}", "Save cancelled.".yellow());
                return Ok(());
            }
            session.disk.save(&target)?;
            if target == session.image_path {
                session.dirty = false;
            }
            println!("✅ Saved to {}", target.display().to_string().green());
        }
        Command::Format => {
            if !confirm("Zero the whole floppy?")? {
                println!("{}", "Format cancelled.".yellow());
                return Ok(());
            }
            session.disk.reset();
            session.dirty = true;
            println!("{}", "✅ Floppy formatted (not saved yet).".green());
        }
        Command::Stat => {
            let meta = fs::metadata(&session.image_path)?;
            let modified = meta
                .modified()
                .map(format_timestamp)
                .unwrap_or_else(|_| "unknown".to_string());
            println!(
                "{}\n{}: {}\n{}: {} bytes (expected {})\n{}: {}\n",
                "📊 Image Info".bright_yellow().bold(),
                "Path".blue(),
                session.image_path.display(),
                "Size".blue(),
                meta.len(),
                DISK_SIZE,
                "Modified".blue(),
                modified
            );
        }
        Command::Exit => {
            if session.dirty && confirm("Save changes before exiting?")? {
                let path = session.image_path.clone();
                session.disk.save(&path)?;
                session.dirty = false;
                println!("✅ Saved to {}", path.display().to_string().green());
            }
            println!("{}", "👋 Exiting floppy shell...".yellow().bold());
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, Box<dyn Error>> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn print_info(session: &Session) {
    println!("{}", "💽 Virtual Floppy".bright_cyan().bold());
    println!(
        "  {}: {} cylinders × {} tracks × {} sectors × {} bytes",
        "Geometry".blue(),
        CYLINDER_COUNT,
        TRACKS_PER_CYLINDER,
        SECTORS_PER_TRACK,
        SECTOR_SIZE
    );
    println!(
        "  {}: {} sectors, {} bytes",
        "Capacity".blue(),
        SECTOR_TOTAL,
        DISK_SIZE
    );
    println!(
        "  {}: {} / {} sectors",
        "In use".blue(),
        session.disk.used_sectors(),
        SECTOR_TOTAL
    );
    println!("  {}: {}", "Cursor".blue(), session.disk.cursor());
    println!(
        "  {}: {}{}",
        "Image".blue(),
        session.image_path.display(),
        if session.dirty {
            " (unsaved changes)".yellow().to_string()
        } else {
            String::new()
        }
    );
}

fn print_help() {
    println!("{}", "📘 Floppy Shell Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  info                          Show geometry and usage
  pos                           Print the cursor
  seek <sec> <trk> <cyl>        Move the cursor (out-of-range values are clamped)
  read <sec> <trk> <cyl> [n]    Hex dump n sectors (default 1)
  write <sec> <trk> <cyl> <str> Write a string
  fill <sec> <trk> <cyl> <byte> [n]
                                Fill n sectors with one byte (decimal or 0x..)
  load [path]                   Reload the image (default: current image)
  save [path]                   Save the image (default: current image)
  format                        Zero the whole floppy
  stat                          Show image file info
  help                          Show this help message
  exit                          Quit the shell
"
        .bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floppy.img");
        (dir, Session::new(VirtualDisk::new(), path))
    }

    fn addr(sector: i64, track: i64, cylinder: i64) -> Address {
        Address {
            sector,
            track,
            cylinder,
        }
    }

    #[test]
    fn write_marks_session_dirty_and_moves_cursor() {
        let (_dir, mut s) = session();
        execute_command(&Command::Write(addr(3, 1, 0), "abc".to_string()), &mut s).unwrap();

        assert!(s.dirty);
        assert_eq!(&s.disk.sector(Chs::new(3, 1, 0))[..3], b"abc");
        assert_eq!(s.disk.cursor(), Chs::new(3, 1, 0));
    }

    #[test]
    fn fill_then_read_advances_cursor() {
        let (_dir, mut s) = session();
        execute_command(&Command::Fill(addr(1, 0, 0), 0xAB, 2), &mut s).unwrap();
        execute_command(&Command::Read(addr(1, 0, 0), 2), &mut s).unwrap();

        assert!(s.disk.sector(Chs::new(2, 0, 0)).iter().all(|&b| b == 0xAB));
        assert_eq!(s.disk.cursor(), Chs::new(3, 0, 0));
    }

    #[test]
    fn seek_clamps_out_of_range_address() {
        let (_dir, mut s) = session();
        execute_command(&Command::Seek(addr(40, -2, 9)), &mut s).unwrap();
        assert_eq!(s.disk.cursor(), Chs::new(18, 0, 1));
    }

    #[test]
    fn read_from_clamped_address_leaves_cursor_after_it() {
        let (_dir, mut s) = session();
        execute_command(&Command::Read(addr(40, -2, 9), 1), &mut s).unwrap();
        assert_eq!(s.disk.cursor(), Chs::new(1, 1, 0));
    }

    #[test]
    fn fill_never_exceeds_one_disk_worth_of_sectors() {
        let (_dir, mut s) = session();
        execute_command(&Command::Fill(addr(1, 0, 0), 0x5A, usize::MAX), &mut s).unwrap();
        assert_eq!(s.disk.used_sectors(), SECTOR_TOTAL);
        assert_eq!(s.disk.cursor(), Chs::ORIGIN);
    }

    #[test]
    fn save_to_own_image_clears_dirty_flag() {
        let (_dir, mut s) = session();
        execute_command(&Command::Fill(addr(1, 0, 0), 1, 1), &mut s).unwrap();
        execute_command(&Command::Save(None), &mut s).unwrap();

        assert!(!s.dirty);
        assert_eq!(fs::metadata(&s.image_path).unwrap().len(), DISK_SIZE);
        execute_command(&Command::Stat, &mut s).unwrap();
    }

    #[test]
    fn load_from_missing_file_is_an_error() {
        let (_dir, mut s) = session();
        let result = execute_command(&Command::Load(None), &mut s);
        assert!(result.is_err());
    }
}
