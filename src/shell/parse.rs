use virtual_floppy::disk::SECTOR_TOTAL;

use crate::{
    shell::command::{Address, Command},
    utils::parse_byte,
};

fn parse_address(args: &[&str]) -> Option<Address> {
    Some(Address {
        sector: args.first()?.parse().ok()?,
        track: args.get(1)?.parse().ok()?,
        cylinder: args.get(2)?.parse().ok()?,
    })
}

/// 可选的扇区个数参数，缺省为 1，最多整盘
fn parse_count(arg: Option<&&str>) -> Option<usize> {
    match arg {
        Some(n) => n.parse().ok().filter(|&n| n <= SECTOR_TOTAL),
        None => Some(1),
    }
}

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "info" => Some(Command::Info),
        "pos" => Some(Command::Pos),
        "seek" => parse_address(args).map(Command::Seek),
        "read" => {
            let addr = parse_address(args)?;
            Some(Command::Read(addr, parse_count(args.get(3))?))
        }
        "write" => {
            let addr = parse_address(args)?;
            if args.len() < 4 {
                return None;
            }
            Some(Command::Write(addr, args[3..].join(" ")))
        }
        "fill" => {
            let addr = parse_address(args)?;
            let byte = parse_byte(args.get(3)?)?;
            Some(Command::Fill(addr, byte, parse_count(args.get(4))?))
        }
        "load" => Some(Command::Load(args.first().map(|p| p.to_string()))),
        "save" => Some(Command::Save(args.first().map(|p| p.to_string()))),
        "format" => Some(Command::Format),
        "stat" => Some(Command::Stat),
        "exit" | "quit" => Some(Command::Exit),
        _ => None,
    }
}
