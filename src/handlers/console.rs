use crate::error::{AppError, AppResult};
use crate::models::PrizeUpdate;
use crate::services::WheelService;
use crate::storage::Storage;

/// 控制台命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Spin,
    /// 动画结束信号
    Stop,
    Prizes,
    History,
    Add,
    Remove(i64),
    Set(i64, PrizeUpdate),
    Export,
    Import(String),
    Unlimited(bool),
    Next,
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "commands: spin | stop | prizes | history | add | remove <id> | \
set <id> value|weight|color <v> | export | import <json> | unlimited on|off | next | reset | help | quit";

pub fn parse_command(line: &str) -> AppResult<Command> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let cmd = match name.to_ascii_lowercase().as_str() {
        "spin" => Command::Spin,
        "stop" => Command::Stop,
        "prizes" => Command::Prizes,
        "history" => Command::History,
        "add" => Command::Add,
        "remove" => Command::Remove(parse_id(rest)?),
        "set" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let id = parse_id(parts.next().unwrap_or_default())?;
            let field = parts.next().unwrap_or_default();
            let raw = parts.next().unwrap_or_default().trim();
            let update = match field {
                "value" => PrizeUpdate::Value(raw.parse().map_err(|_| {
                    AppError::ValidationError(format!("Invalid value: {raw}"))
                })?),
                // 非数字权重按 0 处理
                "weight" => PrizeUpdate::Weight(raw.parse().unwrap_or(0.0)),
                "color" => PrizeUpdate::Color(raw.to_string()),
                other => {
                    return Err(AppError::ValidationError(format!("Unknown field: {other}")));
                }
            };
            Command::Set(id, update)
        }
        "export" => Command::Export,
        "import" => Command::Import(rest.to_string()),
        "unlimited" => match rest {
            "on" => Command::Unlimited(true),
            "off" => Command::Unlimited(false),
            _ => return Err(AppError::ValidationError("Usage: unlimited on|off".into())),
        },
        "next" => Command::Next,
        "reset" => Command::Reset,
        "help" | "" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(AppError::ValidationError(format!("Unknown command: {other}"))),
    };
    Ok(cmd)
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ValidationError(format!("Invalid prize id: {raw}")))
}

/// 执行命令并返回要展示的文本；错误转换为用户提示
pub fn handle<S: Storage>(service: &mut WheelService<S>, cmd: Command) -> String {
    match execute(service, cmd) {
        Ok(out) => out,
        Err(e) => e.user_message(),
    }
}

fn execute<S: Storage>(service: &mut WheelService<S>, cmd: Command) -> AppResult<String> {
    let out = match cmd {
        Command::Spin => {
            let outcome = service.spin()?;
            match outcome.spins_left {
                Some(left) => format!(
                    "Spinning to #{} ... ({left} spins left)",
                    outcome.index
                ),
                None => format!("Spinning to #{} ... (free play)", outcome.index),
            }
        }
        Command::Stop => {
            let record = service.finish_spin()?;
            format!("Congratulations! You won {}", record.label)
        }
        Command::Prizes => service
            .prizes()
            .iter()
            .map(|p| format!("{:>4}  {:>14}  {:>6.2}%  {}", p.id, p.label, p.weight, p.color))
            .collect::<Vec<_>>()
            .join("\n"),
        Command::History => {
            if service.history().is_empty() {
                "No spins yet.".to_string()
            } else {
                service
                    .history()
                    .iter()
                    .map(|h| format!("{}  {}", h.label, h.date))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        Command::Add => {
            let prize = service.add_prize()?;
            format!("Added prize {}", prize.id)
        }
        Command::Remove(id) => {
            service.remove_prize(id)?;
            format!("Removed prize {id}")
        }
        Command::Set(id, update) => {
            let prize = service.update_prize(id, update)?;
            format!("Prize {}: {} / {:.2}% / {}", prize.id, prize.label, prize.weight, prize.color)
        }
        Command::Export => service.export_config()?,
        Command::Import(raw) => {
            if service.import_config(&raw)? {
                format!("Imported {} prizes", service.prizes().len())
            } else {
                "Config ignored, previous prizes kept".to_string()
            }
        }
        Command::Unlimited(enabled) => {
            service.set_unlimited_spins(enabled)?;
            format!("Free play {}", if enabled { "on" } else { "off" })
        }
        Command::Next => {
            service.next_turn()?;
            format!("New turn: {} spins", service.spins_left())
        }
        Command::Reset => {
            service.reset_all()?;
            "History and spins reset".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WheelConfig;
    use crate::storage::MemoryStorage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn service() -> WheelService<MemoryStorage> {
        WheelService::with_rng(WheelConfig::default(), MemoryStorage::new(), StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("spin").unwrap(), Command::Spin);
        assert_eq!(parse_command("  REMOVE 3 ").unwrap(), Command::Remove(3));
        assert_eq!(
            parse_command("set 2 value 15000").unwrap(),
            Command::Set(2, PrizeUpdate::Value(15_000))
        );
        assert_eq!(
            parse_command("set 2 weight abc").unwrap(),
            Command::Set(2, PrizeUpdate::Weight(0.0))
        );
        assert_eq!(
            parse_command("set 2 color #00FF00").unwrap(),
            Command::Set(2, PrizeUpdate::Color("#00FF00".into()))
        );
        assert_eq!(parse_command("unlimited on").unwrap(), Command::Unlimited(true));
        assert_eq!(
            parse_command(r#"import [{"id":1}]"#).unwrap(),
            Command::Import(r#"[{"id":1}]"#.into())
        );
        assert_eq!(parse_command("").unwrap(), Command::Help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("remove x").is_err());
        assert!(parse_command("set 1 size 3").is_err());
        assert!(parse_command("unlimited maybe").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_handle_spin_cycle() {
        let mut svc = service();
        assert!(handle(&mut svc, Command::Spin).contains("4 spins left"));
        assert_eq!(handle(&mut svc, Command::Spin), "The wheel is still spinning");
        assert!(handle(&mut svc, Command::Stop).starts_with("Congratulations!"));
        assert_eq!(handle(&mut svc, Command::History).lines().count(), 1);
    }

    #[test]
    fn test_handle_remove_refusal_message() {
        let mut svc = service();
        for id in 1..=4 {
            handle(&mut svc, Command::Remove(id));
        }
        assert_eq!(
            handle(&mut svc, Command::Remove(5)),
            "At least 2 prizes are required"
        );
        assert_eq!(handle(&mut svc, Command::Prizes).lines().count(), 2);
    }
}
