use env_logger::{Env, Target};
use std::io::{BufRead, Write};
use chrono::Local;  // timestamp in log lines

use lucky_wheel::{
    config::Config,
    handlers::{self, Command, HELP},
    services::WheelService,
    storage::FileStorage,
};

fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stderr)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 打开本地存储
    let storage = FileStorage::open(&config.storage).expect("Failed to open data directory");

    let mut service = WheelService::new(config.wheel.clone(), storage);
    log::info!(
        "Lucky wheel ready: {} prizes, data dir {}",
        service.prizes().len(),
        config.storage.data_dir
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{HELP}")?;

    for line in stdin.lock().lines() {
        let line = line?;
        let output = match handlers::parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(cmd) => handlers::handle(&mut service, cmd),
            Err(e) => e.user_message(),
        };
        writeln!(stdout, "{output}")?;
        stdout.flush()?;
    }

    Ok(())
}
