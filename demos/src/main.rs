use anyhow::{Result, bail};
use observable::scheduler::TokioScheduler;
use std::str::FromStr;
use tracing::Level;

mod scenarios;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // LOG_LEVEL overrides the default level
    let level = match std::env::var("LOG_LEVEL") {
        Ok(level) => Level::from_str(&level)?,
        Err(_) => Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let selected = match std::env::args().nth(1) {
        None => None,
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) if (1..=scenarios::TITLES.len()).contains(&n) => Some(n),
            _ => bail!("unknown scenario {arg:?}, expected a number from 1 to {}", scenarios::TITLES.len()),
        },
    };

    let scheduler = TokioScheduler::try_current()?;
    for (index, title) in scenarios::TITLES.iter().enumerate() {
        let number = index + 1;
        if selected.is_some_and(|n| n != number) {
            continue;
        }
        println!("--- Example {number}: {title}");
        scenarios::run(number, scheduler.clone()).await;
        println!();
    }

    Ok(())
}
