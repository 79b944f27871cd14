mod autoplay;
mod host;
mod registry;

use tracing_subscriber::EnvFilter;

use ardjump_core::game_registry::GameId;

use host::{HostOptions, run_session};
use registry::GameRegistry;

/// Read `--game=`, `--seed=`, `--ticks=`, `--balance=` and `--realtime`.
/// Unparseable values keep their defaults.
fn parse_args(args: impl Iterator<Item = String>) -> Result<HostOptions, String> {
    let mut options = HostOptions::default();
    for arg in args {
        if let Some(name) = arg.strip_prefix("--game=") {
            options.game = name.parse::<GameId>().map_err(|e| e.to_string())?;
        } else if let Some(seed) = arg.strip_prefix("--seed=") {
            options.seed = seed.parse().unwrap_or(options.seed);
        } else if let Some(ticks) = arg.strip_prefix("--ticks=") {
            options.max_ticks = ticks.parse().unwrap_or(options.max_ticks);
        } else if let Some(balance) = arg.strip_prefix("--balance=") {
            options.balance = balance.parse().ok();
        } else if arg == "--realtime" {
            options.realtime = true;
        } else {
            tracing::warn!("ignoring unknown argument {arg}");
        }
    }
    Ok(options)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        },
    };

    let registry = GameRegistry::new();
    let Some(mut game) = registry.create(options.game) else {
        tracing::error!("game {} is not registered", options.game);
        std::process::exit(2);
    };

    let meta = game.metadata();
    tracing::info!(
        "Ard Jump sim starting {} (seed {}, {} games available)",
        meta.name,
        options.seed,
        registry.available_games()
    );

    let summary = run_session(game.as_mut(), &options).await;
    for entry in &summary.results {
        println!("entity {}: {}", entry.entity, entry.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_args(args(&[
            "--game=bounce",
            "--seed=9",
            "--ticks=120",
            "--balance=300",
            "--realtime",
        ]))
        .unwrap();
        assert_eq!(options.game, GameId::Bounce);
        assert_eq!(options.seed, 9);
        assert_eq!(options.max_ticks, 120);
        assert_eq!(options.balance, Some(300));
        assert!(options.realtime);
    }

    #[test]
    fn bad_numbers_keep_defaults() {
        let options = parse_args(args(&["--seed=abc", "--ticks=-1"])).unwrap();
        assert_eq!(options.seed, 0);
        assert_eq!(options.max_ticks, HostOptions::default().max_ticks);
    }

    #[test]
    fn unknown_game_is_an_error() {
        let err = parse_args(args(&["--game=poker"])).unwrap_err();
        assert!(err.contains("poker"));
    }
}
