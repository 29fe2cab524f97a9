use std::env;

use minesweeper_plugin::{GameParams, HostEvent, Placement};
use rand::{SeedableRng, rngs::StdRng};
use tracing::warn;

/// Startup settings read from `MINESWEEPER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub params: GameParams,
    pub placement: Placement,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = GameParams::default();
        let number = |key: &str, default: usize| -> usize {
            lookup(key)
                .unwrap_or_else(|| default.to_string())
                .parse()
                .unwrap_or(default)
        };

        let placement = match lookup("MINESWEEPER_PLACEMENT").as_deref() {
            None | Some("distinct") => Placement::Distinct,
            Some("independent") => Placement::Independent,
            Some(other) => {
                warn!("Unknown MINESWEEPER_PLACEMENT {:?}, using distinct", other);
                Placement::Distinct
            }
        };

        Self {
            params: GameParams {
                width: number("MINESWEEPER_WIDTH", defaults.width),
                height: number("MINESWEEPER_HEIGHT", defaults.height),
                mines: number("MINESWEEPER_MINES", defaults.mines),
            },
            placement,
            seed: lookup("MINESWEEPER_SEED").and_then(|seed| seed.parse().ok()),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Field edits that bring a freshly opened tab to this configuration.
    pub fn initial_events(&self) -> [HostEvent; 3] {
        [
            HostEvent::SetWidth {
                value: self.params.width,
            },
            HostEvent::SetHeight {
                value: self.params.height,
            },
            HostEvent::SetMines {
                value: self.params.mines,
            },
        ]
    }
}
