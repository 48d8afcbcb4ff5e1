//! End-of-game summary formatting.

use gamma::{Game, PlayerId};
use serde::Serialize;

use super::{CliError, SummaryFormat};

/// JSON-serializable game summary.
#[derive(Debug, Serialize)]
pub(crate) struct Summary {
    /// Board width.
    pub(crate) width: u32,
    /// Board height.
    pub(crate) height: u32,
    /// Fields nobody owns.
    pub(crate) free_fields: u64,
    /// Per-player results.
    pub(crate) players: Vec<PlayerSummary>,
}

/// JSON-serializable player result.
#[derive(Debug, Serialize)]
pub(crate) struct PlayerSummary {
    /// Player id (1-based).
    pub(crate) id: PlayerId,
    /// Fields owned at the end.
    pub(crate) busy_fields: u64,
    /// Areas held at the end.
    pub(crate) areas: u32,
    /// Whether the golden move was spent.
    pub(crate) golden_used: bool,
}

impl Summary {
    /// Collect the summary of a finished game.
    pub(crate) fn from_game(game: &Game) -> Self {
        Self {
            width: game.width(),
            height: game.height(),
            free_fields: game.total_free_fields(),
            players: (1..=game.player_count())
                .map(|id| PlayerSummary {
                    id,
                    busy_fields: game.busy_fields(id),
                    areas: game.area_count(id),
                    golden_used: game.golden_used(id),
                })
                .collect(),
        }
    }

    /// Render in the requested format, newline terminated.
    pub(crate) fn render(&self, format: SummaryFormat) -> Result<String, CliError> {
        match format {
            SummaryFormat::Text => Ok(self.format_text()),
            SummaryFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    fn format_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Game Result ({}x{}, {} free)\n",
            self.width, self.height, self.free_fields
        ));
        for player in &self.players {
            output.push_str(&format!(
                "  PLAYER {} {} fields, {} areas",
                player.id, player.busy_fields, player.areas
            ));
            if player.golden_used {
                output.push_str(" [golden used]");
            }
            output.push('\n');
        }

        output
    }
}
