#![no_main]

//! Move sequence fuzzer.
//!
//! Applies arbitrary normal and golden moves to a small board and checks
//! after every step that:
//! 1. The invariant checker finds nothing
//! 2. Rejected moves leave the rendered board unchanged
//! 3. The golden move query agrees with a real attempt on a copy

use arbitrary::Arbitrary;
use gamma::game::check_invariants;
use gamma::{Coord, Game};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated engine call.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzCommand {
    /// Normal move.
    Move { player: u8, x: u8, y: u8 },
    /// Golden move.
    Golden { player: u8, x: u8, y: u8 },
    /// Golden move possibility query.
    Query { player: u8 },
}

/// Structured input for move fuzzing.
#[derive(Arbitrary, Debug)]
struct MovesInput {
    width: u8,
    height: u8,
    players: u8,
    max_areas: u8,
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: MovesInput| {
    // Cap values to avoid excessive runtime
    let width = u32::from(input.width % 12) + 1;
    let height = u32::from(input.height % 12) + 1;
    let players = u32::from(input.players % 6) + 1;
    let max_areas = u32::from(input.max_areas % 5) + 1;

    let Ok(mut game) = Game::new(width, height, players, max_areas) else {
        return;
    };

    for command in input.commands.into_iter().take(200) {
        let Ok(before) = game.board() else {
            return;
        };
        let result = match command {
            FuzzCommand::Move { player, x, y } => {
                game.place(u32::from(player), Coord::new(u32::from(x), u32::from(y)))
            }
            FuzzCommand::Golden { player, x, y } => {
                game.golden_move(u32::from(player), Coord::new(u32::from(x), u32::from(y)))
            }
            FuzzCommand::Query { player } => {
                let player = u32::from(player);
                let expected = (0..height).any(|y| {
                    (0..width).any(|x| game.clone().golden_move(player, Coord::new(x, y)).is_ok())
                });
                assert_eq!(game.golden_possible(player), expected);
                Ok(())
            }
        };

        if result.is_err() {
            assert_eq!(game.board().ok(), Some(before), "rejected {command:?} changed the board");
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "after {command:?}: {violations:?}");
    }
});
