//! Game invariants - consistency checks that detect engine bugs.
//!
//! Everything here is re-derived from the raw ownership grid, independently
//! of the union-find structure the engine maintains. A violation always
//! means a bug in the engine, never an illegal move.

use std::collections::HashMap;

use crate::game::{Game, Grid, PlayerId};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(game: &Game) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let grid = game.grid();

    check_cell_owners(game, &mut violations);
    check_field_counts(game, &mut violations);
    check_regions(game, &mut violations);

    if let Some((coord, _)) = grid.iter().find(|(_, cell)| cell.visited) {
        violations.push(InvariantViolation {
            message: format!("Field {coord:?} is still marked visited"),
        });
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(game: &Game) {
    let violations = check_invariants(game);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_game: &Game) {}

fn check_cell_owners(game: &Game, violations: &mut Vec<InvariantViolation>) {
    for (coord, cell) in game.grid().iter() {
        match cell.owner {
            Some(owner) if owner == 0 || owner > game.player_count() => {
                violations.push(InvariantViolation {
                    message: format!("Field {coord:?} is owned by unknown player {owner}"),
                });
            }
            _ => {}
        }
    }
}

fn check_field_counts(game: &Game, violations: &mut Vec<InvariantViolation>) {
    let grid = game.grid();

    let free = grid.cells().iter().filter(|cell| cell.owner.is_none()).count() as u64;
    if free != game.total_free_fields() {
        violations.push(InvariantViolation {
            message: format!(
                "Free field counter {} but {free} fields are free",
                game.total_free_fields()
            ),
        });
    }

    let mut busy_total = 0u64;
    for player in 1..=game.player_count() {
        let owned = grid
            .cells()
            .iter()
            .filter(|cell| cell.owner == Some(player))
            .count() as u64;
        busy_total += game.busy_fields(player);
        if owned != game.busy_fields(player) {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {player} busy counter {} but owns {owned} fields",
                    game.busy_fields(player)
                ),
            });
        }
    }

    if busy_total + game.total_free_fields() != grid.area() {
        violations.push(InvariantViolation {
            message: format!(
                "Busy fields {busy_total} plus free fields {} do not cover the board of {}",
                game.total_free_fields(),
                grid.area()
            ),
        });
    }
}

fn check_regions(game: &Game, violations: &mut Vec<InvariantViolation>) {
    let grid = game.grid();
    let component = label_components(grid);

    // Root of each owned cell, following parents without compressing.
    let mut roots = vec![usize::MAX; grid.cells().len()];
    for (idx, cell) in grid.cells().iter().enumerate() {
        if cell.owner.is_none() {
            continue;
        }
        match root_of(grid, idx) {
            Some(root) if grid.cell(root).owner == cell.owner => roots[idx] = root,
            Some(root) => violations.push(InvariantViolation {
                message: format!(
                    "Field {:?} of player {:?} has root {:?} of player {:?}",
                    grid.coord_of(idx),
                    cell.owner,
                    grid.coord_of(root),
                    grid.cell(root).owner
                ),
            }),
            None => violations.push(InvariantViolation {
                message: format!("Parent links from {:?} do not reach a root", grid.coord_of(idx)),
            }),
        }
    }

    // Trees and connected components must coincide.
    let mut tree_of_component = HashMap::new();
    let mut component_of_tree = HashMap::new();
    for (idx, (&root, &comp)) in roots.iter().zip(&component).enumerate() {
        if root == usize::MAX {
            continue;
        }
        if *tree_of_component.entry(comp).or_insert(root) != root
            || *component_of_tree.entry(root).or_insert(comp) != comp
        {
            violations.push(InvariantViolation {
                message: format!(
                    "Union-find tree at {:?} does not match its connected area",
                    grid.coord_of(idx)
                ),
            });
        }
    }

    for player in 1..=game.player_count() {
        let areas = count_areas(grid, &component, player);
        let recorded = game.area_count(player);
        if areas != u64::from(recorded) {
            violations.push(InvariantViolation {
                message: format!("Player {player} records {recorded} areas but holds {areas}"),
            });
        }
        if recorded > game.max_areas() {
            violations.push(InvariantViolation {
                message: format!(
                    "Player {player} holds {recorded} areas, above the limit {}",
                    game.max_areas()
                ),
            });
        }
    }
}

/// Root reached by following parent links, or None on a cycle.
fn root_of(grid: &Grid, mut idx: usize) -> Option<usize> {
    for _ in 0..=grid.cells().len() {
        let parent = grid.cell(idx).parent;
        if parent == idx {
            return Some(idx);
        }
        idx = parent;
    }
    None
}

/// Label every owned field with the id of its 4-connected same-owner area.
/// Free fields get `usize::MAX`.
fn label_components(grid: &Grid) -> Vec<usize> {
    let mut label = vec![usize::MAX; grid.cells().len()];
    let mut next = 0;

    for start in 0..grid.cells().len() {
        let Some(owner) = grid.cell(start).owner else {
            continue;
        };
        if label[start] != usize::MAX {
            continue;
        }

        let mut stack = vec![start];
        label[start] = next;
        while let Some(current) = stack.pop() {
            let (adj, count) = grid.neighbours(current);
            for &n in &adj[..count as usize] {
                if label[n] == usize::MAX && grid.cell(n).owner == Some(owner) {
                    label[n] = next;
                    stack.push(n);
                }
            }
        }
        next += 1;
    }

    label
}

fn count_areas(grid: &Grid, component: &[usize], player: PlayerId) -> u64 {
    let mut seen: Vec<usize> = grid
        .cells()
        .iter()
        .zip(component)
        .filter(|(cell, _)| cell.owner == Some(player))
        .map(|(_, &comp)| comp)
        .collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Coord;

    fn create_valid_game() -> Game {
        let mut game = Game::new(4, 4, 2, 2).unwrap();
        game.place(1, Coord::new(0, 0)).unwrap();
        game.place(1, Coord::new(1, 0)).unwrap();
        game.place(2, Coord::new(3, 3)).unwrap();
        game.place(2, Coord::new(1, 3)).unwrap();
        game
    }

    #[test]
    fn test_valid_game_passes() {
        let game = create_valid_game();
        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_empty_board_passes() {
        let game = Game::new(5, 5, 3, 1).unwrap();
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_golden_move_keeps_invariants() {
        let mut game = Game::new(3, 3, 2, 2).unwrap();
        for x in 0..3 {
            game.place(2, Coord::new(x, 1)).unwrap();
        }
        game.golden_move(1, Coord::new(1, 1)).unwrap();
        assert_invariants(&game);
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_stale_visited_mark_detected() {
        let mut game = create_valid_game();
        game.grid_mut().cell_mut(5).visited = true;

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("visited"));
    }

    #[test]
    fn test_split_tree_detected() {
        let mut game = create_valid_game();
        // Detach (1,0) from (0,0) although they are adjacent.
        game.grid_mut().make_singleton(0);
        game.grid_mut().make_singleton(1);

        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("does not match")));
    }

    #[test]
    fn test_wrong_busy_counter_detected() {
        let mut game = create_valid_game();
        game.grid_mut().cell_mut(10).owner = Some(1);

        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("busy counter")));
        assert!(violations.iter().any(|v| v.message.contains("Free field counter")));
    }

    #[test]
    fn test_wrong_area_count_detected() {
        let mut game = create_valid_game();
        // Player 2's two fields are joined by hand into one tree and one
        // connected area would need (2,3) as well.
        game.grid_mut().cell_mut(14).owner = Some(2);
        game.grid_mut().union(14, 13);
        game.grid_mut().union(14, 15);

        let violations = check_invariants(&game);
        assert!(violations.iter().any(|v| v.message.contains("records 2 areas but holds 1")));
    }
}
