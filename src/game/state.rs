//! Game state and the move engine.
//!
//! [`Game`] is the only mutator of the board. Every public operation either
//! succeeds or returns a [`GameError`] without changing anything observable.

use crate::error::{GameError, GameResult};
use crate::game::{Coord, Grid, Player, PlayerId};

/// Complete game state.
#[derive(Debug, Clone)]
pub struct Game {
    /// The board with its union-find nodes.
    grid: Grid,
    /// Player records, indexed by `player_id - 1`.
    players: Vec<Player>,
    /// Number of players.
    player_count: u32,
    /// Maximum number of areas any player may hold at once.
    max_areas: u32,
    /// Free fields on the whole board. Every one of them is a legal target
    /// for a player still below the area limit.
    free_fields: u64,
}

impl Game {
    /// Create a new game with an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidParameters`] if any argument is zero, and
    /// [`GameError::BoardTooLarge`] or [`GameError::Allocation`] if the board
    /// cannot be allocated.
    pub fn new(width: u32, height: u32, players: u32, max_areas: u32) -> GameResult<Self> {
        if width == 0 || height == 0 || players == 0 || max_areas == 0 {
            return Err(GameError::InvalidParameters);
        }

        let grid = Grid::new(width, height)?;

        let player_slots = usize::try_from(players).map_err(|_| GameError::Allocation)?;
        let mut records = Vec::new();
        records
            .try_reserve_exact(player_slots)
            .map_err(|_| GameError::Allocation)?;
        records.resize(player_slots, Player::new());

        Ok(Self {
            free_fields: grid.area(),
            grid,
            players: records,
            player_count: players,
            max_areas,
        })
    }

    /// Get the board.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Width of the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Height of the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Number of players.
    #[must_use]
    pub const fn player_count(&self) -> u32 {
        self.player_count
    }

    /// Maximum number of areas per player.
    #[must_use]
    pub const fn max_areas(&self) -> u32 {
        self.max_areas
    }

    /// Number of free fields on the whole board.
    #[must_use]
    pub const fn total_free_fields(&self) -> u64 {
        self.free_fields
    }

    /// Get a player record by ID.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&Player> {
        self.player_slot(player).ok().map(|slot| &self.players[slot])
    }

    /// Owner of a field (None when free or off the board).
    #[must_use]
    pub fn owner(&self, coord: Coord) -> Option<PlayerId> {
        self.grid.owner(coord)
    }

    /// Place a piece of `player` on a free field.
    ///
    /// # Errors
    ///
    /// Fails for an invalid player or coordinate, an occupied field, or when
    /// the field touches none of the player's areas and the player already
    /// holds the maximum number of areas.
    pub fn place(&mut self, player: PlayerId, coord: Coord) -> GameResult<()> {
        self.player_slot(player)?;
        let index = self.field_index(coord)?;
        if self.grid.owner_at(index).is_some() {
            return Err(GameError::FieldOccupied(coord));
        }

        let regions = self.check_claim(player, index)?;
        self.occupy(player, index, regions);
        Ok(())
    }

    /// Take an opponent's field with the player's one golden move.
    ///
    /// The victim's area containing the field may split; the move is
    /// rejected if that would leave the victim above the area limit.
    ///
    /// # Errors
    ///
    /// Fails for an invalid player or coordinate, a field that is free or
    /// already the player's, a spent golden move, an area limit violation
    /// for the acting player, or a split that is too large for the victim.
    pub fn golden_move(&mut self, player: PlayerId, coord: Coord) -> GameResult<()> {
        let slot = self.player_slot(player)?;
        let index = self.field_index(coord)?;
        let victim = match self.grid.owner_at(index) {
            Some(owner) if owner != player => owner,
            _ => return Err(GameError::NotOpponentField(coord)),
        };
        if self.players[slot].golden_used {
            return Err(GameError::GoldenMoveUsed(player));
        }

        // The split only rebuilds the victim's trees, so this stays valid.
        let regions = self.check_claim(player, index)?;
        let victim_areas = self.split_off(victim, index)?;

        let victim_slot = self.slot_of(victim);
        self.players[victim_slot].areas = victim_areas;
        self.players[victim_slot].busy_fields -= 1;
        self.free_fields += 1;

        self.occupy(player, index, regions);
        self.players[slot].golden_used = true;
        Ok(())
    }

    /// Whether `player` has any legal golden move.
    ///
    /// Simulates the split on every opponent field and reverts it, so this
    /// needs mutable access although the observable state never changes.
    pub fn golden_possible(&mut self, player: PlayerId) -> bool {
        let Ok(slot) = self.player_slot(player) else {
            return false;
        };
        if self.players[slot].golden_used {
            return false;
        }
        let can_open_area = self.players[slot].can_open_area(self.max_areas);

        for index in 0..self.grid.cells().len() {
            let victim = match self.grid.owner_at(index) {
                Some(owner) if owner != player => owner,
                _ => continue,
            };
            if !can_open_area && self.grid.count_adjacent(player, index) == 0 {
                continue;
            }
            if self.split_off(victim, index).is_ok() {
                self.restore(victim, index);
                return true;
            }
        }

        false
    }

    /// Number of fields held by `player` (0 for an invalid player).
    #[must_use]
    pub fn busy_fields(&self, player: PlayerId) -> u64 {
        self.player(player).map_or(0, |p| p.busy_fields)
    }

    /// Number of fields `player` could claim with a normal move
    /// (0 for an invalid player).
    #[must_use]
    pub fn free_fields(&self, player: PlayerId) -> u64 {
        let Some(record) = self.player(player) else {
            return 0;
        };
        if record.can_open_area(self.max_areas) {
            return self.free_fields;
        }

        (0..self.grid.cells().len())
            .filter(|&index| {
                self.grid.owner_at(index).is_none() && self.grid.count_adjacent(player, index) > 0
            })
            .count() as u64
    }

    /// Number of areas held by `player` (0 for an invalid player).
    #[must_use]
    pub fn area_count(&self, player: PlayerId) -> u32 {
        self.player(player).map_or(0, |p| p.areas)
    }

    /// Whether `player` has spent the golden move (false for an invalid player).
    #[must_use]
    pub fn golden_used(&self, player: PlayerId) -> bool {
        self.player(player).is_some_and(|p| p.golden_used)
    }

    /// Whether `player` has any legal normal or golden move.
    pub fn can_move(&mut self, player: PlayerId) -> bool {
        self.free_fields(player) > 0 || self.golden_possible(player)
    }

    /// Whether at least one player has a legal move.
    pub fn any_player_can_move(&mut self) -> bool {
        (1..=self.player_count).any(|player| self.can_move(player))
    }

    fn player_slot(&self, player: PlayerId) -> GameResult<usize> {
        if player == 0 || player > self.player_count {
            return Err(GameError::InvalidPlayer(player));
        }
        Ok(self.slot_of(player))
    }

    /// Record slot of a player already known to be valid.
    fn slot_of(&self, player: PlayerId) -> usize {
        debug_assert!(player >= 1 && player <= self.player_count);
        (player - 1) as usize
    }

    fn field_index(&self, coord: Coord) -> GameResult<usize> {
        self.grid
            .index_of(coord)
            .ok_or(GameError::OutOfBounds(coord))
    }

    /// Number of distinct areas of `player` next to the free field at
    /// `index`, or an error if claiming it would open one area too many.
    fn check_claim(&mut self, player: PlayerId, index: usize) -> GameResult<u32> {
        let regions = self.grid.distinct_neighbour_regions(player, index);
        let slot = self.slot_of(player);
        if regions == 0 && !self.players[slot].can_open_area(self.max_areas) {
            return Err(GameError::AreaLimit { player });
        }
        Ok(regions)
    }

    /// Claim the free field at `index` after [`Self::check_claim`] passed.
    fn occupy(&mut self, player: PlayerId, index: usize, regions: u32) {
        let slot = self.slot_of(player);
        self.grid.cell_mut(index).owner = Some(player);

        if regions == 0 {
            self.players[slot].areas += 1;
        } else {
            self.grid.merge_into_neighbours(player, index);
            self.players[slot].areas -= regions - 1;
        }

        self.players[slot].busy_fields += 1;
        self.free_fields -= 1;
    }

    /// Remove the field at `index` from `victim`'s area and rebuild the
    /// pieces around it. Returns the victim's new area count.
    ///
    /// On error the field is given back and the partition restored. On
    /// success the field is left free and no counters are touched.
    fn split_off(&mut self, victim: PlayerId, index: usize) -> GameResult<u32> {
        self.grid.rebuild_region(victim, index);
        self.grid.reset(index);

        let (adj, count) = self.grid.neighbours(index);
        for &n in &adj[..count as usize] {
            if self.grid.owner_at(n) == Some(victim) {
                self.grid.union_component(victim, n);
            }
        }

        let fragments = self.grid.distinct_neighbour_regions(victim, index);
        let areas = self.players[self.slot_of(victim)].areas + fragments - 1;
        if areas > self.max_areas {
            self.restore(victim, index);
            return Err(GameError::SplitExceedsLimit { victim });
        }

        Ok(areas)
    }

    /// Give a field emptied by [`Self::split_off`] back to `victim`.
    fn restore(&mut self, victim: PlayerId, index: usize) {
        self.grid.cell_mut(index).owner = Some(victim);
        self.grid.merge_into_neighbours(victim, index);
    }
}
