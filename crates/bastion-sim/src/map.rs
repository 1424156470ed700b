//! Level grid: enemy path in world space and per-cell build rules.

use glam::Vec2;

use bastion_core::config::{GridPoint, LevelConfig};
use bastion_core::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cell {
    path: bool,
    blocked: bool,
    occupied: bool,
}

#[derive(Debug, Clone)]
pub struct GameMap {
    tile_size: f32,
    cols: u32,
    rows: u32,
    waypoints: Vec<Vec2>,
    cells: Vec<Cell>,
}

impl GameMap {
    /// Build the map for a level. Fails if the level does not validate.
    pub fn new(level: &LevelConfig) -> Result<Self, ConfigError> {
        level.validate()?;
        let mut map = Self {
            tile_size: level.tile_size,
            cols: level.cols,
            rows: level.rows,
            waypoints: Vec::with_capacity(level.path.len()),
            cells: vec![Cell::default(); level.cols as usize * level.rows as usize],
        };

        let waypoints: Vec<Vec2> = level.path.iter().map(|&p| map.cell_center(p)).collect();
        map.waypoints = waypoints;

        for pair in level.path.windows(2) {
            map.mark_segment(pair[0], pair[1]);
        }

        for (cell, &allowed) in map.cells.iter_mut().zip(&level.buildable) {
            cell.blocked = allowed == 0;
        }

        Ok(map)
    }

    /// Mark every cell from `start` to `end` inclusive. Segments are straight
    /// or 45 degree diagonals, so stepping by sign always lands on `end`.
    fn mark_segment(&mut self, start: GridPoint, end: GridPoint) {
        let dx = (end.x - start.x).signum();
        let dy = (end.y - start.y).signum();
        let mut current = start;
        loop {
            if let Some(i) = self.index(current) {
                self.cells[i].path = true;
            }
            if current == end {
                break;
            }
            current = GridPoint::new(current.x + dx, current.y + dy);
        }
    }

    fn index(&self, cell: GridPoint) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (x, y) = (cell.x as u32, cell.y as u32);
        (x < self.cols && y < self.rows).then(|| y as usize * self.cols as usize + x as usize)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Path waypoints as world-space cell centres.
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    pub fn spawn_point(&self) -> Option<Vec2> {
        self.waypoints.first().copied()
    }

    pub fn contains(&self, cell: GridPoint) -> bool {
        self.index(cell).is_some()
    }

    pub fn world_to_grid(&self, position: Vec2) -> GridPoint {
        GridPoint::new(
            (position.x / self.tile_size).floor() as i32,
            (position.y / self.tile_size).floor() as i32,
        )
    }

    pub fn cell_center(&self, cell: GridPoint) -> Vec2 {
        Vec2::new(
            cell.x as f32 * self.tile_size + self.tile_size / 2.0,
            cell.y as f32 * self.tile_size + self.tile_size / 2.0,
        )
    }

    pub fn is_path(&self, cell: GridPoint) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i].path)
    }

    /// In bounds, off the path and allowed by the level's mask.
    /// Occupancy is tracked separately.
    pub fn is_buildable(&self, cell: GridPoint) -> bool {
        self.index(cell)
            .is_some_and(|i| !self.cells[i].path && !self.cells[i].blocked)
    }

    pub fn is_occupied(&self, cell: GridPoint) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i].occupied)
    }

    pub fn set_occupied(&mut self, cell: GridPoint) {
        if let Some(i) = self.index(cell) {
            self.cells[i].occupied = true;
        }
    }

    pub fn clear_occupied(&mut self) {
        for cell in &mut self.cells {
            cell.occupied = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> LevelConfig {
        LevelConfig {
            id: 1,
            tile_size: 40.0,
            cols: 6,
            rows: 4,
            path: vec![
                GridPoint::new(0, 1),
                GridPoint::new(3, 1),
                GridPoint::new(3, 3),
                GridPoint::new(5, 3),
            ],
            buildable: Vec::new(),
        }
    }

    #[test]
    fn waypoints_are_cell_centres() {
        let map = GameMap::new(&level()).unwrap();
        assert_eq!(map.waypoints().len(), 4);
        assert_eq!(map.spawn_point(), Some(Vec2::new(20.0, 60.0)));
        assert_eq!(map.waypoints()[3], Vec2::new(220.0, 140.0));
    }

    #[test]
    fn path_cells_not_buildable() {
        let map = GameMap::new(&level()).unwrap();
        for x in 0..=3 {
            assert!(map.is_path(GridPoint::new(x, 1)));
        }
        assert!(map.is_path(GridPoint::new(3, 2)));
        assert!(map.is_path(GridPoint::new(4, 3)));
        assert!(!map.is_buildable(GridPoint::new(2, 1)));
        assert!(map.is_buildable(GridPoint::new(2, 0)));
        assert!(map.is_buildable(GridPoint::new(4, 1)));
    }

    #[test]
    fn diagonal_segment_marks_diagonal_cells() {
        let mut level = level();
        level.path = vec![GridPoint::new(0, 0), GridPoint::new(3, 3)];
        let map = GameMap::new(&level).unwrap();
        for i in 0..=3 {
            assert!(map.is_path(GridPoint::new(i, i)));
        }
        assert!(!map.is_path(GridPoint::new(1, 0)));
    }

    #[test]
    fn out_of_bounds_not_buildable() {
        let map = GameMap::new(&level()).unwrap();
        assert!(!map.is_buildable(GridPoint::new(-1, 0)));
        assert!(!map.is_buildable(GridPoint::new(6, 0)));
        assert!(!map.is_buildable(GridPoint::new(0, 4)));
        assert!(!map.contains(GridPoint::new(0, 4)));
    }

    #[test]
    fn buildable_mask_restricts() {
        let mut level = level();
        level.buildable = vec![1; 24];
        level.buildable[0] = 0;
        let map = GameMap::new(&level).unwrap();
        assert!(!map.is_buildable(GridPoint::new(0, 0)));
        assert!(map.is_buildable(GridPoint::new(1, 0)));
    }

    #[test]
    fn world_grid_conversion() {
        let map = GameMap::new(&level()).unwrap();
        assert_eq!(map.world_to_grid(Vec2::new(85.0, 39.9)), GridPoint::new(2, 0));
        assert_eq!(map.world_to_grid(Vec2::new(-1.0, 0.0)), GridPoint::new(-1, 0));
        let cell = GridPoint::new(4, 2);
        assert_eq!(map.world_to_grid(map.cell_center(cell)), cell);
    }

    #[test]
    fn occupancy() {
        let mut map = GameMap::new(&level()).unwrap();
        let cell = GridPoint::new(1, 0);
        assert!(!map.is_occupied(cell));
        map.set_occupied(cell);
        assert!(map.is_occupied(cell));
        map.clear_occupied();
        assert!(!map.is_occupied(cell));
    }

    #[test]
    fn oversized_grid_is_an_error() {
        let mut level = level();
        level.cols = 70_000;
        level.rows = 70_000;
        assert!(matches!(
            GameMap::new(&level),
            Err(ConfigError::InvalidLevel { id: 1, .. })
        ));
    }
}
