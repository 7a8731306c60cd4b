//! Static tile terrain and swept rectangle resolution.
//!
//! A [`TileMap`] is a grid of square cells anchored at the world origin,
//! row 0 at the bottom. Moving boxes are resolved against it one axis at a
//! time: first horizontally at the box's previous height, then vertically at
//! the corrected horizontal position. Separating the axes is what lets a body
//! slide along a wall or a floor without snagging on the seams between cells.
//!
//! Each axis pass sweeps the whole span travelled this tick, so a fast body
//! cannot skip over a cell thinner than its step.

use glam::Vec2;
use ledge_math::Rect;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Overlaps thinner than this are treated as contact, not penetration.
pub const CONTACT_EPSILON: f32 = 1e-3;

/// Errors raised while building a tile map.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {ch:?} at line {line}, column {column}")]
    UnknownTile { ch: char, line: usize, column: usize },

    #[error("invalid tile map JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something a moving box can collide with.
pub trait Terrain {
    /// Resolve `new`, the box after this tick's movement, against solid
    /// terrain given `last`, the same box before the movement. Returns the
    /// corrected box. A box that touches nothing comes back unchanged.
    fn resolve(&self, last: Rect, new: Rect) -> Rect;

    /// The translation [`Terrain::resolve`] applies to `new`.
    fn correction(&self, last: Rect, new: Rect) -> Vec2 {
        self.resolve(last, new).position() - new.position()
    }
}

/// Serialised form: tile size plus ASCII rows, top row first.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TileMapData {
    tile_size: f32,
    rows: Vec<String>,
}

/// A grid of solid and empty square cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TileMapData", into = "TileMapData")]
pub struct TileMap {
    tile_size: f32,
    cols: usize,
    rows: usize,
    /// Row-major, row 0 at the bottom.
    solid: Vec<bool>,
}

impl TileMap {
    /// An empty map of `cols × rows` cells.
    ///
    /// # Errors
    ///
    /// [`TerrainError::InvalidTileSize`] unless `tile_size` is positive and finite.
    pub fn new(cols: usize, rows: usize, tile_size: f32) -> Result<Self, TerrainError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(TerrainError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            tile_size,
            cols,
            rows,
            solid: vec![false; cols * rows],
        })
    }

    /// Build a map from ASCII art. The first non-empty line is the top row;
    /// `#` is solid, `.` and space are empty. Zero-length lines are skipped,
    /// so a row of spaces still counts as a row.
    ///
    /// # Errors
    ///
    /// [`TerrainError::RaggedRow`] if lines differ in length,
    /// [`TerrainError::UnknownTile`] for any other character, and
    /// [`TerrainError::InvalidTileSize`] as for [`TileMap::new`].
    pub fn from_ascii(tile_size: f32, text: &str) -> Result<Self, TerrainError> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        let mut map = Self::new(cols, lines.len(), tile_size)?;

        for (line, text) in lines.iter().enumerate() {
            let found = text.chars().count();
            if found != cols {
                return Err(TerrainError::RaggedRow {
                    row: line,
                    expected: cols,
                    found,
                });
            }
            let row = map.rows - 1 - line;
            for (column, ch) in text.chars().enumerate() {
                match ch {
                    '#' => map.solid[row * cols + column] = true,
                    '.' | ' ' => {}
                    _ => return Err(TerrainError::UnknownTile { ch, line, column }),
                }
            }
        }
        Ok(map)
    }

    /// Parse a map from its JSON form: `{ "tile_size": 16, "rows": ["..."] }`.
    ///
    /// # Errors
    ///
    /// [`TerrainError::Json`] for malformed JSON or any error from
    /// [`TileMap::from_ascii`] wrapped as a JSON error.
    pub fn from_json(json: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the edge length of one cell in world units.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Mark a cell solid or empty. Returns `false` if it is outside the grid.
    pub fn set_solid(&mut self, col: usize, row: usize, solid: bool) -> bool {
        if col >= self.cols || row >= self.rows {
            return false;
        }
        self.solid[row * self.cols + col] = solid;
        true
    }

    /// Whether a cell is solid. Cells outside the grid are empty.
    #[must_use]
    pub fn is_solid(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.solid[row * self.cols + col]
    }

    /// World-space box of a cell.
    #[must_use]
    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Whether `rect` penetrates any solid cell by more than [`CONTACT_EPSILON`].
    #[must_use]
    pub fn overlaps_solid(&self, rect: Rect) -> bool {
        !self.solid_cells(rect).is_empty()
    }

    /// Indices of the cells along one axis whose extent overlaps the open
    /// interval `(lo, hi)` shrunk by [`CONTACT_EPSILON`] at both ends.
    fn span(&self, lo: f32, hi: f32, count: usize) -> Option<(usize, usize)> {
        let (lo, hi) = (lo + CONTACT_EPSILON, hi - CONTACT_EPSILON);
        if hi <= lo || count == 0 {
            return None;
        }
        let first = (lo / self.tile_size).floor().max(0.0);
        let last = ((hi / self.tile_size).ceil() - 1.0).min(count as f32 - 1.0);
        if last < first {
            return None;
        }
        Some((first as usize, last as usize))
    }

    /// Boxes of the solid cells that `region` penetrates.
    fn solid_cells(&self, region: Rect) -> Vec<Rect> {
        let (Some((c0, c1)), Some((r0, r1))) = (
            self.span(region.left(), region.right(), self.cols),
            self.span(region.bottom(), region.top(), self.rows),
        ) else {
            return Vec::new();
        };
        let mut cells = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                if self.is_solid(col, row) {
                    cells.push(self.cell_rect(col, row));
                }
            }
        }
        cells
    }

    /// Move `start` horizontally to `target_x`, stopping at the first solid
    /// cell face in the direction of travel. Returns the resolved `x`.
    fn sweep_x(&self, start: Rect, target_x: f32) -> f32 {
        let dx = target_x - start.x;
        if dx == 0.0 {
            return target_x;
        }
        let target = start.at(Vec2::new(target_x, start.y));
        let cells = self.solid_cells(start.union(&target));

        if dx > 0.0 {
            let wall = cells
                .iter()
                .map(Rect::left)
                .filter(|&left| left >= start.right() - CONTACT_EPSILON)
                .fold(f32::INFINITY, f32::min);
            if wall < target.right() {
                return wall - start.w;
            }
        } else {
            let wall = cells
                .iter()
                .map(Rect::right)
                .filter(|&right| right <= start.left() + CONTACT_EPSILON)
                .fold(f32::NEG_INFINITY, f32::max);
            if wall > target.left() {
                return wall;
            }
        }
        target_x
    }

    /// Vertical counterpart of [`TileMap::sweep_x`]. Returns the resolved `y`.
    fn sweep_y(&self, start: Rect, target_y: f32) -> f32 {
        let dy = target_y - start.y;
        if dy == 0.0 {
            return target_y;
        }
        let target = start.at(Vec2::new(start.x, target_y));
        let cells = self.solid_cells(start.union(&target));

        if dy > 0.0 {
            let ceiling = cells
                .iter()
                .map(Rect::bottom)
                .filter(|&bottom| bottom >= start.top() - CONTACT_EPSILON)
                .fold(f32::INFINITY, f32::min);
            if ceiling < target.top() {
                return ceiling - start.h;
            }
        } else {
            let floor = cells
                .iter()
                .map(Rect::top)
                .filter(|&top| top <= start.bottom() + CONTACT_EPSILON)
                .fold(f32::NEG_INFINITY, f32::max);
            if floor > target.bottom() {
                return floor;
            }
        }
        target_y
    }

    /// Push a box that already penetrates terrain out along whichever of
    /// the four axis directions frees it with the shortest move. Ties prefer
    /// up, then down, right, left.
    fn push_out(&self, rect: Rect) -> Rect {
        if !self.overlaps_solid(rect) {
            return rect;
        }
        let candidates = [
            self.escape(rect, Direction::Up),
            self.escape(rect, Direction::Down),
            self.escape(rect, Direction::Right),
            self.escape(rect, Direction::Left),
        ];
        let mut best = rect;
        let mut best_distance = f32::INFINITY;
        for candidate in candidates.into_iter().flatten() {
            let distance = (candidate.position() - rect.position()).length();
            if distance < best_distance {
                best = candidate;
                best_distance = distance;
            }
        }
        trace!(from = ?rect, to = ?best, "pushed box out of terrain");
        best
    }

    /// Slide `rect` in `direction` past every solid cell it overlaps until it
    /// overlaps none. Each step lands on a grid line strictly beyond the
    /// previous position, so once the box has left the grid (where every
    /// cell is empty) the search ends.
    fn escape(&self, mut rect: Rect, direction: Direction) -> Option<Rect> {
        let steps = match direction {
            Direction::Up | Direction::Down => self.rows,
            Direction::Right | Direction::Left => self.cols,
        };
        for _ in 0..=steps {
            let cells = self.solid_cells(rect);
            if cells.is_empty() {
                return Some(rect);
            }
            match direction {
                Direction::Up => rect.y = cells.iter().map(Rect::top).fold(f32::NEG_INFINITY, f32::max),
                Direction::Down => {
                    rect.y = cells.iter().map(Rect::bottom).fold(f32::INFINITY, f32::min) - rect.h;
                }
                Direction::Right => {
                    rect.x = cells.iter().map(Rect::right).fold(f32::NEG_INFINITY, f32::max);
                }
                Direction::Left => {
                    rect.x = cells.iter().map(Rect::left).fold(f32::INFINITY, f32::min) - rect.w;
                }
            }
        }
        self.solid_cells(rect).is_empty().then_some(rect)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Terrain for TileMap {
    fn resolve(&self, last: Rect, new: Rect) -> Rect {
        // The box may have been resized this tick; sweep with the new size.
        let start = Rect::new(last.x, last.y, new.w, new.h);
        let x = self.sweep_x(start, new.x);
        let y = self.sweep_y(start.at(Vec2::new(x, start.y)), new.y);
        self.push_out(new.at(Vec2::new(x, y)))
    }
}

impl TryFrom<TileMapData> for TileMap {
    type Error = TerrainError;

    fn try_from(data: TileMapData) -> Result<Self, Self::Error> {
        Self::from_ascii(data.tile_size, &data.rows.join("\n"))
    }
}

impl From<TileMap> for TileMapData {
    fn from(map: TileMap) -> Self {
        let rows = (0..map.rows)
            .rev()
            .map(|row| {
                (0..map.cols)
                    .map(|col| if map.is_solid(col, row) { '#' } else { '.' })
                    .collect()
            })
            .collect();
        Self {
            tile_size: map.tile_size,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: &str = "\
..........
..........
##########";

    fn map(text: &str) -> TileMap {
        TileMap::from_ascii(16.0, text).unwrap()
    }

    #[test]
    fn test_ascii_top_line_is_top_row() {
        let m = map("#.\n.#");
        assert_eq!((m.cols(), m.rows()), (2, 2));
        assert!(m.is_solid(0, 1));
        assert!(m.is_solid(1, 0));
        assert!(!m.is_solid(0, 0));
        assert!(!m.is_solid(5, 5));
    }

    #[test]
    fn test_ascii_errors() {
        assert!(matches!(
            TileMap::from_ascii(16.0, "##\n#"),
            Err(TerrainError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            TileMap::from_ascii(16.0, "#x"),
            Err(TerrainError::UnknownTile { ch: 'x', .. })
        ));
        assert!(matches!(
            TileMap::from_ascii(0.0, "#"),
            Err(TerrainError::InvalidTileSize(_))
        ));
    }

    #[test]
    fn test_json_form() {
        let m = TileMap::from_json("{ \"tile_size\": 8, \"rows\": [\"#..\", \"###\"] }").unwrap();
        assert_eq!(m.tile_size(), 8.0);
        assert!(m.is_solid(0, 1));
        assert!(!m.is_solid(1, 1));
        assert!(m.is_solid(2, 0));

        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["rows"][0], "#..");
        assert!(TileMap::from_json("{ \"tile_size\": 8, \"rows\": [\"#\", \"##\"] }").is_err());
    }

    #[test]
    fn test_free_movement_is_untouched() {
        let m = map(FLOOR);
        let last = Rect::new(20.0, 30.0, 8.0, 8.0);
        let new = last.translated(Vec2::new(3.5, -2.25));
        assert_eq!(m.resolve(last, new), new);
        assert_eq!(m.correction(last, new), Vec2::ZERO);
    }

    #[test]
    fn test_landing_snaps_to_floor_top() {
        let m = map(FLOOR);
        let last = Rect::new(20.0, 18.0, 8.0, 8.0);
        let new = Rect::new(21.0, 13.0, 8.0, 8.0);
        let resolved = m.resolve(last, new);
        assert_eq!(resolved.y, 16.0);
        assert_eq!(resolved.x, 21.0);
        assert!(m.correction(last, new).y > 0.0);
    }

    #[test]
    fn test_ceiling_pushes_down() {
        let m = map("##########\n..........\n..........");
        let last = Rect::new(20.0, 20.0, 8.0, 8.0);
        let new = Rect::new(20.0, 36.0, 8.0, 8.0);
        let resolved = m.resolve(last, new);
        assert_eq!(resolved.top(), 32.0);
        assert!(m.correction(last, new).y < 0.0);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let m = map("....#\n....#\n....#");
        let last = Rect::new(50.0, 10.0, 8.0, 8.0);
        let new = Rect::new(60.0, 10.0, 8.0, 8.0);
        let resolved = m.resolve(last, new);
        assert_eq!(resolved.right(), 64.0);
        assert_eq!(resolved.y, 10.0);

        let back = Rect::new(66.0, 10.0, 8.0, 8.0);
        let left_wall = map("#....\n#....\n#....");
        assert_eq!(left_wall.resolve(back, back.at(Vec2::new(10.0, 10.0))).x, 16.0);
    }

    #[test]
    fn test_fast_body_does_not_tunnel() {
        // A single-cell wall; the body would jump clean over it in one step.
        let m = map("...#......");
        let last = Rect::new(0.0, 4.0, 8.0, 8.0);
        let new = Rect::new(100.0, 4.0, 8.0, 8.0);
        assert_eq!(m.resolve(last, new).right(), 48.0);
    }

    #[test]
    fn test_walking_on_floor_does_not_catch_seams() {
        let m = map(FLOOR);
        let mut last = Rect::new(0.0, 16.0, 8.0, 8.0);
        for _ in 0..40 {
            let new = last.translated(Vec2::new(3.0, 0.0));
            let resolved = m.resolve(last, new);
            assert_eq!(resolved, new);
            last = resolved;
        }
    }

    #[test]
    fn test_sliding_down_a_wall_keeps_falling() {
        let m = map("....#\n....#\n....#");
        let last = Rect::new(56.0, 30.0, 8.0, 8.0);
        let new = Rect::new(58.0, 26.0, 8.0, 8.0);
        let resolved = m.resolve(last, new);
        assert_eq!(resolved.x, 56.0);
        assert_eq!(resolved.y, 26.0);
    }

    #[test]
    fn test_box_starting_inside_terrain_is_pushed_out() {
        let m = map(FLOOR);
        let inside = Rect::new(40.0, 12.0, 8.0, 8.0);
        let resolved = m.resolve(inside, inside);
        assert_eq!(resolved.y, 16.0);
        assert!(!m.overlaps_solid(resolved));
    }

    #[test]
    fn test_box_deep_inside_a_block_always_escapes() {
        let mut rows = vec![".".repeat(20)];
        rows.extend(std::iter::repeat_n("#".repeat(20), 20));
        let m = map(&rows.join("\n"));
        let inside = Rect::new(150.0, 150.0, 16.0, 16.0);
        assert!(m.overlaps_solid(inside));

        let resolved = m.resolve(inside, inside);
        assert!(!m.overlaps_solid(resolved), "still inside at {resolved:?}");
        // Only one axis moves.
        assert!(resolved.x == inside.x || resolved.y == inside.y);
    }

    #[test]
    fn test_push_out_picks_the_shortest_way() {
        let m = map("..........\n..#####...\n..#####...\n..........");
        // Two pixels into the block's top face.
        let inside = Rect::new(48.0, 46.0, 8.0, 8.0);
        assert_eq!(m.resolve(inside, inside), Rect::new(48.0, 48.0, 8.0, 8.0));
        // Three pixels into its right face.
        let inside = Rect::new(109.0, 24.0, 8.0, 8.0);
        assert_eq!(m.resolve(inside, inside), Rect::new(112.0, 24.0, 8.0, 8.0));
    }

    #[test]
    fn test_outside_grid_is_empty() {
        let m = map(FLOOR);
        let last = Rect::new(-100.0, -100.0, 8.0, 8.0);
        let new = last.translated(Vec2::new(-5.0, -5.0));
        assert_eq!(m.resolve(last, new), new);
    }
}
