//! Spatial Grid
//!
//! Rectangular, optionally toroidal grid holding at most one agent per cell,
//! with Von Neumann neighbourhood queries.

use bevy_ecs::prelude::*;
use cv_events::GridPos;
use std::collections::HashSet;

use crate::error::GridError;

/// Occupancy map from cell to agent entity.
///
/// Cells are indexed `y * width + x`.
#[derive(Resource, Debug, Clone)]
pub struct SpatialGrid {
    width: u32,
    height: u32,
    torus: bool,
    cells: Vec<Option<Entity>>,
}

impl SpatialGrid {
    /// Create an empty grid. Dimensions are checked by `ModelParams::validate`.
    pub fn new(width: u32, height: u32, torus: bool) -> Self {
        Self {
            width,
            height,
            torus,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_torus(&self) -> bool {
        self.torus
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: GridPos) -> Result<usize, GridError> {
        if !self.contains(pos) {
            return Err(GridError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Every cell, column by column.
    pub fn coords(&self) -> impl Iterator<Item = GridPos> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| GridPos::new(x, y)))
    }

    /// Cells within Manhattan distance `radius` of `center`, excluding the centre.
    ///
    /// Offsets wrap on a torus and are dropped at the edges otherwise. On small
    /// tori several offsets can land on the same cell; each cell is listed once.
    pub fn neighborhood(&self, center: GridPos, radius: u32) -> Vec<GridPos> {
        let r = radius as i64;
        let (w, h) = (self.width as i64, self.height as i64);
        let mut seen = HashSet::new();
        let mut cells = Vec::new();

        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs() + dy.abs() > r || (dx == 0 && dy == 0) {
                    continue;
                }
                let (mut x, mut y) = (center.x as i64 + dx, center.y as i64 + dy);
                if self.torus {
                    x = x.rem_euclid(w);
                    y = y.rem_euclid(h);
                } else if x < 0 || y < 0 || x >= w || y >= h {
                    continue;
                }
                let pos = GridPos::new(x as u32, y as u32);
                if pos != center && seen.insert(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// The agent in a cell, if any. Out-of-bounds cells are reported empty.
    pub fn occupant(&self, pos: GridPos) -> Option<Entity> {
        self.index(pos).ok().and_then(|i| self.cells[i])
    }

    /// Agents found in the given cells, in the order of `cells`.
    pub fn occupants(&self, cells: &[GridPos]) -> Vec<(GridPos, Entity)> {
        cells
            .iter()
            .filter_map(|&pos| self.occupant(pos).map(|entity| (pos, entity)))
            .collect()
    }

    pub fn is_empty(&self, pos: GridPos) -> bool {
        self.contains(pos) && self.occupant(pos).is_none()
    }

    /// All empty cells, column by column.
    pub fn empty_cells(&self) -> Vec<GridPos> {
        self.coords().filter(|&pos| self.is_empty(pos)).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Put an agent in an empty cell.
    pub fn place(&mut self, entity: Entity, pos: GridPos) -> Result<(), GridError> {
        let i = self.index(pos)?;
        if self.cells[i].is_some() {
            return Err(GridError::CellOccupied(pos));
        }
        self.cells[i] = Some(entity);
        Ok(())
    }

    /// Take the agent out of a cell, leaving it empty.
    pub fn remove(&mut self, pos: GridPos) -> Result<Entity, GridError> {
        let i = self.index(pos)?;
        self.cells[i].take().ok_or(GridError::EmptyCell(pos))
    }

    /// Move the agent at `from` into the empty cell `to`.
    pub fn move_agent(&mut self, from: GridPos, to: GridPos) -> Result<(), GridError> {
        let src = self.index(from)?;
        let dst = self.index(to)?;
        if self.cells[dst].is_some() {
            return Err(GridError::CellOccupied(to));
        }
        let entity = self.cells[src].take().ok_or(GridError::EmptyCell(from))?;
        self.cells[dst] = Some(entity);
        Ok(())
    }
}
