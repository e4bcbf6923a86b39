use checkerlogo_common::{Color, Transform};
use glam::{Mat4, Quat, Vec3};
use std::f64::consts::TAU;
use serde::{Deserialize, Serialize};

/// Number of cells along each side of the board.
pub const GRID_SIZE: u8 = 4;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Color of a single board cell, alternating by lattice parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellColor {
    White,
    Black,
}

impl CellColor {
    /// Checkerboard parity: even `x + z` is white.
    pub fn for_lattice(x: u8, z: u8) -> Self {
        if (x + z) % 2 == 0 {
            CellColor::White
        } else {
            CellColor::Black
        }
    }

    pub fn color(self) -> Color {
        match self {
            CellColor::White => Color::WHITE,
            CellColor::Black => Color::BLACK,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CellColor::White => "white",
            CellColor::Black => "black",
        }
    }
}

/// Axis-aligned box dimensions shared by every cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxShape {
    /// The thin slab used for board cells.
    pub const CELL: BoxShape = BoxShape {
        width: 1.0,
        height: 0.1,
        depth: 1.0,
    };

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth) * 0.5
    }
}

/// One square of the board, addressed by its lattice coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: u8,
    pub z: u8,
    pub color: CellColor,
}

impl GridCell {
    fn new(x: u8, z: u8) -> Self {
        Self {
            x,
            z,
            color: CellColor::for_lattice(x, z),
        }
    }

    /// Offset from the board origin; the lattice is centered at zero.
    pub fn local_offset(&self) -> Vec3 {
        let center = (f32::from(GRID_SIZE) - 1.0) / 2.0;
        Vec3::new(f32::from(self.x) - center, 0.0, f32::from(self.z) - center)
    }
}

/// The 4×4 group of cells, moved as one rigid body.
///
/// The cell list is fixed at construction; only the group rotation and
/// vertical offset change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<GridCell>,
    shape: BoxShape,
    /// Accumulated in f64 so the fixed step survives long uptimes.
    rotation_y: f64,
    offset_y: f32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Build the board: x-major, then z, matching the lattice order.
    pub fn new() -> Self {
        let cells = (0..GRID_SIZE)
            .flat_map(|x| (0..GRID_SIZE).map(move |z| GridCell::new(x, z)))
            .collect();
        Self {
            cells,
            shape: BoxShape::CELL,
            rotation_y: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn count_color(&self, color: CellColor) -> usize {
        self.cells.iter().filter(|c| c.color == color).count()
    }

    pub fn shape(&self) -> &BoxShape {
        &self.shape
    }

    /// Accumulated rotation about +Y, in radians. Not wrapped.
    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub(crate) fn rotate_by(&mut self, radians: f64) {
        self.rotation_y += radians;
    }

    pub(crate) fn set_offset_y(&mut self, offset: f32) {
        self.offset_y = offset;
    }

    /// Group transform applied to every cell.
    pub fn transform(&self) -> Transform {
        Transform {
            position: Vec3::new(0.0, self.offset_y, 0.0),
            rotation: Quat::from_rotation_y(self.rotation_y.rem_euclid(TAU) as f32),
            scale: Vec3::ONE,
        }
    }

    /// World matrix of each cell, in cell order.
    pub fn cell_matrices(&self) -> impl Iterator<Item = (&GridCell, Mat4)> + '_ {
        let group = self.transform().matrix();
        self.cells
            .iter()
            .map(move |cell| (cell, group * Mat4::from_translation(cell.local_offset())))
    }
}
