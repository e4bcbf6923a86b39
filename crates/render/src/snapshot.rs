use crate::renderer::Renderer;
use checkerlogo_scene::{CellColor, Scene};
use serde::Serialize;

/// Machine-readable state of one rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub rotation_y: f64,
    pub offset_y: f32,
    pub cells: Vec<CellSnapshot>,
}

/// One cell in world space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub x: u8,
    pub z: u8,
    pub color: CellColor,
    pub position: [f32; 3],
}

/// Renders a scene into a [`FrameSnapshot`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotRenderer;

impl Renderer for SnapshotRenderer {
    type Output = FrameSnapshot;

    fn render(&self, scene: &Scene) -> FrameSnapshot {
        let board = scene.board();
        let cells = board
            .cell_matrices()
            .map(|(cell, m)| CellSnapshot {
                x: cell.x,
                z: cell.z,
                color: cell.color,
                position: m.w_axis.truncate().to_array(),
            })
            .collect();

        FrameSnapshot {
            frame: scene.frame(),
            rotation_y: board.rotation_y(),
            offset_y: board.offset_y(),
            cells,
        }
    }
}
