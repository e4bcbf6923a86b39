use crate::animation::{ROTATION_STEP, bob_offset};
use crate::board::Board;
use crate::camera::PerspectiveCamera;
use crate::light::{AmbientLight, DirectionalLight};
use serde::{Deserialize, Serialize};

/// The complete logo scene: board, two lights, one camera.
///
/// Membership is fixed at construction. The only mutation is
/// [`Scene::advance`], which moves the board for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    board: Board,
    directional: DirectionalLight,
    ambient: AmbientLight,
    camera: PerspectiveCamera,
    /// Number of frames advanced since construction.
    frame: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            directional: DirectionalLight::default(),
            ambient: AmbientLight::default(),
            camera: PerspectiveCamera::default(),
            frame: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn directional_light(&self) -> &DirectionalLight {
        &self.directional
    }

    pub fn ambient_light(&self) -> &AmbientLight {
        &self.ambient
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Apply one frame of motion: spin by a fixed step, bob from the clock.
    pub fn advance(&mut self, now_ms: f64) {
        self.board.rotate_by(ROTATION_STEP);
        self.board.set_offset_y(bob_offset(now_ms));
        self.frame += 1;
        tracing::trace!(
            frame = self.frame,
            rotation = self.board.rotation_y(),
            offset = self.board.offset_y(),
            "scene advanced"
        );
    }
}
