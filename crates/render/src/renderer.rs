use checkerlogo_scene::{CellColor, Scene};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene, including its camera, and produces output.
/// It never mutates the scene; motion is owned by the animation step.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene from its camera.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable description of one frame. Useful for CLI output,
/// logging, and testing the render interface without a GPU.
#[derive(Debug, Default, Clone)]
pub struct DebugTextRenderer {
    /// Also list every cell's world position.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let board = scene.board();
        let camera = scene.camera();
        let sun = scene.directional_light();
        let ambient = scene.ambient_light();

        let mut out = String::new();
        out.push_str(&format!("=== Checkerboard (frame={}) ===\n", scene.frame()));
        out.push_str(&format!(
            "Board: rotation={:.3} rad offset={:+.4}\n",
            board.rotation_y(),
            board.offset_y()
        ));
        out.push_str(&format!(
            "Cells: {} ({} white, {} black)\n",
            board.cell_count(),
            board.count_color(CellColor::White),
            board.count_color(CellColor::Black)
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_degrees
        ));
        out.push_str(&format!(
            "Lights: directional {} x{:.2} from ({:.1}, {:.1}, {:.1}), ambient {} x{:.2}\n",
            sun.color,
            sun.intensity,
            sun.position.x,
            sun.position.y,
            sun.position.z,
            ambient.color,
            ambient.intensity
        ));

        if self.verbose {
            for (cell, m) in board.cell_matrices() {
                let p = m.w_axis;
                out.push_str(&format!(
                    "  [{},{}] {:<5} pos=({:.2}, {:.2}, {:.2})\n",
                    cell.x,
                    cell.z,
                    cell.color.name(),
                    p.x,
                    p.y,
                    p.z
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_renderer_fresh_scene() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene);

        assert!(output.contains("frame=0"));
        assert!(output.contains("Cells: 16 (8 white, 8 black)"));
        assert!(output.contains("fov=75"));
        assert!(output.contains("ambient #404040"));
        assert!(!output.contains("pos="));
    }

    #[test]
    fn debug_renderer_lists_cells_when_verbose() {
        let mut scene = Scene::new();
        scene.advance(0.0);
        let output = DebugTextRenderer::verbose().render(&scene);

        assert!(output.contains("frame=1"));
        assert!(output.contains("rotation=0.010"));
        assert_eq!(output.matches("pos=").count(), 16);
        assert!(output.contains("[0,0] white"));
        assert!(output.contains("[0,1] black"));
    }
}
