use std::fmt::Write;

use crate::plan::{BlendMode, FramePlan};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer consumes a finished frame plan and never reorders it: the
/// plan's command order is the submission order.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, plan: &FramePlan) -> Self::Output;
}

/// Produces a human-readable listing of a frame plan.
///
/// Useful for CLI output, logging, and testing draw order without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &FramePlan) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (eye=({:.2}, {:.2}, {:.2}), commands={}) ===",
            plan.eye.x,
            plan.eye.y,
            plan.eye.z,
            plan.commands.len()
        );

        for (i, cmd) in plan.commands.iter().enumerate() {
            let p = cmd.origin();
            let pass = match cmd.blend {
                BlendMode::Opaque => "opaque",
                BlendMode::AlphaBlend => "blend",
            };
            let _ = write!(
                out,
                "  {i:>2} [{pass:<6}] {:<9} {:<11} pos=({:.2}, {:.2}, {:.2})",
                format!("{:?}", cmd.mesh),
                format!("{:?}", cmd.texture),
                p.x,
                p.y,
                p.z
            );
            if cmd.blend == BlendMode::AlphaBlend {
                let _ = write!(out, " dist={:.2}", p.distance(plan.eye));
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scene;
    use alchemy_camera::Camera;
    use alchemy_common::{DistanceMetric, ProjectionConfig};
    use glam::{Mat4, Vec3};

    #[test]
    fn debug_renderer_empty_plan() {
        let plan = FramePlan {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            eye: Vec3::ZERO,
            commands: Vec::new(),
        };
        let output = DebugTextRenderer::new().render(&plan);
        assert!(output.contains("commands=0"));
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn debug_renderer_lists_demo_frame() {
        let mut scene = Scene::demo(DistanceMetric::Euclidean);
        let plan = scene.plan_frame(&Camera::default(), 4.0 / 3.0, &ProjectionConfig::default());
        let output = DebugTextRenderer::new().render(&plan);

        assert!(output.contains("eye=(0.00, 0.00, 3.00)"));
        assert_eq!(output.lines().count(), 1 + 13);
        assert_eq!(output.matches("[blend ]").count(), 5);

        let first_blend = output.lines().find(|l| l.contains("[blend ]")).unwrap();
        assert!(first_blend.contains("pos=(-0.30, 0.00, -2.30)"));
        assert!(first_blend.contains("dist=5.31"));
    }
}
