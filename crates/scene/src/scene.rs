use alchemy_camera::Camera;
use alchemy_common::{DistanceMetric, ProjectionConfig};
use alchemy_transparency::TransparentSet;
use glam::{Mat4, Vec3};

use crate::plan::{DrawCommand, FramePlan, MeshKind, TextureSlot};

/// Window billboard positions of the demo scene.
pub fn demo_billboards() -> [Vec3; 5] {
    [
        Vec3::new(-1.5, 0.0, -0.48),
        Vec3::new(1.5, 0.0, 0.51),
        Vec3::new(0.0, 0.0, 0.7),
        Vec3::new(-0.3, 0.0, -2.3),
        Vec3::new(0.5, 0.0, -0.6),
    ]
}

/// A fixed set of opaque draws plus the transparent billboards.
#[derive(Debug, Clone)]
pub struct Scene {
    opaque: Vec<DrawCommand>,
    transparent: TransparentSet,
}

impl Scene {
    pub fn new(opaque: Vec<DrawCommand>, transparent: TransparentSet) -> Self {
        Self {
            opaque,
            transparent,
        }
    }

    /// The demo room: a floor, five tinted panels closing a 10-unit room,
    /// two cubes, and five window billboards.
    pub fn demo(metric: DistanceMetric) -> Self {
        let panel = |translation: Vec3, rotation: Mat4, tint: Vec3| {
            DrawCommand::opaque(
                MeshKind::Plane,
                TextureSlot::Floor,
                Mat4::from_translation(translation) * rotation,
            )
            .with_tint(tint)
        };

        let opaque = vec![
            panel(Vec3::new(0.0, -0.5, 0.0), Mat4::IDENTITY, Vec3::ONE),
            panel(
                Vec3::new(5.0, 4.5, 0.0),
                Mat4::from_rotation_z(90f32.to_radians()),
                Vec3::new(0.25, 0.25, 1.0),
            ),
            panel(
                Vec3::new(-5.0, 4.5, 0.0),
                Mat4::from_rotation_z(-90f32.to_radians()),
                Vec3::new(1.0, 0.25, 0.25),
            ),
            panel(
                Vec3::new(0.0, 4.5, -5.0),
                Mat4::from_rotation_x(90f32.to_radians()),
                Vec3::new(0.25, 1.0, 0.25),
            ),
            panel(
                Vec3::new(0.0, 9.5, 0.0),
                Mat4::from_rotation_x(180f32.to_radians()),
                Vec3::new(1.0, 1.0, 0.25),
            ),
            panel(
                Vec3::new(0.0, 4.5, 5.0),
                Mat4::from_rotation_x(-90f32.to_radians()),
                Vec3::new(1.0, 0.25, 1.0),
            ),
            DrawCommand::opaque(
                MeshKind::Cube,
                TextureSlot::Cube,
                Mat4::from_translation(Vec3::new(-1.0, 0.0, -1.0)),
            ),
            DrawCommand::opaque(
                MeshKind::Cube,
                TextureSlot::Cube,
                Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            ),
        ];

        Self::new(
            opaque,
            TransparentSet::with_metric(demo_billboards(), metric),
        )
    }

    pub fn opaque(&self) -> &[DrawCommand] {
        &self.opaque
    }

    /// Billboards in the order of the last planned frame.
    pub fn transparent(&self) -> &TransparentSet {
        &self.transparent
    }

    /// Re-sort the billboards for `camera` and list the frame's draws:
    /// opaque geometry first, then billboards farthest to nearest.
    pub fn plan_frame(
        &mut self,
        camera: &Camera,
        aspect: f32,
        projection: &ProjectionConfig,
    ) -> FramePlan {
        let _span = tracing::trace_span!("plan_frame").entered();

        let eye = camera.position();
        self.transparent.update(eye);

        let mut commands = Vec::with_capacity(self.opaque.len() + self.transparent.len());
        commands.extend_from_slice(&self.opaque);
        commands.extend(
            self.transparent
                .iter()
                .map(|object| DrawCommand::billboard(object.coords())),
        );

        FramePlan {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect, projection),
            eye,
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlendMode;

    fn plan_from(position: Vec3) -> FramePlan {
        let mut scene = Scene::demo(DistanceMetric::Euclidean);
        scene.plan_frame(&Camera::new(position), 4.0 / 3.0, &ProjectionConfig::default())
    }

    #[test]
    fn demo_scene_contents() {
        let scene = Scene::demo(DistanceMetric::Euclidean);
        assert_eq!(scene.opaque().len(), 8);
        assert_eq!(scene.transparent().len(), 5);
        assert!(scene.opaque().iter().all(|c| c.blend == BlendMode::Opaque));
        let cubes = scene
            .opaque()
            .iter()
            .filter(|c| c.mesh == MeshKind::Cube)
            .count();
        assert_eq!(cubes, 2);
    }

    #[test]
    fn ceiling_faces_down() {
        let scene = Scene::demo(DistanceMetric::Euclidean);
        let ceiling = scene
            .opaque()
            .iter()
            .find(|c| c.origin().y > 9.0)
            .unwrap();
        let normal = ceiling.model.transform_vector3(Vec3::Y);
        assert!((normal - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn opaque_before_blended() {
        let plan = plan_from(Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(plan.commands.len(), 13);
        let first_blend = plan
            .commands
            .iter()
            .position(|c| c.blend == BlendMode::AlphaBlend)
            .unwrap();
        assert_eq!(first_blend, 8);
        assert!(
            plan.commands[first_blend..]
                .iter()
                .all(|c| c.blend == BlendMode::AlphaBlend)
        );
    }

    #[test]
    fn billboards_drawn_back_to_front() {
        let plan = plan_from(Vec3::new(0.0, 0.0, 3.0));
        let order: Vec<_> = plan.blended().map(|c| c.origin()).collect();
        assert_eq!(order[0], Vec3::new(-0.3, 0.0, -2.3));
        assert_eq!(order[4], Vec3::new(0.0, 0.0, 0.7));

        let distances: Vec<f32> = order
            .iter()
            .map(|p| p.distance(plan.eye))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn order_changes_with_camera() {
        let behind = plan_from(Vec3::new(0.0, 0.0, -6.0));
        let order: Vec<_> = behind.blended().map(|c| c.origin()).collect();
        assert_eq!(order[0], Vec3::new(0.0, 0.0, 0.7));
        assert_eq!(order[4], Vec3::new(-0.3, 0.0, -2.3));
    }

    #[test]
    fn plan_carries_camera_matrices() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let mut scene = Scene::demo(DistanceMetric::Squared);
        let projection = ProjectionConfig::default();
        let plan = scene.plan_frame(&camera, 1.5, &projection);
        assert_eq!(plan.eye, camera.position());
        assert_eq!(plan.view, camera.view_matrix());
        assert_eq!(plan.projection, camera.projection_matrix(1.5, &projection));
        assert_eq!(plan.opaque().count(), 8);
        assert_eq!(plan.blended().count(), 5);
    }

    #[test]
    fn empty_scene_plans_nothing() {
        let mut scene = Scene::new(Vec::new(), TransparentSet::default());
        let plan = scene.plan_frame(&Camera::default(), 1.0, &ProjectionConfig::default());
        assert!(plan.commands.is_empty());
    }
}
