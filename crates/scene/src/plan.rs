use glam::{Mat4, Vec3};

/// Static mesh a command draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    /// Unit cube centred on the origin.
    Cube,
    /// 10×10 quad in the XZ plane.
    Plane,
    /// Unit quad in the XY plane, left edge on the origin.
    Billboard,
}

/// Which of the scene's textures a command samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Cube,
    Floor,
    Transparent,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [TextureSlot::Cube, TextureSlot::Floor, TextureSlot::Transparent];

    pub fn index(self) -> usize {
        match self {
            TextureSlot::Cube => 0,
            TextureSlot::Floor => 1,
            TextureSlot::Transparent => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Depth-tested, overwrites the target.
    Opaque,
    /// "Over" compositing with source alpha. Must be drawn back to front.
    AlphaBlend,
}

/// One draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub mesh: MeshKind,
    pub texture: TextureSlot,
    pub model: Mat4,
    /// Multiplied into the sampled colour.
    pub tint: Vec3,
    pub blend: BlendMode,
}

impl DrawCommand {
    pub fn opaque(mesh: MeshKind, texture: TextureSlot, model: Mat4) -> Self {
        Self {
            mesh,
            texture,
            model,
            tint: Vec3::ONE,
            blend: BlendMode::Opaque,
        }
    }

    /// Alpha-blended billboard translated to `coords`.
    pub fn billboard(coords: Vec3) -> Self {
        Self {
            mesh: MeshKind::Billboard,
            texture: TextureSlot::Transparent,
            model: Mat4::from_translation(coords),
            tint: Vec3::ONE,
            blend: BlendMode::AlphaBlend,
        }
    }

    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.tint = tint;
        self
    }

    /// World-space origin of the model transform.
    pub fn origin(&self) -> Vec3 {
        self.model.w_axis.truncate()
    }
}

/// Everything a backend needs to draw one frame, in submission order.
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub commands: Vec<DrawCommand>,
}

impl FramePlan {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn opaque(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.blend == BlendMode::Opaque)
    }

    pub fn blended(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| c.blend == BlendMode::AlphaBlend)
    }
}
