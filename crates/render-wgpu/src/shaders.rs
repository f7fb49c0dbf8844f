/// WGSL shader for textured, tinted geometry. Shared by the opaque and the
/// alpha-blended pipelines; only blend state differs between them.
pub const TEXTURED_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(1) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(1) @binding(1)
var s_diffuse: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) tint: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) tint: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    out.tint = instance.tint;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.uv);
    return vec4<f32>(texel.rgb * in.tint.rgb, texel.a * in.tint.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_declares_entry_points() {
        assert!(TEXTURED_SHADER.contains("fn vs_main"));
        assert!(TEXTURED_SHADER.contains("fn fs_main"));
        assert!(TEXTURED_SHADER.contains("@group(1) @binding(1)"));
    }
}
