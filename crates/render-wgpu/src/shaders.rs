/// WGSL shader for the board cells: instanced boxes with Phong lighting.
pub const BOARD_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    // xyz: unit vector toward the light
    light_dir: vec4<f32>,
    // rgb: color * intensity
    light_color: vec4<f32>,
    ambient: vec4<f32>,
    // x: shininess, yzw: specular color
    material: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let l = uniforms.light_dir.xyz;
    let v = normalize(uniforms.eye.xyz - in.world_pos);
    let r = reflect(-l, n);

    let diffuse = max(dot(n, l), 0.0);
    var specular = 0.0;
    if (diffuse > 0.0) {
        specular = pow(max(dot(r, v), 0.0), uniforms.material.x);
    }

    let lit = in.color.rgb * (uniforms.ambient.rgb + uniforms.light_color.rgb * diffuse)
        + uniforms.light_color.rgb * uniforms.material.yzw * specular;
    // Premultiplied output over a transparent clear.
    return vec4<f32>(lit * in.color.a, in.color.a);
}
"#;
