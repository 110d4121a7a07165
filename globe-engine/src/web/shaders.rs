// shaders.rs - GLSL ES 3.00 sources
//
// Attribute locations are fixed: 0 position, 1 normal, 2 uv, 3 colour.
// Lit outputs go through ACES filmic tone mapping; colour textures are
// uploaded as sRGB so sampling returns linear values.

pub const MESH_VERT: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world;
out vec3 v_normal;
out vec2 v_uv;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    v_normal = normalize(mat3(u_model) * a_normal);
    v_uv = a_uv;
    gl_Position = u_projection * u_view * world;
}
"#;

const TONE_MAP: &str = r#"
vec3 aces_filmic(vec3 color) {
    const mat3 aces_in = mat3(
        0.59719, 0.07600, 0.02840,
        0.35458, 0.90834, 0.13383,
        0.04823, 0.01566, 0.83777);
    const mat3 aces_out = mat3(
        1.60475, -0.10208, -0.00327,
        -0.53108, 1.10813, -0.07276,
        -0.07367, -0.00605, 1.07602);
    color *= 1.0 / 0.6;
    color = aces_in * color;
    vec3 a = color * (color + 0.0245786) - 0.000090537;
    vec3 b = color * (0.983729 * color + 0.4329510) + 0.238081;
    color = aces_out * (a / b);
    return clamp(color, 0.0, 1.0);
}
"#;

/// Blinn-Phong with a specular map and derivative bump mapping
pub fn phong_frag() -> String {
    format!(
        r#"#version 300 es
precision highp float;

in vec3 v_world;
in vec3 v_normal;
in vec2 v_uv;

uniform sampler2D u_map;
uniform sampler2D u_specular_map;
uniform sampler2D u_bump_map;
uniform float u_bump_scale;
uniform vec3 u_light_position;
uniform vec3 u_light_color;
uniform float u_light_intensity;
uniform vec3 u_camera_position;

out vec4 frag_color;
{TONE_MAP}
vec3 perturb_normal(vec3 surf_pos, vec3 surf_norm) {{
    vec2 dst = dFdx(v_uv);
    vec2 dsty = dFdy(v_uv);
    float h = texture(u_bump_map, v_uv).x;
    float dbx = u_bump_scale * (texture(u_bump_map, v_uv + dst).x - h);
    float dby = u_bump_scale * (texture(u_bump_map, v_uv + dsty).x - h);

    vec3 sigma_x = dFdx(surf_pos);
    vec3 sigma_y = dFdy(surf_pos);
    vec3 r1 = cross(sigma_y, surf_norm);
    vec3 r2 = cross(surf_norm, sigma_x);
    float det = dot(sigma_x, r1);
    vec3 grad = sign(det) * (dbx * r1 + dby * r2);
    return normalize(abs(det) * surf_norm - grad);
}}

void main() {{
    vec3 albedo = texture(u_map, v_uv).rgb;
    float specular_strength = texture(u_specular_map, v_uv).r;
    vec3 n = perturb_normal(v_world, normalize(v_normal));

    vec3 l = normalize(u_light_position);
    vec3 v = normalize(u_camera_position - v_world);
    vec3 h = normalize(l + v);
    vec3 irradiance = u_light_color * u_light_intensity * max(dot(n, l), 0.0);

    vec3 diffuse = albedo * irradiance;
    vec3 specular = vec3(0.067) * specular_strength * pow(max(dot(n, h), 0.0), 30.0) * irradiance;
    frag_color = vec4(aces_filmic(diffuse + specular), 1.0);
}}
"#
    )
}

pub const EMISSIVE_FRAG: &str = r#"#version 300 es
precision highp float;

in vec3 v_world;
in vec3 v_normal;
in vec2 v_uv;

uniform sampler2D u_map;

out vec4 frag_color;

void main() {
    frag_color = texture(u_map, v_uv);
}
"#;

/// Lambert-lit colour with opacity from the alpha map's green channel
pub fn clouds_frag() -> String {
    format!(
        r#"#version 300 es
precision highp float;

in vec3 v_world;
in vec3 v_normal;
in vec2 v_uv;

uniform sampler2D u_map;
uniform sampler2D u_alpha_map;
uniform float u_opacity;
uniform vec3 u_light_position;
uniform vec3 u_light_color;
uniform float u_light_intensity;

out vec4 frag_color;
{TONE_MAP}
void main() {{
    vec3 albedo = texture(u_map, v_uv).rgb;
    float alpha = texture(u_alpha_map, v_uv).g * u_opacity;
    vec3 l = normalize(u_light_position);
    vec3 lit = albedo * u_light_color * u_light_intensity * max(dot(normalize(v_normal), l), 0.0);
    frag_color = vec4(aces_filmic(lit), alpha);
}}
"#
    )
}

pub const FRESNEL_FRAG: &str = r#"#version 300 es
precision highp float;

in vec3 v_world;
in vec3 v_normal;
in vec2 v_uv;

uniform vec3 u_camera_position;
uniform vec3 u_rim_color;
uniform vec3 u_facing_color;
uniform float u_bias;
uniform float u_scale;
uniform float u_power;
uniform float u_opacity;

out vec4 frag_color;

void main() {
    vec3 incident = normalize(v_world - u_camera_position);
    float factor = u_bias + u_scale * pow(max(1.0 + dot(incident, normalize(v_normal)), 0.0), u_power);
    float f = clamp(factor, 0.0, 1.0);
    frag_color = vec4(mix(u_facing_color, u_rim_color, f), f * u_opacity);
}
"#;

pub const POINTS_VERT: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 3) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_point_scale;

out vec3 v_color;

void main() {
    vec4 eye = u_view * u_model * vec4(a_position, 1.0);
    v_color = a_color;
    gl_PointSize = u_size * (u_point_scale / -eye.z);
    gl_Position = u_projection * eye;
}
"#;

pub const POINTS_FRAG: &str = r#"#version 300 es
precision highp float;

in vec3 v_color;

uniform sampler2D u_map;

out vec4 frag_color;

void main() {
    vec4 sprite = texture(u_map, vec2(gl_PointCoord.x, 1.0 - gl_PointCoord.y));
    frag_color = vec4(v_color * sprite.rgb, sprite.a);
}
"#;
