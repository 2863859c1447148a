//! GLSL source of the program implementing the fixed-function pipeline.
//!
//! The vertex shader evaluates the classic per-vertex lighting equation
//! for up to a fixed number of light sources; the fragment shader picks the
//! front or back color, applies the texture, and shapes smooth points.
//! Logically boolean uniforms are declared as `int`, as some WebGL
//! implementations mishandle `bool` uniforms.

use alloc::{format, string::String};

/// Returns the vertex shader source for `light_count` light sources.
pub fn vertex_source(light_count: usize) -> String {
    format!(
        r"struct materialProperties {{
    vec3 ambient;
    vec4 diffuse;
    vec3 specular;
    vec3 emission;
    float shininess;
}};
struct lightProperties {{
    vec4 position;
    vec3 diffuse;
    vec3 specular;
    vec3 ambient;
    int enabled;
}};
attribute vec3 coords;
attribute vec2 texCoords;
attribute vec3 normal;
attribute vec4 color;
attribute vec3 front_ambient;
attribute vec4 front_diffuse;
attribute vec3 front_specular;
attribute vec3 front_emission;
attribute float front_shininess;
attribute vec3 back_ambient;
attribute vec4 back_diffuse;
attribute vec3 back_specular;
attribute vec3 back_emission;
attribute float back_shininess;
uniform mat3 normalMatrix;
uniform int unitNormals;
uniform mediump int lit;
uniform mediump int twoSided;
uniform int localViewer;
uniform vec3 globalAmbient;
uniform lightProperties light[{n}];
uniform mat4 modelview;
uniform mat4 projection;
uniform mat4 textureMatrix;
uniform mediump float pointSize;
varying vec4 frontColor;
varying vec4 backColor;
varying vec2 vTexCoords;
materialProperties material;

vec4 lighting(vec3 vertex, vec3 V, vec3 N) {{
    vec3 color = material.emission + material.ambient * globalAmbient;
    for (int i = 0; i < {n}; i++) {{
        if (light[i].enabled == 0) {{
            continue;
        }}
        color += material.ambient * light[i].ambient;
        vec3 L;
        if (light[i].position.w == 0.0) {{
            L = normalize(light[i].position.xyz);
        }} else {{
            L = normalize(light[i].position.xyz / light[i].position.w - vertex);
        }}
        float NdotL = dot(N, L);
        if (NdotL > 0.0) {{
            vec3 R = (2.0 * NdotL) * N - L;
            color += NdotL * (light[i].diffuse * material.diffuse.rgb);
            float VdotR = dot(V, R);
            if (VdotR > 0.0) {{
                color += pow(VdotR, material.shininess)
                    * (light[i].specular * material.specular);
            }}
        }}
    }}
    return vec4(color, material.diffuse.a);
}}

void main() {{
    vec4 eyeCoords = modelview * vec4(coords, 1.0);
    gl_Position = projection * eyeCoords;
    gl_PointSize = pointSize;
    vTexCoords = (textureMatrix * vec4(texCoords, 0.0, 1.0)).xy;
    if (lit == 0) {{
        frontColor = color;
        backColor = color;
        return;
    }}
    vec3 N = normalMatrix * normal;
    if (unitNormals != 0) {{
        N = normalize(N);
    }}
    vec3 vertex = eyeCoords.xyz / eyeCoords.w;
    vec3 V = localViewer != 0 ? normalize(-vertex) : vec3(0.0, 0.0, 1.0);
    if (twoSided != 0) {{
        material = materialProperties(back_ambient, back_diffuse,
            back_specular, back_emission, back_shininess);
        backColor = lighting(vertex, V, -N);
    }} else {{
        backColor = vec4(1.0);
    }}
    material = materialProperties(front_ambient, front_diffuse,
        front_specular, front_emission, front_shininess);
    frontColor = lighting(vertex, V, N);
}}
",
        n = light_count
    )
}

/// The fragment shader source.
pub const FRAGMENT_SOURCE: &str = r"precision mediump float;
uniform int lit;
uniform int twoSided;
uniform int textured;
uniform sampler2D texture;
uniform float pointSize;
uniform int pointMode;
varying vec4 frontColor;
varying vec4 backColor;
varying vec2 vTexCoords;

void main() {
    if (pointMode == 2 && pointSize > 1.5
        && distance(gl_PointCoord, vec2(0.5)) > 0.5) {
        discard;
    }
    vec4 clr = frontColor;
    if (!gl_FrontFacing && lit != 0 && twoSided != 0) {
        clr = backColor;
    }
    if (textured != 0) {
        clr *= texture2D(texture, vTexCoords);
    }
    gl_FragColor = clr;
}
";
