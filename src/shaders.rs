//! GLSL shader sources and program construction.
//!
//! Every drawable renders flat-colored geometry through the same tiny
//! program: a position attribute, a translation uniform, an optional
//! uniform scale, and a color uniform. What varies is the dialect — GLSL
//! 330 core on [`Modern`] contexts, GLSL 120 on [`Legacy`] ones — so each
//! source is kept as a [`ShaderSource`] table holding both dialects, and
//! one compile path selects by tier.
//!
//! The legacy dialect has no `layout(location = N)` syntax, so the
//! position attribute is bound to index 0 explicitly *before* linking.
//!
//! [`Modern`]: GlslTier::Modern
//! [`Legacy`]: GlslTier::Legacy

use glow::HasContext;

use crate::capability::GlslTier;
use crate::error::{Error, ShaderStage};

/// Attribute index the position input is bound to, on both dialects.
///
/// The modern sources hard-code the same index in their
/// `layout(location = 0)` qualifier; the legacy path binds it by name
/// before linking. Buffers declare their attribute pointers against this
/// index.
pub(crate) const POSITION_LOCATION: u32 = 0;

/// A vertex/fragment source pair in a single dialect.
#[derive(Debug, Clone, Copy)]
pub struct DialectPair {
    /// Vertex stage source.
    pub vertex: &'static str,
    /// Fragment stage source.
    pub fragment: &'static str,
}

/// Both dialect renditions of one shader, selected by [`GlslTier`].
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    /// GLSL 330 core rendition.
    pub modern: DialectPair,
    /// GLSL 120 rendition.
    pub legacy: DialectPair,
    /// Whether the vertex stages declare the `u_scale` uniform.
    scaled: bool,
}

impl ShaderSource {
    /// The source pair for the given tier.
    #[must_use]
    pub fn for_tier(&self, tier: GlslTier) -> DialectPair {
        match tier {
            GlslTier::Modern => self.modern,
            GlslTier::Legacy => self.legacy,
        }
    }
}

/// Fragment stage, modern dialect. Shared by every source table: all
/// drawables output one flat color.
const FRAGMENT_MODERN: &str = r"#version 330 core

uniform vec3 u_color;

out vec4 frag_color;

void main() {
    frag_color = vec4(u_color, 1.0);
}
";

/// Fragment stage, legacy dialect. Writes the implicit `gl_FragColor`.
const FRAGMENT_LEGACY: &str = r"#version 120

uniform vec3 u_color;

void main() {
    gl_FragColor = vec4(u_color, 1.0);
}
";

/// Shader for shape drawables (squares, circles).
///
/// # Uniforms
///
/// | Name         | Type    | Description                          |
/// |--------------|---------|--------------------------------------|
/// | `u_position` | `vec3`  | Translation in device coordinates    |
/// | `u_scale`    | `float` | Uniform scale applied before moving  |
/// | `u_color`    | `vec3`  | Flat fill color                      |
pub const SHAPE_SOURCE: ShaderSource = ShaderSource {
    modern: DialectPair {
        vertex: r"#version 330 core

layout(location = 0) in vec3 a_position;

uniform vec3 u_position;
uniform float u_scale;

void main() {
    gl_Position = vec4(a_position * u_scale + u_position, 1.0);
}
",
        fragment: FRAGMENT_MODERN,
    },
    legacy: DialectPair {
        vertex: r"#version 120

attribute vec3 a_position;

uniform vec3 u_position;
uniform float u_scale;

void main() {
    gl_Position = vec4(a_position * u_scale + u_position, 1.0);
}
",
        fragment: FRAGMENT_LEGACY,
    },
    scaled: true,
};

/// Shader for widgets.
///
/// Widget geometry already encodes absolute offsets in device units, so
/// there is no scale uniform — only translation and color.
pub const WIDGET_SOURCE: ShaderSource = ShaderSource {
    modern: DialectPair {
        vertex: r"#version 330 core

layout(location = 0) in vec3 a_position;

uniform vec3 u_position;

void main() {
    gl_Position = vec4(a_position + u_position, 1.0);
}
",
        fragment: FRAGMENT_MODERN,
    },
    legacy: DialectPair {
        vertex: r"#version 120

attribute vec3 a_position;

uniform vec3 u_position;

void main() {
    gl_Position = vec4(a_position + u_position, 1.0);
}
",
        fragment: FRAGMENT_LEGACY,
    },
    scaled: false,
};

/// A linked program with its uniform locations resolved and cached.
///
/// Owned exclusively by the drawable that compiled it; destroyed by that
/// drawable's cleanup.
pub struct ShaderProgram {
    program: glow::Program,
    u_position: glow::UniformLocation,
    u_scale: Option<glow::UniformLocation>,
    u_color: glow::UniformLocation,
    tier: GlslTier,
}

impl ShaderProgram {
    /// Compile and link the dialect of `source` selected by `tier`.
    ///
    /// The transient stage objects are detached and deleted after a
    /// successful link; only the program handle remains to clean up. On
    /// any failure the whole construction aborts and nothing of the
    /// half-built program survives.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    ///
    /// # Errors
    ///
    /// [`Error::ShaderCompile`] or [`Error::ShaderLink`] with the driver's
    /// info log, or [`Error::ResourceCreation`] if the driver refuses to
    /// allocate an object.
    ///
    /// # Panics
    ///
    /// Panics if a uniform the source declares cannot be resolved after
    /// linking, which indicates a bug in the shader source table.
    pub unsafe fn compile(
        gl: &glow::Context,
        source: &ShaderSource,
        tier: GlslTier,
    ) -> Result<Self, Error> {
        let dialect = source.for_tier(tier);

        let vs = unsafe { compile_stage(gl, ShaderStage::Vertex, dialect.vertex) }?;
        let fs = match unsafe { compile_stage(gl, ShaderStage::Fragment, dialect.fragment) } {
            Ok(fs) => fs,
            Err(err) => {
                unsafe { gl.delete_shader(vs) };
                return Err(err);
            }
        };

        let program = unsafe {
            let program = match gl.create_program() {
                Ok(program) => program,
                Err(log) => {
                    gl.delete_shader(vs);
                    gl.delete_shader(fs);
                    return Err(Error::ResourceCreation(log));
                }
            };

            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);

            // GLSL 120 has no location qualifiers; the attribute index
            // must be fixed before the link resolves bindings.
            if tier == GlslTier::Legacy {
                gl.bind_attrib_location(program, POSITION_LOCATION, "a_position");
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                return Err(Error::ShaderLink { log });
            }

            // The stage objects are dead weight once linked.
            gl.detach_shader(program, vs);
            gl.detach_shader(program, fs);
            gl.delete_shader(vs);
            gl.delete_shader(fs);

            program
        };

        let resolve = |name: &str| unsafe {
            gl.get_uniform_location(program, name)
                .unwrap_or_else(|| panic!("{name} missing from linked program"))
        };

        Ok(Self {
            program,
            u_position: resolve("u_position"),
            u_scale: source.scaled.then(|| resolve("u_scale")),
            u_color: resolve("u_color"),
            tier,
        })
    }

    /// Make this program current.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context.
    pub unsafe fn bind(&self, gl: &glow::Context) {
        unsafe { gl.use_program(Some(self.program)) };
    }

    /// Set the translation uniform.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context with this program bound.
    pub unsafe fn set_position(&self, gl: &glow::Context, [x, y, z]: [f32; 3]) {
        unsafe { gl.uniform_3_f32(Some(&self.u_position), x, y, z) };
    }

    /// Set the uniform scale.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context with this program bound.
    ///
    /// # Panics
    ///
    /// Panics if the program was compiled from an unscaled source; calling
    /// this on a widget program is a programming error.
    pub unsafe fn set_scale(&self, gl: &glow::Context, scale: f32) {
        let location = self
            .u_scale
            .as_ref()
            .expect("set_scale on a program compiled without u_scale");
        unsafe { gl.uniform_1_f32(Some(location), scale) };
    }

    /// Set the color uniform.
    ///
    /// # Safety
    ///
    /// Requires a valid, current OpenGL context with this program bound.
    pub unsafe fn set_color(&self, gl: &glow::Context, [r, g, b]: [f32; 3]) {
        unsafe { gl.uniform_3_f32(Some(&self.u_color), r, g, b) };
    }

    /// The dialect tier this program was compiled for.
    #[must_use]
    pub fn tier(&self) -> GlslTier {
        self.tier
    }

    /// Delete the program object.
    ///
    /// # Safety
    ///
    /// Requires the same context the program was compiled on; the program
    /// must not be used afterwards.
    pub unsafe fn destroy(&self, gl: &glow::Context) {
        unsafe { gl.delete_program(self.program) };
    }
}

/// Compile a single shader stage from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, Error> {
    let kind = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };

    unsafe {
        let shader = gl.create_shader(kind).map_err(Error::ResourceCreation)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(Error::ShaderCompile { stage, log });
        }

        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect_invariants(source: &ShaderSource) {
        assert!(source.modern.vertex.starts_with("#version 330 core"));
        assert!(source.modern.fragment.starts_with("#version 330 core"));
        assert!(source.legacy.vertex.starts_with("#version 120"));
        assert!(source.legacy.fragment.starts_with("#version 120"));

        // Modern inputs carry explicit locations; legacy ones cannot.
        assert!(source.modern.vertex.contains("layout(location = 0)"));
        assert!(source.legacy.vertex.contains("attribute vec3 a_position"));
        assert!(!source.legacy.vertex.contains("layout"));

        // Legacy fragments write the implicit output.
        assert!(source.legacy.fragment.contains("gl_FragColor"));
        assert!(!source.legacy.fragment.contains("out vec4"));
        assert!(source.modern.fragment.contains("out vec4"));

        for pair in [source.modern, source.legacy] {
            assert!(pair.vertex.contains("u_position"));
            assert!(pair.fragment.contains("u_color"));
        }
    }

    #[test]
    fn shape_source_dialects_agree() {
        dialect_invariants(&SHAPE_SOURCE);
        assert!(SHAPE_SOURCE.modern.vertex.contains("u_scale"));
        assert!(SHAPE_SOURCE.legacy.vertex.contains("u_scale"));
        assert!(SHAPE_SOURCE.scaled);
    }

    #[test]
    fn widget_source_has_no_scale() {
        dialect_invariants(&WIDGET_SOURCE);
        assert!(!WIDGET_SOURCE.modern.vertex.contains("u_scale"));
        assert!(!WIDGET_SOURCE.legacy.vertex.contains("u_scale"));
        assert!(!WIDGET_SOURCE.scaled);
    }

    #[test]
    fn tier_selects_the_matching_dialect() {
        let modern = SHAPE_SOURCE.for_tier(GlslTier::Modern);
        let legacy = SHAPE_SOURCE.for_tier(GlslTier::Legacy);
        assert!(modern.vertex.starts_with("#version 330 core"));
        assert!(legacy.vertex.starts_with("#version 120"));
    }
}
