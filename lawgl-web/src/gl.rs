//! WebGL2 rendering surface
use js_sys::Float32Array;
use lawgl_core::{Dimension, Mesh, RenderSurface, SurfaceError, Uniform};
use log::{debug, error};
use wasm_bindgen::JsCast;
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation,
};

const FLAT_VERTEX_SHADER: &str = r#"
attribute vec2 a_position;
attribute vec4 a_color;

uniform mat3 matrix;

varying vec4 v_color;

void main() {
  gl_Position = vec4(matrix * vec3(a_position, 1), 1);
  v_color = a_color;
}
"#;

const SPATIAL_VERTEX_SHADER: &str = r#"
attribute vec4 a_position;
attribute vec4 a_color;

uniform mat4 matrix;

varying vec4 v_color;

void main() {
  gl_Position = matrix * a_position;
  v_color = a_color;
}
"#;

const FRAGMENT_SHADER: &str = r#"
precision mediump float;

varying vec4 v_color;

void main() {
  gl_FragColor = v_color;
}
"#;

pub fn vertex_shader_source(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Two => FLAT_VERTEX_SHADER,
        Dimension::Three => SPATIAL_VERTEX_SHADER,
    }
}

struct Program {
    program: WebGlProgram,
    matrix: WebGlUniformLocation,
    // Kept alive for as long as the program draws from them
    _positions: WebGlBuffer,
    _colors: WebGlBuffer,
}

/// A canvas with one linked program and one static mesh uploaded
pub struct GlSurface {
    gl: Gl,
    program: Option<Program>,
    vertex_count: i32,
    depth_test: bool,
}

impl GlSurface {
    /// Set up the context and upload `mesh`
    ///
    /// Only a missing WebGL2 context is an error. A shader that fails to
    /// compile or link is logged and leaves the surface not ready, so the
    /// frame driver skips drawing.
    pub fn new(canvas: &HtmlCanvasElement, mesh: &Mesh, depth_test: bool) -> Result<Self, SurfaceError> {
        let gl: Gl = canvas
            .get_context("webgl2")
            .map_err(|_| SurfaceError::Context("getContext threw".to_string()))?
            .ok_or_else(|| SurfaceError::Context("webgl2 not supported".to_string()))?
            .dyn_into()
            .map_err(|_| SurfaceError::Context("not a WebGL2 context".to_string()))?;

        if depth_test {
            gl.enable(Gl::DEPTH_TEST);
        }

        let program = match build_program(&gl, mesh) {
            Ok(program) => {
                debug!("program linked, {} vertices uploaded", mesh.vertex_count());
                Some(program)
            }
            Err(err) => {
                error!("{err}");
                None
            }
        };

        Ok(Self {
            gl,
            program,
            vertex_count: mesh.vertex_count() as i32,
            depth_test,
        })
    }
}

impl RenderSurface for GlSurface {
    fn is_ready(&self) -> bool {
        self.program.is_some()
    }

    fn set_transform_uniform(&mut self, uniform: &Uniform) {
        let Some(program) = &self.program else {
            return;
        };
        self.gl.use_program(Some(&program.program));
        match uniform {
            Uniform::Mat3(m) => {
                self.gl
                    .uniform_matrix3fv_with_f32_array(Some(&program.matrix), false, m.as_slice())
            }
            Uniform::Mat4(m) => {
                self.gl
                    .uniform_matrix4fv_with_f32_array(Some(&program.matrix), false, m.as_slice())
            }
        }
    }

    fn draw_frame(&mut self) {
        let Some(program) = &self.program else {
            return;
        };
        let gl = &self.gl;
        gl.viewport(0, 0, gl.drawing_buffer_width(), gl.drawing_buffer_height());

        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        let mut mask = Gl::COLOR_BUFFER_BIT;
        if self.depth_test {
            mask |= Gl::DEPTH_BUFFER_BIT;
        }
        gl.clear(mask);

        gl.use_program(Some(&program.program));
        gl.draw_arrays(Gl::TRIANGLES, 0, self.vertex_count);
    }
}

fn build_program(gl: &Gl, mesh: &Mesh) -> Result<Program, SurfaceError> {
    let vertex = compile_shader(gl, Gl::VERTEX_SHADER, "vertex", vertex_shader_source(mesh.dimension))?;
    let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, "fragment", FRAGMENT_SHADER)?;
    let program = link_program(gl, &vertex, &fragment)?;
    gl.use_program(Some(&program));

    let matrix = gl
        .get_uniform_location(&program, "matrix")
        .ok_or(SurfaceError::MissingUniform("matrix"))?;

    let components = mesh.dimension.components() as i32;
    let positions = upload_attribute(gl, &program, "a_position", components, &mesh.positions())?;
    let colors = upload_attribute(gl, &program, "a_color", 4, &mesh.colors())?;

    Ok(Program {
        program,
        matrix,
        _positions: positions,
        _colors: colors,
    })
}

fn upload_attribute(
    gl: &Gl,
    program: &WebGlProgram,
    name: &'static str,
    size: i32,
    data: &[f32],
) -> Result<WebGlBuffer, SurfaceError> {
    let location: u32 = gl
        .get_attrib_location(program, name)
        .try_into()
        .map_err(|_| SurfaceError::MissingAttribute(name))?;

    let buffer = gl.create_buffer().ok_or(SurfaceError::Allocation("buffer"))?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
    gl.buffer_data_with_array_buffer_view(
        Gl::ARRAY_BUFFER,
        &Float32Array::from(data),
        Gl::STATIC_DRAW,
    );
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, size, Gl::FLOAT, false, 0, 0);

    Ok(buffer)
}

fn compile_shader(
    gl: &Gl,
    kind: u32,
    stage: &'static str,
    source: &str,
) -> Result<WebGlShader, SurfaceError> {
    let shader = gl.create_shader(kind).ok_or(SurfaceError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if compiled {
        return Ok(shader);
    }

    let log = gl.get_shader_info_log(&shader).unwrap_or_default();
    gl.delete_shader(Some(&shader));
    Err(SurfaceError::ShaderCompile { stage, log })
}

fn link_program(
    gl: &Gl,
    vertex: &WebGlShader,
    fragment: &WebGlShader,
) -> Result<WebGlProgram, SurfaceError> {
    let program = gl.create_program().ok_or(SurfaceError::Allocation("program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if linked {
        return Ok(program);
    }

    let log = gl.get_program_info_log(&program).unwrap_or_default();
    gl.delete_program(Some(&program));
    Err(SurfaceError::ProgramLink(log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_sources_match_uniform_dimension() {
        assert!(vertex_shader_source(Dimension::Two).contains("uniform mat3 matrix;"));
        assert!(vertex_shader_source(Dimension::Three).contains("uniform mat4 matrix;"));
        for source in [FLAT_VERTEX_SHADER, SPATIAL_VERTEX_SHADER, FRAGMENT_SHADER] {
            assert!(source.contains("v_color"));
        }
    }
}
