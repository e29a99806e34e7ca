use std::path::Path;

use glium::{
    glutin::surface::WindowSurface,
    index::{NoIndices, PrimitiveType},
    uniforms::Uniforms,
    Display, DrawError, DrawParameters, Surface, VertexBuffer,
};

use crate::{
    error::ViewerError,
    geometry::{self, SkyVertex, Vertex},
    shader::{ProgramId, ShaderLibrary},
    texture::TextureSet,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshId {
    Cube,
    Cat,
    Skybox,
    AdvancedSkybox,
}

impl MeshId {
    /// Attribute names the mesh's vertex layout provides, in field order.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            MeshId::Cube | MeshId::Cat => Vertex::ATTRIBUTES,
            MeshId::Skybox | MeshId::AdvancedSkybox => SkyVertex::ATTRIBUTES,
        }
    }
}

/// Binds one geometry buffer to one shader program. Construction verifies
/// that every attribute the program declares exists in the buffer's
/// layout; a position-only program over a full lit buffer is valid.
#[derive(Debug, Clone, Copy)]
pub struct RenderBatch {
    pub mesh: MeshId,
    pub program: ProgramId,
}

impl RenderBatch {
    pub fn new(
        programs: &ShaderLibrary,
        mesh: MeshId,
        program: ProgramId,
    ) -> Result<Self, ViewerError> {
        let provided = mesh.attributes();
        for (name, _attribute) in programs.get(program).attributes() {
            if !provided.iter().any(|attr| *attr == name.as_str()) {
                return Err(ViewerError::LayoutMismatch {
                    program: program.name().to_string(),
                    attribute: name.clone(),
                });
            }
        }
        Ok(Self { mesh, program })
    }
}

/// One batch per drawable unit, mirroring the original inventory: lit and
/// shadow variants for each shadow-casting mesh plus the two skyboxes.
#[derive(Debug, Clone, Copy)]
pub struct RenderBatches {
    pub cube: RenderBatch,
    pub shadow_cube: RenderBatch,
    pub cat: RenderBatch,
    pub shadow_cat: RenderBatch,
    pub skybox: RenderBatch,
    pub advanced_skybox: RenderBatch,
}

/// Single owner of every GPU resource: vertex buffers, shader programs,
/// and the texture set. Everything is created here at startup and released
/// together at teardown, batches and programs before the buffers they
/// reference.
pub struct MeshLibrary {
    batches: RenderBatches,
    programs: ShaderLibrary,
    cube: VertexBuffer<Vertex>,
    cat: VertexBuffer<Vertex>,
    skybox: VertexBuffer<SkyVertex>,
    advanced_skybox: VertexBuffer<SkyVertex>,
    textures: TextureSet,
}

impl MeshLibrary {
    pub fn new(
        display: &Display<WindowSurface>,
        assets: &Path,
        window_size: (u32, u32),
    ) -> Result<Self, ViewerError> {
        let programs = ShaderLibrary::load(display, &assets.join("shaders"))?;
        let textures = TextureSet::load(display, &assets.join("textures"), window_size)?;

        let cube = upload(display, &geometry::cube_vertices(), "cube")?;
        let cat = upload(
            display,
            &geometry::load_obj_vertices(&assets.join("models/cat/cat.obj"))?,
            "cat",
        )?;
        let skybox = upload(display, &geometry::skybox_vertices(), "skybox")?;
        let advanced_skybox = upload(display, &geometry::fullscreen_triangle(), "sky triangle")?;

        let batches = RenderBatches {
            cube: RenderBatch::new(&programs, MeshId::Cube, ProgramId::Default)?,
            shadow_cube: RenderBatch::new(&programs, MeshId::Cube, ProgramId::ShadowMap)?,
            cat: RenderBatch::new(&programs, MeshId::Cat, ProgramId::Default)?,
            shadow_cat: RenderBatch::new(&programs, MeshId::Cat, ProgramId::ShadowMap)?,
            skybox: RenderBatch::new(&programs, MeshId::Skybox, ProgramId::Skybox)?,
            advanced_skybox: RenderBatch::new(
                &programs,
                MeshId::AdvancedSkybox,
                ProgramId::AdvancedSkybox,
            )?,
        };

        log::info!(
            "uploaded {} cube / {} cat / {} skybox vertices",
            cube.len(),
            cat.len(),
            skybox.len()
        );

        Ok(Self {
            batches,
            programs,
            cube,
            cat,
            skybox,
            advanced_skybox,
            textures,
        })
    }

    pub fn batches(&self) -> &RenderBatches {
        &self.batches
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    /// Issues one draw call for a batch. Uniforms are matched by name;
    /// names unknown to the program are ignored, mirroring GL leniency.
    pub fn draw<S: Surface, U: Uniforms>(
        &self,
        surface: &mut S,
        batch: &RenderBatch,
        uniforms: &U,
        params: &DrawParameters<'_>,
    ) -> Result<(), DrawError> {
        let indices = NoIndices(PrimitiveType::TrianglesList);
        let program = self.programs.get(batch.program);
        match batch.mesh {
            MeshId::Cube => surface.draw(&self.cube, indices, program, uniforms, params),
            MeshId::Cat => surface.draw(&self.cat, indices, program, uniforms, params),
            MeshId::Skybox => surface.draw(&self.skybox, indices, program, uniforms, params),
            MeshId::AdvancedSkybox => {
                surface.draw(&self.advanced_skybox, indices, program, uniforms, params)
            }
        }
    }
}

impl Drop for MeshLibrary {
    fn drop(&mut self) {
        log::debug!("releasing mesh library GPU resources");
    }
}

fn upload<V: glium::Vertex>(
    display: &Display<WindowSurface>,
    vertices: &[V],
    name: &'static str,
) -> Result<VertexBuffer<V>, ViewerError> {
    VertexBuffer::new(display, vertices).map_err(|e| ViewerError::GpuResource {
        resource: name,
        reason: e.to_string(),
    })
}
