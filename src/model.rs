use glam::Vec3;
use glium::{
    draw_parameters::{BackfaceCullingMode, DepthTest},
    uniform, Depth, DrawError, DrawParameters, Surface,
};

use crate::{
    camera::{rotation_only, Camera},
    light::Light,
    mesh::{MeshLibrary, RenderBatch},
    texture::TextureId,
    transform::Transform,
};

/// Uniform values that never change after scene load: projection,
/// light-space view, light intensities and viewport resolution. Computed
/// once at construction and merged with the per-frame values when each
/// draw call's uniform set is assembled.
#[derive(Debug, Clone, Copy)]
pub struct LitStatic {
    pub projection: [[f32; 4]; 4],
    pub light_view: [[f32; 4]; 4],
    pub light_position: [f32; 3],
    pub light_ambient: [f32; 3],
    pub light_diffuse: [f32; 3],
    pub light_specular: [f32; 3],
    pub resolution: [f32; 2],
}

impl LitStatic {
    pub fn new(camera: &Camera, light: &Light, window_size: (u32, u32)) -> Self {
        Self {
            projection: camera.projection_matrix().to_cols_array_2d(),
            light_view: light.view_matrix().to_cols_array_2d(),
            light_position: light.position.to_array(),
            light_ambient: light.ambient.to_array(),
            light_diffuse: light.diffuse.to_array(),
            light_specular: light.specular.to_array(),
            resolution: [window_size.0 as f32, window_size.1 as f32],
        }
    }
}

/// Per-frame draw context: the resource owner plus the camera-derived
/// values every object needs. Built once per frame and shared by both
/// passes.
pub struct FrameCtx<'a> {
    pub library: &'a MeshLibrary,
    pub statics: &'a LitStatic,
    view: [[f32; 4]; 4],
    rotation_view: [[f32; 4]; 4],
    inv_proj_rotation_view: [[f32; 4]; 4],
    camera_position: [f32; 3],
}

impl<'a> FrameCtx<'a> {
    pub fn new(library: &'a MeshLibrary, camera: &Camera, statics: &'a LitStatic) -> Self {
        let rotation_view = rotation_only(camera.view_matrix());
        Self {
            library,
            statics,
            view: camera.view_matrix().to_cols_array_2d(),
            rotation_view: rotation_view.to_cols_array_2d(),
            inv_proj_rotation_view: (camera.projection_matrix() * rotation_view)
                .inverse()
                .to_cols_array_2d(),
            camera_position: camera.position.to_array(),
        }
    }
}

/// Placement and material for one lit object, authored once at scene
/// load.
#[bon::builder]
pub struct ModelDesc {
    pub texture: TextureId,
    pub position: Vec3,
    pub rotation_deg: Vec3,
    pub scale: Vec3,
}

/// A lit, textured, shadow-casting object: a transform plus the batches
/// binding its geometry to the default and shadow programs.
pub struct LitModel {
    pub transform: Transform,
    texture: TextureId,
    batch: RenderBatch,
    shadow_batch: RenderBatch,
}

impl LitModel {
    pub fn new(batch: RenderBatch, shadow_batch: RenderBatch, desc: ModelDesc) -> Self {
        let rotation = Vec3::new(
            desc.rotation_deg.x.to_radians(),
            desc.rotation_deg.y.to_radians(),
            desc.rotation_deg.z.to_radians(),
        );
        Self {
            transform: Transform::new(desc.position, rotation, desc.scale),
            texture: desc.texture,
            batch,
            shadow_batch,
        }
    }

    fn render_color<S: Surface>(&self, surface: &mut S, ctx: &FrameCtx<'_>) -> Result<(), DrawError> {
        let statics = ctx.statics;
        let uniforms = uniform! {
            m_proj: statics.projection,
            m_view: ctx.view,
            m_view_light: statics.light_view,
            m_model: self.transform.model_matrix().to_cols_array_2d(),
            cam_pos: ctx.camera_position,
            light_position: statics.light_position,
            light_ambient: statics.light_ambient,
            light_diffuse: statics.light_diffuse,
            light_specular: statics.light_specular,
            u_resolution: statics.resolution,
            u_texture_0: ctx.library.textures().color(self.texture),
            shadow_map_tex: ctx.library.textures().shadow(),
        };
        ctx.library.draw(surface, &self.batch, &uniforms, &lit_params())
    }

    fn render_shadow<S: Surface>(&self, surface: &mut S, ctx: &FrameCtx<'_>) -> Result<(), DrawError> {
        let uniforms = uniform! {
            m_proj: ctx.statics.projection,
            m_view_light: ctx.statics.light_view,
            m_model: self.transform.model_matrix().to_cols_array_2d(),
        };
        ctx.library
            .draw(surface, &self.shadow_batch, &uniforms, &lit_params())
    }
}

/// Closed set of scene object variants; each knows how to push its
/// uniforms and issue its draw call for both passes.
pub enum SceneObject {
    Cube(LitModel),
    MovingCube(LitModel),
    Cat(LitModel),
}

impl SceneObject {
    fn lit(&self) -> &LitModel {
        match self {
            SceneObject::Cube(model) | SceneObject::MovingCube(model) | SceneObject::Cat(model) => {
                model
            }
        }
    }

    /// Advances per-frame animation. Only the moving cube reacts: its
    /// rotation tracks elapsed time on all three axes.
    pub fn update(&mut self, elapsed: f32) {
        if let SceneObject::MovingCube(model) = self {
            model.transform.set_rotation(Vec3::splat(elapsed));
        }
    }

    pub fn render_color<S: Surface>(
        &self,
        surface: &mut S,
        ctx: &FrameCtx<'_>,
    ) -> Result<(), DrawError> {
        self.lit().render_color(surface, ctx)
    }

    pub fn render_shadow<S: Surface>(
        &self,
        surface: &mut S,
        ctx: &FrameCtx<'_>,
    ) -> Result<(), DrawError> {
        self.lit().render_shadow(surface, ctx)
    }
}

/// Background sky, drawn last in the color pass only. The simple variant
/// draws the mirrored cube with a translation-stripped view matrix; the
/// advanced variant reconstructs the view direction per pixel from a
/// fullscreen triangle and the inverse projection-rotation matrix.
pub enum Skybox {
    Simple(RenderBatch),
    Advanced(RenderBatch),
}

impl Skybox {
    pub fn render<S: Surface>(&self, surface: &mut S, ctx: &FrameCtx<'_>) -> Result<(), DrawError> {
        match self {
            Skybox::Simple(batch) => {
                let uniforms = uniform! {
                    m_proj: ctx.statics.projection,
                    m_view: ctx.rotation_view,
                    u_texture_skybox: ctx.library.textures().skybox(),
                };
                ctx.library.draw(surface, batch, &uniforms, &sky_params())
            }
            Skybox::Advanced(batch) => {
                let uniforms = uniform! {
                    m_inv_proj_view: ctx.inv_proj_rotation_view,
                    u_texture_skybox: ctx.library.textures().skybox(),
                };
                ctx.library.draw(surface, batch, &uniforms, &sky_params())
            }
        }
    }
}

fn lit_params() -> DrawParameters<'static> {
    DrawParameters {
        depth: Depth {
            test: DepthTest::IfLess,
            write: true,
            ..Default::default()
        },
        backface_culling: BackfaceCullingMode::CullClockwise,
        ..Default::default()
    }
}

fn sky_params() -> DrawParameters<'static> {
    DrawParameters {
        depth: Depth {
            test: DepthTest::IfLessOrEqual,
            write: true,
            ..Default::default()
        },
        backface_culling: BackfaceCullingMode::CullingDisabled,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshId;
    use crate::shader::ProgramId;
    use approx::assert_relative_eq;

    fn cube_model() -> LitModel {
        LitModel::new(
            RenderBatch {
                mesh: MeshId::Cube,
                program: ProgramId::Default,
            },
            RenderBatch {
                mesh: MeshId::Cube,
                program: ProgramId::ShadowMap,
            },
            ModelDesc::builder()
                .texture(TextureId::Metal)
                .position(Vec3::new(0.0, 6.0, 8.0))
                .rotation_deg(Vec3::ZERO)
                .scale(Vec3::splat(3.0))
                .build(),
        )
    }

    #[test]
    fn moving_cube_tracks_elapsed_time() {
        let mut object = SceneObject::MovingCube(cube_model());

        object.update(1.5);
        if let SceneObject::MovingCube(model) = &object {
            assert_relative_eq!(model.transform.rotation().x, 1.5);
            assert_relative_eq!(model.transform.rotation().y, 1.5);
            assert_relative_eq!(model.transform.rotation().z, 1.5);
        } else {
            unreachable!();
        }
    }

    #[test]
    fn static_cube_ignores_updates() {
        let mut object = SceneObject::Cube(cube_model());
        object.update(42.0);
        assert_relative_eq!(object.lit().transform.rotation().y, 0.0);
    }

    #[test]
    fn model_desc_rotation_is_converted_to_radians() {
        let model = LitModel::new(
            RenderBatch {
                mesh: MeshId::Cat,
                program: ProgramId::Default,
            },
            RenderBatch {
                mesh: MeshId::Cat,
                program: ProgramId::ShadowMap,
            },
            ModelDesc::builder()
                .texture(TextureId::Cat)
                .position(Vec3::new(0.0, -1.0, -10.0))
                .rotation_deg(Vec3::new(-90.0, 0.0, 0.0))
                .scale(Vec3::ONE)
                .build(),
        );
        assert_relative_eq!(
            model.transform.rotation().x,
            -std::f32::consts::FRAC_PI_2,
            epsilon = 1e-6
        );
    }
}
