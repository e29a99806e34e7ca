use std::path::Path;

use glium::{
    framebuffer::SimpleFrameBuffer,
    glutin::surface::WindowSurface,
    texture::{CubeLayer, Cubemap, DepthFormat, DepthTexture2d, MipmapsOption, RawImage2d, SrgbTexture2d, Texture2d},
    uniforms::{
        DepthTextureComparison, MagnifySamplerFilter, MinifySamplerFilter, Sampler,
        SamplerBehavior, SamplerWrapFunction,
    },
    BlitTarget, Display, Surface,
};

use crate::error::ViewerError;

/// Strongly-typed handles for the 2D textures, resolved at load time so
/// there are no runtime name lookups on the draw path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureId {
    Wood,
    Metal,
    Stone,
    Cat,
}

const CUBE_FACES: [(CubeLayer, &str); 6] = [
    (CubeLayer::PositiveX, "right"),
    (CubeLayer::NegativeX, "left"),
    (CubeLayer::PositiveY, "top"),
    (CubeLayer::NegativeY, "bottom"),
    (CubeLayer::PositiveZ, "front"),
    (CubeLayer::NegativeZ, "back"),
];

/// Owns every texture in the scene: the 2D albedo set, the skybox
/// cubemap, and the depth texture the shadow pass renders into. The depth
/// texture is written and then read within the same frame; the two passes
/// are strictly sequential, so no double buffering is needed.
pub struct TextureSet {
    wood: SrgbTexture2d,
    metal: SrgbTexture2d,
    stone: SrgbTexture2d,
    cat: SrgbTexture2d,
    skybox: Cubemap,
    depth: DepthTexture2d,
}

impl TextureSet {
    pub fn load(
        display: &Display<WindowSurface>,
        dir: &Path,
        window_size: (u32, u32),
    ) -> Result<Self, ViewerError> {
        let depth = DepthTexture2d::empty_with_format(
            display,
            DepthFormat::F32,
            MipmapsOption::NoMipmap,
            window_size.0,
            window_size.1,
        )
        .map_err(|e| ViewerError::GpuResource {
            resource: "depth texture",
            reason: e.to_string(),
        })?;

        Ok(Self {
            wood: load_texture(display, &dir.join("wood.png"))?,
            metal: load_texture(display, &dir.join("metal.png"))?,
            stone: load_texture(display, &dir.join("stone.png"))?,
            cat: load_texture(display, &dir.join("cat.png"))?,
            skybox: load_cubemap(display, &dir.join("skybox"))?,
            depth,
        })
    }

    pub fn color(&self, id: TextureId) -> Sampler<'_, SrgbTexture2d> {
        let texture = match id {
            TextureId::Wood => &self.wood,
            TextureId::Metal => &self.metal,
            TextureId::Stone => &self.stone,
            TextureId::Cat => &self.cat,
        };
        Sampler(
            texture,
            SamplerBehavior {
                wrap_function: (
                    SamplerWrapFunction::Repeat,
                    SamplerWrapFunction::Repeat,
                    SamplerWrapFunction::Repeat,
                ),
                minify_filter: MinifySamplerFilter::LinearMipmapLinear,
                magnify_filter: MagnifySamplerFilter::Linear,
                max_anisotropy: 16,
                ..Default::default()
            },
        )
    }

    pub fn skybox(&self) -> Sampler<'_, Cubemap> {
        Sampler(
            &self.skybox,
            SamplerBehavior {
                wrap_function: (
                    SamplerWrapFunction::Clamp,
                    SamplerWrapFunction::Clamp,
                    SamplerWrapFunction::Clamp,
                ),
                minify_filter: MinifySamplerFilter::Linear,
                magnify_filter: MagnifySamplerFilter::Linear,
                ..Default::default()
            },
        )
    }

    /// Comparison sampler for the `sampler2DShadow` lookup in the default
    /// program.
    pub fn shadow(&self) -> Sampler<'_, DepthTexture2d> {
        Sampler(
            &self.depth,
            SamplerBehavior {
                wrap_function: (
                    SamplerWrapFunction::Clamp,
                    SamplerWrapFunction::Clamp,
                    SamplerWrapFunction::Clamp,
                ),
                minify_filter: MinifySamplerFilter::Linear,
                magnify_filter: MagnifySamplerFilter::Linear,
                depth_texture_comparison: Some(DepthTextureComparison::LessOrEqual),
                ..Default::default()
            },
        )
    }

    pub fn depth(&self) -> &DepthTexture2d {
        &self.depth
    }
}

fn load_texture(
    display: &Display<WindowSurface>,
    path: &Path,
) -> Result<SrgbTexture2d, ViewerError> {
    let image = image::open(path)
        .map_err(|e| ViewerError::asset(path, e))?
        .to_rgba8();
    let dimensions = image.dimensions();
    let raw = RawImage2d::from_raw_rgba_reversed(&image.into_raw(), dimensions);

    SrgbTexture2d::with_mipmaps(display, raw, MipmapsOption::AutoGeneratedMipmaps).map_err(|e| {
        ViewerError::GpuResource {
            resource: "2d texture",
            reason: e.to_string(),
        }
    })
}

/// Loads the six face images and blits each into one layer of a cubemap.
fn load_cubemap(display: &Display<WindowSurface>, dir: &Path) -> Result<Cubemap, ViewerError> {
    let mut faces = Vec::with_capacity(6);
    for (layer, name) in CUBE_FACES {
        let path = dir.join(format!("{name}.png"));
        let image = image::open(&path)
            .map_err(|e| ViewerError::asset(&path, e))?
            .to_rgba8();
        let dimensions = image.dimensions();
        if dimensions.0 != dimensions.1 {
            return Err(ViewerError::asset(&path, "cubemap face is not square"));
        }
        faces.push((layer, dimensions.0, image));
    }

    let size = faces[0].1;
    let cubemap = Cubemap::empty(display, size).map_err(|e| ViewerError::GpuResource {
        resource: "skybox cubemap",
        reason: e.to_string(),
    })?;

    let target = BlitTarget {
        left: 0,
        bottom: 0,
        width: size as i32,
        height: size as i32,
    };
    for (layer, face_size, image) in faces {
        if face_size != size {
            return Err(ViewerError::asset(dir, "cubemap faces differ in size"));
        }
        let raw = RawImage2d::from_raw_rgba_reversed(&image.into_raw(), (face_size, face_size));
        let staging = Texture2d::new(display, raw).map_err(|e| ViewerError::GpuResource {
            resource: "cubemap staging texture",
            reason: e.to_string(),
        })?;
        let framebuffer = SimpleFrameBuffer::new(display, cubemap.main_level().image(layer))
            .map_err(|e| ViewerError::GpuResource {
                resource: "cubemap face framebuffer",
                reason: e.to_string(),
            })?;
        staging
            .as_surface()
            .blit_whole_color_to(&framebuffer, &target, MagnifySamplerFilter::Linear);
    }

    Ok(cubemap)
}
