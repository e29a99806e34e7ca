use std::{fs, path::Path};

use glium::{glutin::surface::WindowSurface, Display, Program};

use crate::error::ViewerError;

pub const PROGRAM_NAMES: [&str; 4] = ["default", "skybox", "advanced_skybox", "shadow_map"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramId {
    Default,
    Skybox,
    AdvancedSkybox,
    ShadowMap,
}

impl ProgramId {
    pub fn name(self) -> &'static str {
        match self {
            ProgramId::Default => "default",
            ProgramId::Skybox => "skybox",
            ProgramId::AdvancedSkybox => "advanced_skybox",
            ProgramId::ShadowMap => "shadow_map",
        }
    }
}

/// The four compiled shader programs, loaded by name from
/// `{dir}/{name}.vert` + `{dir}/{name}.frag` at startup. A missing source
/// file or compile failure is fatal.
pub struct ShaderLibrary {
    default: Program,
    skybox: Program,
    advanced_skybox: Program,
    shadow_map: Program,
}

impl ShaderLibrary {
    pub fn load(display: &Display<WindowSurface>, dir: &Path) -> Result<Self, ViewerError> {
        Ok(Self {
            default: load_program(display, dir, "default")?,
            skybox: load_program(display, dir, "skybox")?,
            advanced_skybox: load_program(display, dir, "advanced_skybox")?,
            shadow_map: load_program(display, dir, "shadow_map")?,
        })
    }

    pub fn get(&self, id: ProgramId) -> &Program {
        match id {
            ProgramId::Default => &self.default,
            ProgramId::Skybox => &self.skybox,
            ProgramId::AdvancedSkybox => &self.advanced_skybox,
            ProgramId::ShadowMap => &self.shadow_map,
        }
    }
}

fn load_program(
    display: &Display<WindowSurface>,
    dir: &Path,
    name: &str,
) -> Result<Program, ViewerError> {
    let vert_path = dir.join(format!("{name}.vert"));
    let frag_path = dir.join(format!("{name}.frag"));

    let vertex_source =
        fs::read_to_string(&vert_path).map_err(|e| ViewerError::asset(&vert_path, e))?;
    let fragment_source =
        fs::read_to_string(&frag_path).map_err(|e| ViewerError::asset(&frag_path, e))?;

    log::debug!("compiling shader program `{name}`");
    Program::from_source(display, &vertex_source, &fragment_source, None).map_err(|e| {
        ViewerError::ShaderCompile {
            name: name.to_string(),
            reason: e.to_string(),
        }
    })
}
