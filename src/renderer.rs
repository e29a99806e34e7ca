use glium::{
    framebuffer::SimpleFrameBuffer, glutin::surface::WindowSurface, Display, Frame, Surface,
};

use crate::{camera::Camera, mesh::MeshLibrary, model::FrameCtx, scene::Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Shadow,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanItem {
    Object(usize),
    Skybox,
}

/// The ordered draw list for one frame: every object into the depth
/// framebuffer first, then every object into the screen framebuffer in
/// insertion order, then the skybox exactly once, last. The skybox casts
/// no shadow and never appears in the shadow pass.
pub fn frame_plan(object_count: usize) -> Vec<(Pass, PlanItem)> {
    let mut plan = Vec::with_capacity(object_count * 2 + 1);
    for index in 0..object_count {
        plan.push((Pass::Shadow, PlanItem::Object(index)));
    }
    for index in 0..object_count {
        plan.push((Pass::Color, PlanItem::Object(index)));
    }
    plan.push((Pass::Color, PlanItem::Skybox));
    plan
}

/// Orchestrates the two render passes. The depth texture is allocated
/// once at startup (owned by the texture set); per-frame work only clears
/// and rewrites its contents.
pub struct SceneRenderer;

impl SceneRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        display: &Display<WindowSurface>,
        frame: &mut Frame,
        scene: &mut Scene,
        camera: &Camera,
        library: &MeshLibrary,
        elapsed: f32,
    ) {
        scene.update(elapsed);

        let ctx = FrameCtx::new(library, camera, scene.statics());

        let mut depth_target = SimpleFrameBuffer::depth_only(display, library.textures().depth())
            .expect("to wrap the depth texture in a framebuffer");
        depth_target.clear_depth(1.0);

        for (pass, item) in frame_plan(scene.objects().len()) {
            match (pass, item) {
                (Pass::Shadow, PlanItem::Object(index)) => scene.objects()[index]
                    .render_shadow(&mut depth_target, &ctx)
                    .expect("to draw shadow pass"),
                (Pass::Color, PlanItem::Object(index)) => scene.objects()[index]
                    .render_color(frame, &ctx)
                    .expect("to draw color pass"),
                (Pass::Color, PlanItem::Skybox) => scene
                    .skybox()
                    .render(frame, &ctx)
                    .expect("to draw skybox"),
                (Pass::Shadow, PlanItem::Skybox) => unreachable!("skybox casts no shadow"),
            }
        }
    }
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_draws_strictly_precede_color_draws() {
        let plan = frame_plan(420);

        let first_color = plan
            .iter()
            .position(|(pass, _)| *pass == Pass::Color)
            .unwrap();
        let last_shadow = plan
            .iter()
            .rposition(|(pass, _)| *pass == Pass::Shadow)
            .unwrap();
        assert!(last_shadow < first_color);

        let shadow_draws = plan.iter().filter(|(pass, _)| *pass == Pass::Shadow).count();
        assert_eq!(shadow_draws, 420);
    }

    #[test]
    fn skybox_is_drawn_exactly_once_and_last() {
        let plan = frame_plan(7);

        let skybox_draws: Vec<usize> = plan
            .iter()
            .enumerate()
            .filter(|(_, (_, item))| *item == PlanItem::Skybox)
            .map(|(index, _)| index)
            .collect();
        assert_eq!(skybox_draws, vec![plan.len() - 1]);
        assert_eq!(plan[plan.len() - 1].0, Pass::Color);
    }

    #[test]
    fn empty_scene_still_draws_the_skybox() {
        let plan = frame_plan(0);
        assert_eq!(plan, vec![(Pass::Color, PlanItem::Skybox)]);
    }
}
