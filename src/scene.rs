use glam::Vec3;

use crate::{
    camera::Camera,
    light::Light,
    mesh::RenderBatches,
    model::{LitModel, LitStatic, ModelDesc, SceneObject, Skybox},
    texture::TextureId,
};

/// The ordered object collection plus the skybox. The layout is authored
/// once here at startup; nothing is added or removed afterwards.
pub struct Scene {
    objects: Vec<SceneObject>,
    skybox: Skybox,
    statics: LitStatic,
}

impl Scene {
    pub fn new(
        batches: &RenderBatches,
        camera: &Camera,
        light: &Light,
        window_size: (u32, u32),
    ) -> Self {
        let statics = LitStatic::new(camera, light, window_size);
        let mut objects = Vec::new();

        let cube = |texture: TextureId, position: Vec3, scale: Vec3| {
            LitModel::new(
                batches.cube,
                batches.shadow_cube,
                ModelDesc::builder()
                    .texture(texture)
                    .position(position)
                    .rotation_deg(Vec3::ZERO)
                    .scale(scale)
                    .build(),
            )
        };

        // Floor: a 20x20 grid of unit cubes on a 2-unit pitch.
        for x in (-20..20).step_by(2) {
            for z in (-20..20).step_by(2) {
                objects.push(SceneObject::Cube(cube(
                    TextureId::Wood,
                    Vec3::new(x as f32, -2.0, z as f32),
                    Vec3::ONE,
                )));
            }
        }

        // Two stone columns climbing toward each other.
        for i in 0..9 {
            objects.push(SceneObject::Cube(cube(
                TextureId::Stone,
                Vec3::new(15.0, i as f32 * 2.0, -9.0 + i as f32),
                Vec3::ONE,
            )));
            objects.push(SceneObject::Cube(cube(
                TextureId::Stone,
                Vec3::new(15.0, i as f32 * 2.0, 5.0 - i as f32),
                Vec3::ONE,
            )));
        }

        objects.push(SceneObject::Cat(LitModel::new(
            batches.cat,
            batches.shadow_cat,
            ModelDesc::builder()
                .texture(TextureId::Cat)
                .position(Vec3::new(0.0, -1.0, -10.0))
                .rotation_deg(Vec3::new(-90.0, 0.0, 0.0))
                .scale(Vec3::ONE)
                .build(),
        )));

        objects.push(SceneObject::MovingCube(cube(
            TextureId::Metal,
            Vec3::new(0.0, 6.0, 8.0),
            Vec3::splat(3.0),
        )));

        log::info!("scene loaded with {} objects", objects.len());

        Self {
            objects,
            skybox: Skybox::Advanced(batches.advanced_skybox),
            statics,
        }
    }

    /// Advances per-frame animation from elapsed time in seconds.
    pub fn update(&mut self, elapsed: f32) {
        for object in &mut self.objects {
            object.update(elapsed);
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn skybox(&self) -> &Skybox {
        &self.skybox
    }

    pub fn statics(&self) -> &LitStatic {
        &self.statics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshId, RenderBatch};
    use crate::shader::ProgramId;
    use approx::assert_relative_eq;

    fn test_batches() -> RenderBatches {
        let batch = |mesh, program| RenderBatch { mesh, program };
        RenderBatches {
            cube: batch(MeshId::Cube, ProgramId::Default),
            shadow_cube: batch(MeshId::Cube, ProgramId::ShadowMap),
            cat: batch(MeshId::Cat, ProgramId::Default),
            shadow_cat: batch(MeshId::Cat, ProgramId::ShadowMap),
            skybox: batch(MeshId::Skybox, ProgramId::Skybox),
            advanced_skybox: batch(MeshId::AdvancedSkybox, ProgramId::AdvancedSkybox),
        }
    }

    fn test_scene() -> Scene {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), -90.0, 0.0, 16.0 / 9.0);
        let light = Light::default();
        Scene::new(&test_batches(), &camera, &light, (1600, 900))
    }

    #[test]
    fn authored_layout_has_the_expected_inventory() {
        let scene = test_scene();

        // 400 floor cubes + 18 column cubes + cat + moving cube.
        assert_eq!(scene.objects().len(), 420);

        let cats = scene
            .objects()
            .iter()
            .filter(|o| matches!(o, SceneObject::Cat(_)))
            .count();
        assert_eq!(cats, 1);
        assert!(matches!(scene.objects().last(), Some(SceneObject::MovingCube(_))));
        assert!(matches!(scene.skybox(), Skybox::Advanced(_)));
    }

    #[test]
    fn update_only_animates_the_moving_cube() {
        let mut scene = test_scene();
        scene.update(2.0);

        for object in scene.objects() {
            match object {
                SceneObject::MovingCube(model) => {
                    assert_relative_eq!(model.transform.rotation().y, 2.0);
                }
                SceneObject::Cube(model) => {
                    assert_relative_eq!(model.transform.rotation().y, 0.0);
                }
                SceneObject::Cat(model) => {
                    assert_relative_eq!(model.transform.rotation().y, 0.0);
                }
            }
        }
    }
}
