//! CPU-side checks of the render pipeline math: the same matrices the
//! shaders consume, mirrored in glam, plus the frame plan and shader
//! asset layout. Nothing here needs a GPU context.

use std::path::Path;

use approx::assert_relative_eq;
use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

use viewer::camera::{rotation_only, Camera, FAR, NEAR};
use viewer::light::Light;
use viewer::renderer::{frame_plan, Pass, PlanItem};
use viewer::shader::PROGRAM_NAMES;

fn project(proj: Mat4, view: Mat4, world: Vec3) -> Vec3 {
    let clip = proj * view * world.extend(1.0);
    clip.xyz() / clip.w
}

#[test]
fn startup_camera_centers_the_origin_cube() {
    // The viewer spawns at (0, 0, 4) looking down -Z.
    let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), -90.0, 0.0, 16.0 / 9.0);

    let ndc = project(
        camera.projection_matrix(),
        camera.view_matrix(),
        Vec3::ZERO,
    );
    assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}

#[test]
fn yawing_right_moves_geometry_left_on_screen() {
    let mut previous = None;
    for yaw in [-90.0_f32, -87.5, -85.0, -82.5, -80.0] {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), yaw, 0.0, 16.0 / 9.0);
        let ndc = project(
            camera.projection_matrix(),
            camera.view_matrix(),
            Vec3::ZERO,
        );
        if let Some(last) = previous {
            assert!(ndc.x < last, "origin should slide left as yaw increases");
        }
        previous = Some(ndc.x);
    }
}

#[test]
fn near_and_far_planes_bound_depth() {
    let camera = Camera::new(Vec3::ZERO, -90.0, 0.0, 1.0);
    let proj = camera.projection_matrix();
    let view = camera.view_matrix();

    let near = project(proj, view, Vec3::new(0.0, 0.0, -NEAR * 1.001));
    let far = project(proj, view, Vec3::new(0.0, 0.0, -FAR * 0.999));
    assert!(near.z > -1.0 && near.z < far.z && far.z < 1.0);
}

#[test]
fn shadow_coordinates_land_inside_the_map() {
    // Mirror of the vertex shader's bias transform: clip space [-1, 1]
    // remapped to texture space [0, 1].
    let bias = Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 0.5, 0.0),
        Vec4::new(0.5, 0.5, 0.5, 1.0),
    );
    let camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), -90.0, 0.0, 16.0 / 9.0);
    let light = Light::default();

    // Sample a few spots lit geometry actually occupies.
    for world in [
        Vec3::ZERO,
        Vec3::new(0.0, -2.0, 0.0),
        Vec3::new(10.0, -2.0, -14.0),
        Vec3::new(0.0, 6.0, 8.0),
    ] {
        let clip = camera.projection_matrix() * light.view_matrix() * world.extend(1.0);
        let shadow = bias * clip;
        let uvz = shadow.xyz() / shadow.w;
        for component in [uvz.x, uvz.y, uvz.z] {
            assert!(
                (0.0..=1.0).contains(&component),
                "{world} maps outside the shadow map: {uvz}"
            );
        }
    }
}

#[test]
fn skybox_view_follows_rotation_but_not_position() {
    let here = Camera::new(Vec3::ZERO, -42.0, 17.0, 16.0 / 9.0);
    let there = Camera::new(Vec3::new(100.0, -30.0, 55.0), -42.0, 17.0, 16.0 / 9.0);

    let a = rotation_only(here.view_matrix()).to_cols_array();
    let b = rotation_only(there.view_matrix()).to_cols_array();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(x, y, epsilon = 1e-5);
    }
}

#[test]
fn plan_draws_every_object_twice_and_sky_once() {
    let plan = frame_plan(420);

    let shadow_draws = plan.iter().filter(|(pass, _)| *pass == Pass::Shadow).count();
    let color_objects = plan
        .iter()
        .filter(|(pass, item)| *pass == Pass::Color && matches!(item, PlanItem::Object(_)))
        .count();
    let sky_draws = plan
        .iter()
        .filter(|(_, item)| matches!(item, PlanItem::Skybox))
        .count();

    assert_eq!(shadow_draws, 420);
    assert_eq!(color_objects, 420);
    assert_eq!(sky_draws, 1);
    assert_eq!(plan.last(), Some(&(Pass::Color, PlanItem::Skybox)));

    let first_color = plan
        .iter()
        .position(|(pass, _)| *pass == Pass::Color)
        .unwrap();
    assert!(plan[..first_color]
        .iter()
        .all(|(pass, _)| *pass == Pass::Shadow));
}

#[test]
fn every_program_ships_both_shader_stages() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/shaders");
    for name in PROGRAM_NAMES {
        for ext in ["vert", "frag"] {
            let path = dir.join(format!("{name}.{ext}"));
            assert!(path.is_file(), "missing shader source {}", path.display());
        }
    }
}
