use std::{path::Path, rc::Rc, time::Instant};

use glam::Vec3;
use winit::{
    event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use viewer::{
    app::{App, AppBehaviour, Window},
    camera::{Camera, CameraController},
    light::Light,
    mesh::MeshLibrary,
    renderer::SceneRenderer,
    scene::Scene,
};

struct ViewerApp {
    window: Rc<Window>,

    camera: Camera,
    controller: CameraController,
    library: MeshLibrary,
    scene: Scene,
    renderer: SceneRenderer,

    start: Instant,
    elapsed: f32,
}

impl AppBehaviour for ViewerApp {
    fn process_events(&mut self, event: Event<()>) -> bool {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => false,
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key),
                            state,
                            ..
                        },
                    ..
                } => {
                    self.controller.process_keyboard(key, state);
                    true
                }
                _ => true,
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                self.controller.process_mouse(delta.0 as f32, delta.1 as f32);
                true
            }
            _ => true,
        }
    }

    fn update(&mut self, delta_time: std::time::Duration) {
        self.controller
            .update_camera(&mut self.camera, delta_time.as_secs_f32());
        self.elapsed = self.start.elapsed().as_secs_f32();
    }

    fn render(&mut self, frame: &mut glium::Frame) {
        self.renderer.render(
            &self.window.display,
            frame,
            &mut self.scene,
            &self.camera,
            &self.library,
            self.elapsed,
        );
    }
}

impl ViewerApp {
    fn new(window: Rc<Window>) -> anyhow::Result<Self> {
        window
            .winit
            .set_cursor_grab(winit::window::CursorGrabMode::Locked)
            .or_else(|_| {
                window
                    .winit
                    .set_cursor_grab(winit::window::CursorGrabMode::Confined)
            })?;
        window.winit.set_cursor_visible(false);

        let window_size = {
            let size = window.winit.inner_size();
            (size.width, size.height)
        };

        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 4.0),
            -90.0,
            0.0,
            window_size.0 as f32 / window_size.1 as f32,
        );
        let light = Light::default();
        let library = MeshLibrary::new(&window.display, Path::new("assets"), window_size)?;
        let scene = Scene::new(library.batches(), &camera, &light, window_size);

        Ok(Self {
            window,
            camera,
            controller: CameraController::new(),
            library,
            scene,
            renderer: SceneRenderer::new(),
            start: Instant::now(),
            elapsed: 0.0,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let app = App::new("Scene Viewer", 1600, 900)?;

    let viewer = ViewerApp::new(app.window.clone())?;
    app.run(viewer)
}
