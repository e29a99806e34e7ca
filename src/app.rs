use std::{
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::Result;
use glium::{glutin::surface::WindowSurface, Display, Surface};
use simplelog::TermLogger;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
};

/// The frame loop is capped at 60 Hz.
const FRAME_TIME: Duration = Duration::from_micros(16_667);
const CLEAR_COLOR: (f32, f32, f32, f32) = (0.08, 0.16, 0.18, 1.0);

pub struct Window {
    pub winit: winit::window::Window,
    pub display: Display<WindowSurface>,
}

/// A windowed application driven by the event loop: raw event handling,
/// a per-frame update with the frame's delta time, and a render into an
/// already-cleared frame.
pub trait AppBehaviour {
    /// Returns `false` to quit.
    fn process_events(&mut self, event: Event<()>) -> bool;
    fn update(&mut self, delta_time: Duration);
    fn render(&mut self, frame: &mut glium::Frame);
}

pub struct App {
    pub window: Rc<Window>,
    event_loop: EventLoop<()>,
}

impl App {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        TermLogger::init(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )?;

        log::debug!("creating window and event loop");
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let (winit, display) = glium::backend::glutin::SimpleWindowBuilder::new()
            .with_title(title)
            .with_inner_size(width, height)
            .build(&event_loop);
        winit.set_resizable(false);

        Ok(Self {
            window: Rc::new(Window { winit, display }),
            event_loop,
        })
    }

    /// Runs the synchronous frame loop: events, update, shadow and color
    /// passes through the behaviour, then present.
    pub fn run<B: AppBehaviour + 'static>(self, mut behaviour: B) -> Result<()> {
        let App { window, event_loop } = self;

        let mut last_update = Instant::now();
        let mut next_frame = Instant::now();

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => elwt.exit(),
            Event::AboutToWait => {
                let now = Instant::now();
                if now < next_frame {
                    elwt.set_control_flow(ControlFlow::WaitUntil(next_frame));
                    return;
                }
                next_frame = now + FRAME_TIME;
                elwt.set_control_flow(ControlFlow::WaitUntil(next_frame));

                behaviour.update(now - last_update);
                last_update = now;

                let mut frame = window.display.draw();
                frame.clear_color_and_depth(CLEAR_COLOR, 1.0);
                behaviour.render(&mut frame);
                frame.finish().expect("to present the frame");
            }
            event => {
                if !behaviour.process_events(event) {
                    elwt.exit();
                }
            }
        })?;

        log::info!("event loop finished, releasing GPU context");
        Ok(())
    }
}
