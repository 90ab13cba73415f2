extern crate sdl2;

use log::trace;

use sdl2::event::Event as SdlEvent;
use sdl2::keyboard::Keycode;
use sdl2::{pixels::Color, rect::Rect};

use chip8vm::arch;
use chip8vm::framebuffer::Frame;

const BORDER_SIZE: u32 = 1;

const BACKGROUND_COLOR: Color = Color::BLUE;
const PIXEL_COLOR: Color = Color::RGB(200, 200, 200);

const TONE_HZ: f32 = 440.0;

pub enum Event {
    KeyPress(u8),
    KeyUnpress(u8),
    Quit,
}

pub struct EventIterator<'a> {
    event_pump: &'a mut sdl2::EventPump,
}

impl<'a> Iterator for EventIterator<'a> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip events we don't care about without ending the iteration.
        loop {
            let event = self.event_pump.poll_event()?;
            if let Some(e) = Events::match_event(event) {
                return Some(e);
            }
        }
    }
}

pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    pixel_size: u32,
}

impl Display {
    pub fn new(canvas: sdl2::render::WindowCanvas, pixel_size: u32) -> Display {
        Display {
            canvas,
            pixel_size,
        }
    }

    pub fn present_frame(&mut self, frame: &Frame) -> Result<(), String> {
        let inner = self.pixel_size.saturating_sub(2 * BORDER_SIZE).max(1);

        self.canvas.set_draw_color(BACKGROUND_COLOR);
        self.canvas.clear();
        self.canvas.set_draw_color(PIXEL_COLOR);

        let width = arch::DISPLAY_WIDTH as usize;
        let pixels: Vec<Rect> = frame.iter()
            .enumerate()
            .filter(|(_, p)| **p != 0)
            .map(|(idx, _)| {
                let x = (self.pixel_size * (idx % width) as u32 + BORDER_SIZE) as i32;
                let y = (self.pixel_size * (idx / width) as u32 + BORDER_SIZE) as i32;
                Rect::new(x, y, inner, inner)
            })
            .collect();

        self.canvas.fill_rects(&pixels)?;
        self.canvas.present();
        Ok(())
    }
}

/// Conventional layout of the hex keypad on a QWERTY keyboard.
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
fn keymap(keycode: Keycode) -> Option<u8> {
    let key = match keycode {
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Num4 => 0xC,
        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::R => 0xD,
        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::F => 0xE,
        Keycode::Z => 0xA,
        Keycode::X => 0x0,
        Keycode::C => 0xB,
        Keycode::V => 0xF,
        _ => return None,
    };
    Some(key)
}

pub struct Events {
    event_pump: sdl2::EventPump,
}

impl Events {
    pub fn new(event_pump: sdl2::EventPump) -> Events {
        Events {
            event_pump,
        }
    }

    pub fn poll_iter(&mut self) -> EventIterator {
        EventIterator {
            event_pump: &mut self.event_pump,
        }
    }

    fn match_event(sdl2_event: SdlEvent) -> Option<Event> {
        match sdl2_event {
            SdlEvent::Quit { .. }
            | SdlEvent::KeyDown { keycode: Some(Keycode::Escape), .. } => Some(Event::Quit),

            SdlEvent::KeyDown { keycode: Some(k), repeat: false, .. } => keymap(k).map(Event::KeyPress),
            SdlEvent::KeyUp { keycode: Some(k), repeat: false, .. } => keymap(k).map(Event::KeyUnpress),

            _ => None,
        }
    }
}

pub struct Audio {
    dev: sdl2::audio::AudioDevice<SinWave>,
    is_on: bool,
}

struct SinWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl SinWave {
    pub fn new(freq: f32, spec: &sdl2::audio::AudioSpec) -> SinWave {
        SinWave {
            phase_inc: freq / spec.freq as f32,
            phase: 0.0,
            volume: 0.25,
        }
    }
}

impl sdl2::audio::AudioCallback for SinWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for i in out.iter_mut() {
            let phase = self.phase * 2.0 * std::f32::consts::PI;
            *i = phase.sin() * self.volume;

            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

impl Audio {
    pub fn new(audio_subsystem: sdl2::AudioSubsystem) -> Result<Audio, String> {
        let spec = sdl2::audio::AudioSpecDesired {
            freq: Some(44100),
            channels: Some(1),
            samples: None,
        };
        let dev = audio_subsystem.open_playback(None, &spec, |spec| {
            SinWave::new(TONE_HZ, &spec)
        })?;
        Ok(Audio {
            dev,
            is_on: false,
        })
    }

    /// Follow the machine's tone request, touching the device only on change.
    pub fn set(&mut self, on: bool) {
        if on == self.is_on {
            return;
        }
        if on {
            trace!("Sound on");
            self.dev.resume();
        } else {
            trace!("Sound off");
            self.dev.pause();
        }
        self.is_on = on;
    }
}

pub struct Ui {
    pub display: Display,
    pub events: Events,
    pub audio: Audio,
}

impl Ui {
    pub fn new(title: &str, pixel_size: u32) -> Result<Self, String> {
        let sdl_ctx = sdl2::init()?;
        let video = sdl_ctx.video()?;
        let window = video.window(title, pixel_size * arch::DISPLAY_WIDTH, pixel_size * arch::DISPLAY_HEIGHT)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window.into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;
        canvas.set_draw_color(BACKGROUND_COLOR);
        canvas.clear();
        canvas.present();

        let event_pump = sdl_ctx.event_pump()?;
        let audio_subsystem = sdl_ctx.audio()?;

        Ok(Ui {
            display: Display::new(canvas, pixel_size),
            events: Events::new(event_pump),
            audio: Audio::new(audio_subsystem)?,
        })
    }
}
