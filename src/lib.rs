#![cfg(target_arch = "wasm32")]
use scope_core::{AdmissionPolicy, PlaybackObserver, VisualizerInstance};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod frame;
mod options;
mod playback;
mod render;

pub use options::VisualizerOptions;

type WebInstance = VisualizerInstance<audio::WebAudioBackend, render::CanvasSurface, playback::SharedPlayback>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(constants::LOG_LEVEL).ok();
    log::info!("scope-web loaded");
    Ok(())
}

/// Size gate for the host's mount hook: `"<number> <unit>"` with units
/// `bytes|KB|MB|GB`. Unknown units are admitted.
#[wasm_bindgen(js_name = admitAttachment)]
pub fn admit_attachment(file_size: &str, limit_bytes: Option<f64>, bypass: bool) -> bool {
    let mut policy = AdmissionPolicy::default();
    if let Some(limit) = limit_bytes {
        policy.limit_bytes = limit;
    }
    policy.bypass = bypass;
    policy.admit(file_size).is_admitted()
}

/// Spectrogram + oscilloscope overlay for one audio attachment element.
#[wasm_bindgen]
pub struct AttachmentVisualizer {
    instance: Rc<RefCell<WebInstance>>,
    playback: playback::SharedPlayback,
    alive: Rc<Cell<bool>>,
    frames: frame::FrameLoop,
}

#[wasm_bindgen]
impl AttachmentVisualizer {
    /// Append an overlay canvas to `host` and start the frame loop.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host: web::Element,
        src: String,
        options: Option<VisualizerOptions>,
    ) -> Result<AttachmentVisualizer, JsValue> {
        Self::build(&host, &src, options.unwrap_or_default())
            .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
    }

    /// Push the host player's state. `current_time` is in seconds.
    pub fn observe(&self, playing: bool, current_time: f64) {
        self.playback.set(playing, current_time);
    }

    #[wasm_bindgen(getter)]
    pub fn alive(&self) -> bool {
        self.alive.get()
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Tear down: stop scheduling frames, close the audio context and remove
    /// the canvas. Further calls are no-ops.
    pub fn destroy(&self) {
        if !self.alive.replace(false) {
            return;
        }
        self.frames.cancel();
        // Inside a frame the callback finishes the teardown itself.
        if let Ok(mut instance) = self.instance.try_borrow_mut() {
            teardown(&mut instance);
        }
    }
}

// JS `free()` without `destroy()` still detaches the canvas.
impl Drop for AttachmentVisualizer {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl AttachmentVisualizer {
    fn build(
        host: &web::Element,
        src: &str,
        options: VisualizerOptions,
    ) -> anyhow::Result<AttachmentVisualizer> {
        let config = options.config().clone();
        let spectrum_color = config.spectrograph_color.resolve(dom::theme_property);
        let scope_color = config.oscilloscope_color.resolve(dom::theme_property);

        let canvas = dom::attach_canvas(host)?;
        let surface = render::CanvasSurface::new(canvas, spectrum_color, scope_color)?;
        let backend = audio::WebAudioBackend::new(config.fft_size())?;
        let playback = playback::SharedPlayback::new(src);
        let instance = VisualizerInstance::new(config, backend, surface, playback.clone())
            .map_err(|e| anyhow::anyhow!("invalid options: {}", e))?;

        let instance = Rc::new(RefCell::new(instance));
        let alive = Rc::new(Cell::new(true));
        let frames = {
            let instance = instance.clone();
            let alive = alive.clone();
            frame::FrameLoop::start(move |timestamp| {
                let Ok(mut inst) = instance.try_borrow_mut() else {
                    return alive.get();
                };
                let keep = alive.get() && inst.frame(timestamp);
                if !alive.get() {
                    teardown(&mut inst);
                }
                keep
            })
        };
        log::info!("[instance] attached visualizer for {}", src);
        Ok(AttachmentVisualizer {
            instance,
            playback,
            alive,
            frames,
        })
    }
}

fn teardown(instance: &mut WebInstance) {
    if instance.is_alive() {
        instance.destroy();
        instance.surface().remove();
    }
}
