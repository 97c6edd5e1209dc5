use instant::Instant;
use scope_core::{AcquisitionError, AudioBackend, Completion, GraphError, SourceNode};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Web Audio graph for one attachment: buffer source -> analyser.
///
/// The analyser is not routed to the destination; the host's own media
/// element is what the user hears.
pub struct WebAudioBackend {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
}

impl WebAudioBackend {
    pub fn new(fft_size: usize) -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let analyser = ctx
            .create_analyser()
            .map_err(|e| anyhow::anyhow!("AnalyserNode error: {:?}", e))?;
        analyser.set_fft_size(fft_size as u32);
        Ok(Self { ctx, analyser })
    }
}

pub struct WebSource {
    node: web::AudioBufferSourceNode,
}

impl SourceNode for WebSource {
    fn start(&mut self, offset_secs: f64) -> Result<(), GraphError> {
        self.node
            .start_with_when_and_grain_offset(0.0, offset_secs)
            .map_err(|e| GraphError::Start(format!("{:?}", e)))
    }

    fn stop(&mut self) {
        _ = self.node.disconnect();
        _ = self.node.stop_with_when(0.0);
    }
}

impl AudioBackend for WebAudioBackend {
    type Buffer = web::AudioBuffer;
    type Source = WebSource;

    fn create_source(&mut self, buffer: &Rc<web::AudioBuffer>) -> Result<WebSource, GraphError> {
        let node = self
            .ctx
            .create_buffer_source()
            .map_err(|e| GraphError::CreateSource(format!("{:?}", e)))?;
        node.set_buffer(Some(&**buffer));
        node.connect_with_audio_node(&self.analyser)
            .map_err(|e| GraphError::CreateSource(format!("{:?}", e)))?;
        Ok(WebSource { node })
    }

    fn frequency_data(&mut self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }

    fn time_domain_data(&mut self, out: &mut [u8]) {
        self.analyser.get_byte_time_domain_data(out);
    }

    fn acquire(&mut self, url: &str, completion: Completion<web::AudioBuffer>) {
        let ctx = self.ctx.clone();
        let url = url.to_string();
        spawn_local(async move {
            let started = Instant::now();
            match fetch_and_decode(&ctx, &url).await {
                Ok(buffer) => {
                    log::info!(
                        "[acquire] decoded {:.1}s at {}Hz in {:?}",
                        buffer.duration(),
                        buffer.sample_rate(),
                        started.elapsed()
                    );
                    completion.succeed(buffer);
                }
                Err(e) => completion.fail(e),
            }
        });
    }

    fn close(&mut self) {
        _ = self.analyser.disconnect();
        if let Err(e) = self.ctx.close() {
            log::warn!("[audio] AudioContext close error: {:?}", e);
        }
    }
}

// The rendered <audio> element is cross-origin and cannot be tapped, so the
// bytes are fetched again and decoded here.
async fn fetch_and_decode(
    ctx: &web::AudioContext,
    url: &str,
) -> Result<web::AudioBuffer, AcquisitionError> {
    let fetch_err = |e: wasm_bindgen::JsValue| AcquisitionError::Fetch {
        url: url.to_string(),
        reason: format!("{:?}", e),
    };
    let decode_err = |e: wasm_bindgen::JsValue| AcquisitionError::Decode(format!("{:?}", e));

    let window = web::window().ok_or_else(|| AcquisitionError::Fetch {
        url: url.to_string(),
        reason: "no window".into(),
    })?;
    let opts = web::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web::RequestMode::Cors);
    let request = web::Request::new_with_str_and_init(url, &opts).map_err(fetch_err)?;

    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_err)?
        .dyn_into()
        .map_err(fetch_err)?;
    if !response.ok() {
        return Err(AcquisitionError::Fetch {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    let bytes: js_sys::ArrayBuffer = JsFuture::from(response.array_buffer().map_err(fetch_err)?)
        .await
        .map_err(fetch_err)?
        .dyn_into()
        .map_err(fetch_err)?;
    log::debug!("[acquire] fetched {} bytes", bytes.byte_length());

    JsFuture::from(ctx.decode_audio_data(&bytes).map_err(decode_err)?)
        .await
        .map_err(decode_err)?
        .dyn_into::<web::AudioBuffer>()
        .map_err(decode_err)
}
