// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine

pub mod types;
pub mod error;
pub mod rng;
pub mod validation;
pub mod process;
pub mod aggregator;
pub mod engine;
pub mod protocol;

pub use types::*;
pub use error::SimError;
pub use rng::XorShift32;
pub use process::{simulate_ticks, TickStream};
pub use aggregator::{aggregate, bucket_start, CandleAggregator};
pub use engine::run_simulation;
pub use protocol::{handle_request, WorkerRequest, WorkerResponse};

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

fn report(message: &str) {
    #[cfg(target_arch = "wasm32")]
    log(message);
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{}", message);
}

/// Convert a response to a JS value. A response the JS side cannot represent
/// (an `i64` timestamp beyond 2^53) is replaced by an `error` response.
pub fn encode_response(response: &WorkerResponse) -> JsValue {
    serde_wasm_bindgen::to_value(response).unwrap_or_else(|err| {
        let message = format!("failed to encode response: {}", err);
        report(&message);
        serde_wasm_bindgen::to_value(&WorkerResponse::error(message)).unwrap_or(JsValue::NULL)
    })
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Engine handle owned by the hosting web worker. Stateless between calls.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct SimulationWorker {
    _private: (),
}

#[wasm_bindgen]
impl SimulationWorker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        Self::default()
    }

    /// Answer one worker message (`runSimulation` or `ping`).
    pub fn handle(&self, request: JsValue) -> JsValue {
        let response = match serde_wasm_bindgen::from_value::<WorkerRequest>(request) {
            Ok(req) => handle_request(req),
            Err(err) => WorkerResponse::error(format!("malformed request: {}", err)),
        };
        if let WorkerResponse::Error { message } = &response {
            report(message);
        }
        encode_response(&response)
    }

    /// Run directly; throws the error message on failure.
    pub fn run(&self, params: JsValue) -> Result<JsValue, JsValue> {
        let params: SimulationParams = serde_wasm_bindgen::from_value(params)
            .map_err(|err| JsValue::from_str(&format!("malformed params: {}", err)))?;
        let result = protocol::run_guarded(&params).map_err(|err| {
            let message = err.to_string();
            report(&message);
            JsValue::from_str(&message)
        })?;
        serde_wasm_bindgen::to_value(&result).map_err(JsValue::from)
    }

    pub fn ping(&self) -> JsValue {
        encode_response(&WorkerResponse::Pong)
    }

    /// Default parameter set, for seeding parameter forms.
    pub fn default_params(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&SimulationParams::default()).unwrap_or(JsValue::NULL)
    }
}
