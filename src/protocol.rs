// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Worker Message Protocol

//! One-shot request/response messages exchanged with the hosting worker.
//!
//! ```text
//! {"type":"runSimulation","params":{...}}  ->  {"type":"simulationResult","result":{"candles":[...]}}
//! {"type":"ping"}                          ->  {"type":"pong"}
//! anything that fails                      ->  {"type":"error","message":"..."}
//! ```

use std::panic::{self, AssertUnwindSafe};

use serde::{Serialize, Deserialize};

use crate::engine::run_simulation;
use crate::error::SimError;
use crate::types::{SimulationParams, SimulationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerRequest {
    RunSimulation { params: SimulationParams },
    Ping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerResponse {
    Pong,
    SimulationResult { result: SimulationResult },
    Error { message: String },
}

impl WorkerResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<Result<SimulationResult, SimError>> for WorkerResponse {
    fn from(outcome: Result<SimulationResult, SimError>) -> Self {
        match outcome {
            Ok(result) => Self::SimulationResult { result },
            Err(err) => Self::error(err.to_string()),
        }
    }
}

/// Run the engine, converting a panic into `SimError::Internal`.
pub fn run_guarded(params: &SimulationParams) -> Result<SimulationResult, SimError> {
    panic::catch_unwind(AssertUnwindSafe(|| run_simulation(params)))
        .unwrap_or_else(|payload| Err(SimError::Internal(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "simulation panicked".to_string()
    }
}

/// Dispatch a decoded request.
pub fn handle_request(request: WorkerRequest) -> WorkerResponse {
    match request {
        WorkerRequest::Ping => WorkerResponse::Pong,
        WorkerRequest::RunSimulation { params } => run_guarded(&params).into(),
    }
}

/// Decode, dispatch and encode a JSON message.
pub fn handle_json(request: &str) -> String {
    let response = match serde_json::from_str::<WorkerRequest>(request) {
        Ok(req) => handle_request(req),
        Err(err) => WorkerResponse::error(format!("malformed request: {}", err)),
    };
    serde_json::to_string(&response).unwrap_or_else(|err| {
        format!(r#"{{"type":"error","message":"failed to encode response: {}"}}"#, err)
    })
}
