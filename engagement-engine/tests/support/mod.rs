//! Scripted in-memory configuration API shared by the engine tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use engagement_core::{FetchError, HttpError, PartnerKey, PartnerPatch};
use engagement_engine::{ConfigAggregationEngine, ConfigFetcher, ConfigTransport};

#[derive(Default)]
pub struct FakeApi {
    defaults: Mutex<HashMap<String, Result<Value, FetchError>>>,
    queued: Mutex<HashMap<String, VecDeque<Result<Value, FetchError>>>>,
    patch_replies: Mutex<VecDeque<Result<(), FetchError>>>,
    pub gets: Mutex<Vec<String>>,
    pub patches: Mutex<Vec<(PartnerKey, PartnerPatch)>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer every GET of `resource` with `reply`.
    pub fn serve(&self, resource: &str, reply: Result<Value, FetchError>) {
        self.defaults
            .lock()
            .expect("lock")
            .insert(resource.to_string(), reply);
    }

    /// Answer the next GET of `resource` with `reply`, before any default.
    pub fn serve_once(&self, resource: &str, reply: Result<Value, FetchError>) {
        self.queued
            .lock()
            .expect("lock")
            .entry(resource.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Answer the next PATCH (in dispatch order) with `reply`; unscripted
    /// patches succeed.
    pub fn reply_to_patch(&self, reply: Result<(), FetchError>) {
        self.patch_replies.lock().expect("lock").push_back(reply);
    }

    pub fn get_log(&self) -> Vec<String> {
        self.gets.lock().expect("lock").clone()
    }

    pub fn patch_log(&self) -> Vec<(PartnerKey, PartnerPatch)> {
        self.patches.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ConfigTransport for FakeApi {
    async fn get(&self, resource: &str) -> Result<Value, FetchError> {
        self.gets.lock().expect("lock").push(resource.to_string());
        if let Some(reply) = self
            .queued
            .lock()
            .expect("lock")
            .get_mut(resource)
            .and_then(VecDeque::pop_front)
        {
            return reply;
        }
        self.defaults
            .lock()
            .expect("lock")
            .get(resource)
            .cloned()
            .unwrap_or_else(|| Err(HttpError::new(404, "Not Found").into()))
    }

    async fn patch(&self, key: &PartnerKey, body: &PartnerPatch) -> Result<(), FetchError> {
        self.patches
            .lock()
            .expect("lock")
            .push((key.clone(), body.clone()));
        self.patch_replies
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

pub fn common_body(groups: Value, shifts: &[&str], day: &str, shift_index: usize) -> Value {
    json!({
        "partnerGroups": groups,
        "shiftStartTimes": shifts,
        "weekStart": { "day": day, "shiftIndex": shift_index }
    })
}

pub fn partner_body(title: &str, engaged: &[bool], cycle_time: f64, efficiency: f64) -> Value {
    json!({
        "title": title,
        "shiftEngaged": engaged,
        "targetCycleTime": cycle_time,
        "targetEfficiency": efficiency
    })
}

/// Zone `_` listing partner `_` twice, one unnamed shift, Monday start,
/// partner `{ shiftEngaged: [true, false], targetCycleTime: 60, targetEfficiency: 1 }`.
pub fn default_api() -> Arc<FakeApi> {
    let api = FakeApi::new();
    api.serve(
        "common",
        Ok(common_body(json!({ "_": ["_", "_"] }), &[""], "Monday", 0)),
    );
    api.serve("_", Ok(partner_body("", &[true, false], 60.0, 1.0)));
    api
}

pub fn engine_for(api: &Arc<FakeApi>) -> ConfigAggregationEngine {
    let transport: Arc<dyn ConfigTransport> = api.clone();
    ConfigAggregationEngine::new(ConfigFetcher::new(transport))
}

pub fn engaged_total(engine: &ConfigAggregationEngine) -> (usize, usize) {
    let engaged: usize = engine.rows().iter().map(|r| r.engaged_count()).sum();
    let slots: usize = engine.rows().iter().map(|r| r.shift_engaged.len()).sum();
    (engaged, slots - engaged)
}
