#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use summarist::access::AccessGate;
use summarist::errors::GenerationError;
use summarist::generation::{GenerationInvoker, SamplingConfig, TextGenerator};
use summarist::service::SummaryService;
use summarist::store::RecordStore;

/// Generator that replays a fixed reply and remembers every prompt it saw
pub struct ScriptedGenerator {
  reply: Result<String, GenerationError>,
  prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
  pub fn replying(text: &str) -> Arc<Self> {
    Arc::new(Self { reply: Ok(text.to_string()), prompts: Mutex::new(Vec::new()) })
  }

  pub fn failing(error: GenerationError) -> Arc<Self> {
    Arc::new(Self { reply: Err(error), prompts: Mutex::new(Vec::new()) })
  }

  pub fn call_count(&self) -> usize {
    self.prompts.lock().unwrap().len()
  }

  pub fn prompts(&self) -> Vec<String> {
    self.prompts.lock().unwrap().clone()
  }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
  async fn generate(&self, prompt: &str, _sampling: &SamplingConfig) -> Result<String, GenerationError> {
    self.prompts.lock().unwrap().push(prompt.to_string());
    self.reply.clone()
  }
}

pub const PHRASE: &str = "correct horse battery staple";

pub fn service_with(generator: Arc<ScriptedGenerator>, store: RecordStore) -> SummaryService {
  let invoker = GenerationInvoker::new(generator, SamplingConfig::default());
  SummaryService::new(invoker, Arc::new(store), AccessGate::new([PHRASE]))
}

/// Parse exported CSV bytes into rows, header included
pub fn parse_export(bytes: &[u8]) -> Vec<Vec<String>> {
  csv::ReaderBuilder::new()
    .has_headers(false)
    .from_reader(bytes)
    .records()
    .map(|row| row.unwrap().iter().map(str::to_string).collect())
    .collect()
}
