//! Backend payload types and the fetch plumbing shared by both graph views.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// One character row as served by the backend. Optional sequences decode
/// as empty; unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CharacterRecord {
	pub character: String,
	#[serde(default)]
	pub frame_number: Option<u32>,
	#[serde(default)]
	pub volume: Option<u32>,
	#[serde(default)]
	pub chapter: Option<u32>,
	#[serde(default)]
	pub story: Option<String>,
	#[serde(default)]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub primitive_elements: Vec<String>,
	#[serde(default)]
	pub primitive_meanings: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Metadata {
	#[serde(default)]
	pub volumes: Vec<VolumeInfo>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct VolumeInfo {
	pub number: u32,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub chapters: Vec<ChapterInfo>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChapterInfo {
	pub number: u32,
	#[serde(default)]
	pub title: String,
}

/// Active volume/chapter narrowing, merged into list and search queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Filters {
	pub volume: Option<u32>,
	pub chapter: Option<u32>,
}

impl Filters {
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::new();
		if let Some(volume) = self.volume {
			pairs.push(("volume", volume.to_string()));
		}
		if let Some(chapter) = self.chapter {
			pairs.push(("chapter", chapter.to_string()));
		}
		pairs
	}
}

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("request failed: {0}")]
	Network(String),
	#[error("server responded with status {0}")]
	Status(u16),
	#[error("unexpected response payload: {0}")]
	Decode(#[from] serde_json::Error),
}

impl From<JsValue> for ApiError {
	fn from(value: JsValue) -> Self {
		ApiError::Network(format!("{value:?}"))
	}
}

/// Formats an optional backend number for display.
pub fn number_or_na(value: Option<u32>) -> String {
	value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn build_url(path: &str, pairs: &[(&str, String)]) -> String {
	if pairs.is_empty() {
		return path.to_string();
	}
	let query: Vec<String> = pairs
		.iter()
		.map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
		.collect();
	format!("{path}?{}", query.join("&"))
}

// The backend injects its protective token into the page head; requests
// carry it along without the app knowing anything else about it.
fn csrf_token() -> Option<String> {
	web_sys::window()?
		.document()?
		.query_selector("meta[name=\"csrf-token\"]")
		.ok()
		.flatten()?
		.get_attribute("content")
}

pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".to_string()))?;
	let init = RequestInit::new();
	init.set_method("GET");
	let request = Request::new_with_str_and_init(url, &init)?;
	if let Some(token) = csrf_token() {
		request.headers().set("X-CSRFToken", &token)?;
	}

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await?
		.dyn_into()
		.map_err(|_| ApiError::Network("fetch did not produce a response".to_string()))?;
	if !response.ok() {
		return Err(ApiError::Status(response.status()));
	}

	let body: js_sys::JsString = JsFuture::from(response.text()?)
		.await?
		.dyn_into()
		.map_err(|_| ApiError::Network("response body was not text".to_string()))?;
	Ok(serde_json::from_str(&String::from(body))?)
}

/// Fetches the character list the explorer graph is rebuilt from.
pub async fn fetch_characters(filters: &Filters) -> Result<Vec<CharacterRecord>, ApiError> {
	get_json(&build_url("/api/characters", &filters.query_pairs())).await
}

/// Fetches the full detail record for one character.
pub async fn fetch_character(id: &str) -> Result<CharacterRecord, ApiError> {
	get_json(&format!("/api/character/{}", urlencoding::encode(id))).await
}

/// Searches characters by keyword or primitive element, narrowed by the
/// active filters.
pub async fn search_characters(
	query: &str,
	filters: &Filters,
) -> Result<Vec<CharacterRecord>, ApiError> {
	let mut pairs = filters.query_pairs();
	pairs.push(("q", query.to_string()));
	get_json(&build_url("/api/search", &pairs)).await
}

/// Fetches the volume/chapter catalog backing the filter controls.
pub async fn fetch_metadata() -> Result<Metadata, ApiError> {
	get_json("/api/metadata").await
}

/// Monotonic token source for panel-bound requests. A response whose
/// ticket is no longer current must be dropped, not rendered.
#[derive(Clone, Debug, Default)]
pub struct RequestSequence(Arc<AtomicU64>);

#[derive(Debug)]
pub struct RequestTicket {
	sequence: Arc<AtomicU64>,
	token: u64,
}

impl RequestSequence {
	pub fn begin(&self) -> RequestTicket {
		let token = self.0.fetch_add(1, Ordering::Relaxed) + 1;
		RequestTicket {
			sequence: Arc::clone(&self.0),
			token,
		}
	}
}

impl RequestTicket {
	pub fn is_current(&self) -> bool {
		self.sequence.load(Ordering::Relaxed) == self.token
	}
}
