//! Ownership record schema and the network boundary that loads it.

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// Source dataset: one JSON array of ownership records, fetched once at startup.
pub const DATA_URL: &str =
	"https://raw.githubusercontent.com/hsianghsi/dimes/master/dimesA.json";

/// One raw ownership record: a business, its classification, and the people
/// or entities named as its owners. All fields are required; a record missing
/// any of them fails decoding instead of propagating undefined attributes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OwnershipRecord {
	/// Business name, used as the unique node key.
	#[serde(rename = "DBA")]
	pub business: String,
	/// Classification tag ("A" is styled apart from the rest).
	#[serde(rename = "Class")]
	pub class: String,
	/// Owner names, in record order. May repeat across (or within) records.
	#[serde(rename = "OwnerList")]
	pub owners: Vec<String>,
}

/// Failures at the load boundary. Payloads are plain strings so the error
/// stays `Clone + Send + Sync` and can live in a signal behind an
/// `ErrorBoundary`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DataError {
	#[error("request failed: {0}")]
	Request(String),
	#[error("server returned status {0}")]
	Status(u16),
	#[error("invalid ownership data: {0}")]
	Decode(String),
}

/// Decode the raw JSON payload into records, failing fast on any record
/// that does not match the schema.
pub fn parse_records(json: &str) -> Result<Vec<OwnershipRecord>, DataError> {
	serde_json::from_str(json).map_err(|e| DataError::Decode(e.to_string()))
}

/// Fetch and decode the record list. Called once when the home page mounts.
pub async fn fetch_records(url: &str) -> Result<Vec<OwnershipRecord>, DataError> {
	let window = web_sys::window().ok_or_else(|| DataError::Request("no window".into()))?;

	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| DataError::Request(js_error_message(&e)))?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| DataError::Request("fetch did not yield a response".into()))?;
	if !response.ok() {
		return Err(DataError::Status(response.status()));
	}

	let body = response
		.text()
		.map_err(|e| DataError::Request(js_error_message(&e)))?;
	let body = JsFuture::from(body)
		.await
		.map_err(|e| DataError::Request(js_error_message(&e)))?;
	let body = body
		.as_string()
		.ok_or_else(|| DataError::Request("response body was not text".into()))?;

	parse_records(&body)
}

fn js_error_message(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
