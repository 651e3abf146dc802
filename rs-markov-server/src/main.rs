use std::path::PathBuf;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{delete, get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use serde::Deserialize;

use rs_markov_core::io::{list_files, normalize_folder};
use rs_markov_core::model::generator::DEFAULT_MAX_LENGTH;
use rs_markov_core::persistence::{BINARY_EXTENSION, JSON_EXTENSION};
use rs_markov_core::{MarkovConfig, MarkovError, MarkovGenerator};

/// HTTP front-end for a single Markov chain.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Address to bind.
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind.
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Folder holding training texts (`.txt`) and saved chains (`.json`/`.bin`).
	#[arg(long, default_value = "./data")]
	data: String,

	/// Number of preceding tokens forming a state.
	#[arg(long, default_value_t = 2)]
	order: usize,

	/// Keep the case of the training text.
	#[arg(long)]
	case_sensitive: bool,

	/// Transitions less likely than this are never sampled.
	#[arg(long, default_value_t = 0.0)]
	min_probability: f64,

	/// Hard cap on generated tokens.
	#[arg(long, default_value_t = 1000)]
	max_generation_length: usize,

	/// Seed of the random source (random when omitted).
	#[arg(long)]
	seed: Option<u64>,
}

impl Args {
	fn config(&self) -> MarkovConfig {
		MarkovConfig {
			order: self.order,
			case_sensitive: self.case_sensitive,
			min_probability_threshold: self.min_probability,
			max_generation_length: self.max_generation_length,
			seed: self.seed,
			..MarkovConfig::default()
		}
	}
}

/// Most texts a single `/v1/generate` request may ask for.
const MAX_GENERATE_COUNT: usize = 100;

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_length: Option<usize>,
	count: Option<usize>,
	start_with: Option<String>,
}

#[derive(Deserialize)]
struct NameQuery {
	name: Option<String>,
}

#[derive(Deserialize)]
struct StateQuery {
	state: Option<String>,
}

struct SharedData {
	generator: MarkovGenerator,
	data_dir: PathBuf,
}

impl GenerateParams {
	/// Number of texts to generate, within `1..=MAX_GENERATE_COUNT`.
	fn count(&self) -> usize {
		self.count.unwrap_or(1).clamp(1, MAX_GENERATE_COUNT)
	}
}

impl NameQuery {
	/// Returns the trimmed name, rejecting empty names and path separators.
	fn name(&self) -> Result<&str, String> {
		match &self.name {
			Some(s) if s.trim().is_empty() => Err("Name cannot be empty".into()),
			Some(s) if s.contains(['/', '\\']) || s.contains("..") => {
				Err("Name cannot contain a path".into())
			}
			Some(s) => Ok(s.trim()),
			None => Err("Missing name".into()),
		}
	}
}

/// Maps a chain error to the matching HTTP status.
fn error_response(error: MarkovError) -> HttpResponse {
	log::warn!("Request failed: {error}");
	match error {
		MarkovError::InvalidConfiguration(_)
		| MarkovError::InvalidInput(_)
		| MarkovError::SchemaMismatch { .. } => HttpResponse::BadRequest().body(error.to_string()),
		MarkovError::NotFound(_) => HttpResponse::NotFound().body(error.to_string()),
		MarkovError::NotTrained => HttpResponse::Conflict().body(error.to_string()),
		_ => HttpResponse::InternalServerError().body(error.to_string()),
	}
}

macro_rules! lock_or_500 {
	($data:expr) => {
		match $data.lock() {
			Ok(shared) => shared,
			Err(_) => return HttpResponse::InternalServerError().body("Chain lock failed"),
		}
	};
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` texts (one per line, at most `MAX_GENERATE_COUNT`) from the shared chain.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let max_length = query.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
	let count = query.count();
	let start_with = query.start_with.as_deref().filter(|s| !s.trim().is_empty());

	let mut shared = lock_or_500!(data);
	let texts: Result<Vec<String>, MarkovError> = shared
		.generator
		.generate_texts(count, max_length, start_with)
		.collect();

	match texts {
		Ok(texts) => HttpResponse::Ok().body(texts.join("\n")),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Trains the shared chain on the request body.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared = lock_or_500!(data);
	match shared.generator.train(&body) {
		Ok(observations) => HttpResponse::Ok().body(format!("Trained {observations} transitions")),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/train_file`
///
/// Trains the shared chain on `<data>/<name>.txt`.
#[put("/v1/train_file")]
async fn put_train_file(data: web::Data<Mutex<SharedData>>, query: web::Query<NameQuery>) -> impl Responder {
	let name = match query.name() {
		Ok(name) => name,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared = lock_or_500!(data);
	let path = shared.data_dir.join(format!("{name}.txt"));
	match shared.generator.train_from_file(path) {
		Ok(observations) => HttpResponse::Ok().body(format!("Trained {observations} transitions")),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/models`
///
/// Lists the saved chains of the data folder.
#[get("/v1/models")]
async fn get_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = lock_or_500!(data).data_dir.clone();
	match list_files(&data_dir, &[JSON_EXTENSION, BINARY_EXTENSION]) {
		Ok(files) => HttpResponse::Ok().body(files.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

/// HTTP PUT endpoint `/v1/save`
///
/// Saves the shared chain to `<data>/<name>.json`.
#[put("/v1/save")]
async fn put_save(data: web::Data<Mutex<SharedData>>, query: web::Query<NameQuery>) -> impl Responder {
	let name = match query.name() {
		Ok(name) => name,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared = lock_or_500!(data);
	let path = shared.data_dir.join(format!("{name}.{JSON_EXTENSION}"));
	match shared.generator.save_to_file(path) {
		Ok(()) => HttpResponse::Ok().body("Chain saved successfully"),
		Err(e) => error_response(e),
	}
}

/// HTTP PUT endpoint `/v1/load`
///
/// Replaces the shared chain with `<data>/<name>.json`, or `<name>.bin` when
/// no JSON document exists.
#[put("/v1/load")]
async fn put_load(data: web::Data<Mutex<SharedData>>, query: web::Query<NameQuery>) -> impl Responder {
	let name = match query.name() {
		Ok(name) => name,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let mut shared = lock_or_500!(data);
	let mut path = shared.data_dir.join(format!("{name}.{JSON_EXTENSION}"));
	if !path.exists() {
		path.set_extension(BINARY_EXTENSION);
	}
	match shared.generator.load_from_file(path) {
		Ok(()) => HttpResponse::Ok().body("Chain loaded successfully"),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/statistics`
#[get("/v1/statistics")]
async fn get_statistics(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared = lock_or_500!(data);
	HttpResponse::Ok().json(shared.generator.statistics())
}

/// HTTP GET endpoint `/v1/probabilities`
///
/// Returns the next-token probabilities of a state given as space separated tokens.
#[get("/v1/probabilities")]
async fn get_probabilities(data: web::Data<Mutex<SharedData>>, query: web::Query<StateQuery>) -> impl Responder {
	let tokens: Vec<&str> = match &query.state {
		Some(s) => s.split_whitespace().collect(),
		None => return HttpResponse::BadRequest().body("Missing state"),
	};

	let shared = lock_or_500!(data);
	match shared.generator.next_token_probabilities(&tokens) {
		Ok(probabilities) => HttpResponse::Ok().json(probabilities),
		Err(e) => error_response(e),
	}
}

/// HTTP DELETE endpoint `/v1/chain`
#[delete("/v1/chain")]
async fn delete_chain(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let mut shared = lock_or_500!(data);
	shared.generator.clear();
	HttpResponse::Ok().body("Chain cleared")
}

/// Main entry point for the server.
///
/// Builds an untrained chain from the command line configuration, wraps it
/// in a `Mutex` and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let generator = MarkovGenerator::new(args.config())
		.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	let shared_data = SharedData {
		generator,
		data_dir: normalize_folder(&args.data),
	};
	log::info!(
		"Serving order-{} chain from {} on {}:{}",
		args.order,
		shared_data.data_dir.display(),
		args.host,
		args.port
	);
	let shared_chain = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(get_generated)
			.service(put_train)
			.service(put_train_file)
			.service(get_models)
			.service(put_save)
			.service(put_load)
			.service(get_statistics)
			.service(get_probabilities)
			.service(delete_chain)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(count: Option<usize>) -> GenerateParams {
		GenerateParams {
			max_length: None,
			count,
			start_with: None,
		}
	}

	#[test]
	fn generate_count_is_bounded() {
		assert_eq!(params(None).count(), 1);
		assert_eq!(params(Some(0)).count(), 1);
		assert_eq!(params(Some(7)).count(), 7);
		assert_eq!(params(Some(1_000_000_000)).count(), MAX_GENERATE_COUNT);
	}

	#[test]
	fn names_cannot_escape_the_data_folder() {
		let query = |name: &str| NameQuery { name: Some(name.to_owned()) };
		assert_eq!(query(" chain ").name(), Ok("chain"));
		assert!(query("../secret").name().is_err());
		assert!(query("a/b").name().is_err());
		assert!(query("  ").name().is_err());
		assert!(NameQuery { name: None }.name().is_err());
	}
}
