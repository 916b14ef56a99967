//! # Ayurvedic knowledge base
//!
//! Backend for the Ayurveda chatbot frontend. It serves three things over
//! HTTP:
//!
//! - `POST /query`: finds known symptom keywords in free text and returns the
//!   remedies recorded for them in the symptom dataset.
//! - `GET /quiz/start`, `POST /quiz/answer`: a stateless multiple-choice quiz.
//! - `GET /herbs/`, `GET /herbs/{id}`, `POST /herbs/`: a herb catalogue kept
//!   in SQLite.
//!
//! Lookup failures on `/query` and `/quiz/answer` are reported in the body
//! with `"status": "fail"` and HTTP 200. Only a missing herb is a 404.
//!
//! ## Dataset
//!
//! CSV with the header `symptom,remedies,description,usage,precautions,image_url`.
//! Remedies within a cell are separated by `;`. The file is read once at
//! startup; a missing file or a missing `symptom`/`remedies` column stops the
//! server.
//!
//! ## Running
//!
//! ```sh
//! ayurkb --dataset data/ayurvedic_dataset.csv --db herbs.db --port 8000
//! ```
//!
//! Seed the herb catalogue:
//! ```sh
//! herbctl --db herbs.db import herbs.json
//! ```

pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod quiz;
pub mod remedy;
pub mod routes;
pub mod server;
pub mod state;
