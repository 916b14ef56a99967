use log::info;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    config::Args,
    dataset::SymptomTable,
    db,
    error::{AppError, StartupError},
    quiz::QuizEngine,
};

/// Process-wide state. The symptom table and quiz are read-only after
/// construction; only the herb connection needs a lock.
pub struct AppState {
    pub symptoms: SymptomTable,
    pub quiz: QuizEngine,
    herbs: Mutex<Connection>,
}

impl AppState {
    pub fn new(symptoms: SymptomTable, quiz: QuizEngine, herbs: Connection) -> Arc<Self> {
        Arc::new(Self {
            symptoms,
            quiz,
            herbs: Mutex::new(herbs),
        })
    }

    pub fn load(args: &Args) -> Result<Arc<Self>, StartupError> {
        let symptoms = SymptomTable::load(&args.dataset)?;

        let quiz = match &args.quiz {
            Some(path) => QuizEngine::from_file(path)?,
            None => QuizEngine::builtin()?,
        };
        info!("[Setup] Quiz has {} questions", quiz.questions().len());

        let herbs = db::create_or_open(&args.db)?;

        Ok(Self::new(symptoms, quiz, herbs))
    }

    fn herbs(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.herbs.lock().map_err(|_| AppError::LockPoisoned)
    }

    /// Runs `f` against the herb connection on the blocking thread pool.
    pub async fn with_herbs<T, F>(self: &Arc<Self>, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || -> Result<T, AppError> {
            let conn = state.herbs()?;
            Ok(f(&conn)?)
        })
        .await?
    }
}
