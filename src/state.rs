use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    config::Config,
    exam::{ExamService, ResultCache},
    store::ExamStore,
};

#[derive(Clone)]
pub struct AppState {
    pub exams: ExamService,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn ExamStore>, config: Config) -> Self {
        let cache = ResultCache::new(config.cache_results);
        let exams = ExamService::new(store, cache, config.passing_percentage);
        Self { exams, config }
    }
}

impl FromRef<AppState> for ExamService {
    fn from_ref(state: &AppState) -> Self {
        state.exams.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
