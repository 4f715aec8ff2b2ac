use std::sync::Arc;

use crate::chat::ChatModel;
use crate::translate::TranslationApi;

/// Availability of one upstream after bootstrap: either a working client
/// handle or the reason initialization failed. There is no third state.
pub enum Upstream<T: ?Sized> {
    Ready(Arc<T>),
    Unavailable(String),
}

impl<T: ?Sized> Clone for Upstream<T> {
    fn clone(&self) -> Self {
        match self {
            Upstream::Ready(inner) => Upstream::Ready(Arc::clone(inner)),
            Upstream::Unavailable(reason) => Upstream::Unavailable(reason.clone()),
        }
    }
}

impl<T: ?Sized> Upstream<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Upstream::Ready(_))
    }
}

/// Written exactly once during bootstrap, then cloned read-only into every
/// request.
#[derive(Clone)]
pub struct AppState {
    pub chat: Upstream<dyn ChatModel>,
    pub translator: Upstream<dyn TranslationApi>,
}
