use parking_lot::Mutex;

/// Full-page navigation surface.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Remembers every navigation instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.visits.lock().push(target.to_string());
    }
}
