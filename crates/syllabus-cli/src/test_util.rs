use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or mutate process environment variables.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A generator whose model always answers `reply` and whose extractor
/// returns a fixed line of syllabus text.
pub fn generator_replying(reply: &str) -> syllabus_core::Generator {
    use std::sync::Arc;

    use syllabus_test_utils::{ScriptedModel, StaticExtractor};

    syllabus_core::Generator::new(
        Arc::new(ScriptedModel::replying(reply)),
        Arc::new(StaticExtractor::new("--- Page 1 ---\nConstitutional Law")),
    )
}
