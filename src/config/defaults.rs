use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some(LOG_LEVEL.to_string())
}
