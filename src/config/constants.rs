/// Environment variable that overrides `database.url` from the config file
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub const LOG_LEVEL: &str = "warn";

/// Directory name used when looking up the config file under $XDG_CONFIG_HOME and $HOME/.config
pub const CONFIG_DIR_NAME: &str = "convo-migrate";
