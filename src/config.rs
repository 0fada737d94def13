//! Startup settings for the server.
//!
//! Configuration is deliberately thin: a bind address taken from environment
//! variables and a greeting string taken from the first command-line
//! argument. No config files, nothing persisted.

/// Default sentence served at `/` when no greeting argument is given.
pub const DEFAULT_GREETING: &str = "a multi-colored shine on all surfaces";

/// Runtime settings resolved at process start.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Body served by the root handler.
    pub greeting: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment and argument list.
    ///
    /// `MEMSTRESS_HOST` / `MEMSTRESS_PORT` override the bind address. The
    /// first positional argument, when present and not the literal token
    /// `"default"`, replaces the greeting (upper-cased).
    pub fn from_env<I>(mut args: I) -> Self
    where
        I: Iterator<Item = String>,
    {
        let mut settings = Self::default();

        if let Ok(host) = std::env::var("MEMSTRESS_HOST") {
            settings.host = host;
        }
        if let Some(port) = std::env::var("MEMSTRESS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            settings.port = port;
        }

        if let Some(arg) = args.next() {
            if arg != "default" {
                settings.greeting = arg.to_uppercase();
            }
        }

        settings
    }

    /// The address string to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
