use super::parsing::{
    env_optional, env_or_default, parse_bool, parse_cors_origins, parse_environment, parse_f64,
    parse_u32, parse_u64, parse_usize,
};
use super::types::{
    AdminSettings, AiSettings, ConfigError, CorsSettings, DatabaseSettings, LegacySettings,
    RuntimeSettings, ServerHost, ServerPort, ServerSettings, Settings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("DSHUB_HOST", "0.0.0.0");
        let port = env_or_default("DSHUB_PORT", "8000");

        let environment =
            parse_environment(env_optional("DSHUB_ENV").or_else(|| env_optional("ENVIRONMENT")));
        let strict_config =
            env_optional("DSHUB_STRICT_CONFIG").map(|value| parse_bool(&value)).unwrap_or(false)
                || environment.is_production();

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let data_dir = env_or_default("DSHUB_DATA_DIR", "data");
        let database_url = env_optional("DATABASE_URL");

        let legacy_root = env_or_default("DSHUB_LEGACY_DIR", "data/legacy");
        let legacy_backup_root = env_or_default("DSHUB_BACKUP_DIR", "data/backup_json");

        let gemini_api_key = env_or_default("GEMINI_API_KEY", "");
        let gemini_base_url = env_or_default(
            "GEMINI_BASE_URL",
            "https://generativelanguage.googleapis.com/v1beta",
        );
        let model = env_or_default("GEMINI_MODEL", "gemini-2.5-flash");
        let max_output_tokens =
            parse_u32("GEMINI_MAX_OUTPUT_TOKENS", env_or_default("GEMINI_MAX_OUTPUT_TOKENS", "4096"))?;
        let temperature =
            parse_f64("GEMINI_TEMPERATURE", env_or_default("GEMINI_TEMPERATURE", "0.7"))?;
        let top_p = parse_f64("GEMINI_TOP_P", env_or_default("GEMINI_TOP_P", "0.95"))?;
        let top_k = parse_u32("GEMINI_TOP_K", env_or_default("GEMINI_TOP_K", "40"))?;
        let request_timeout =
            parse_u64("GEMINI_REQUEST_TIMEOUT", env_or_default("GEMINI_REQUEST_TIMEOUT", "120"))?;
        let content_char_budget = parse_usize(
            "DSHUB_CONTENT_CHAR_BUDGET",
            env_or_default("DSHUB_CONTENT_CHAR_BUDGET", "3000"),
        )?;
        let config_file = env_or_default("DSHUB_API_CONFIG_FILE", "config/api_config.json");

        let bootstrap_username = env_or_default("FIRST_ADMIN_USERNAME", "admin");
        let bootstrap_email = env_or_default("FIRST_ADMIN_EMAIL", "admin@dshub.local");
        let bootstrap_password = env_or_default("FIRST_ADMIN_PASSWORD", "");

        let log_level = env_or_default("DSHUB_LOG_LEVEL", "info");
        let json = env_optional("DSHUB_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            cors: CorsSettings { origins: cors_origins },
            database: DatabaseSettings { data_dir, database_url },
            legacy: LegacySettings { root: legacy_root, backup_root: legacy_backup_root },
            ai: AiSettings {
                gemini_api_key,
                gemini_base_url,
                model,
                max_output_tokens,
                temperature,
                top_p,
                top_k,
                request_timeout,
                content_char_budget,
                config_file,
            },
            admin: AdminSettings { bootstrap_username, bootstrap_email, bootstrap_password },
            telemetry: TelemetrySettings { log_level, json },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn legacy(&self) -> &LegacySettings {
        &self.legacy
    }

    pub(crate) fn ai(&self) -> &AiSettings {
        &self.ai
    }

    pub(crate) fn admin(&self) -> &AdminSettings {
        &self.admin
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.content_char_budget == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DSHUB_CONTENT_CHAR_BUDGET",
                value: "0".to_string(),
            });
        }

        if self.ai.request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "GEMINI_REQUEST_TIMEOUT",
                value: "0".to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.admin.bootstrap_password.is_empty() {
            return Err(ConfigError::MissingSecret("FIRST_ADMIN_PASSWORD"));
        }

        Ok(())
    }
}
