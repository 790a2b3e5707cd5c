//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) con los knobs del motor de publicación.
use std::env;
use std::time::Duration;

use once_cell::sync::Lazy;

/// Configuración global de la aplicación.
pub struct AppConfig {
    /// Configuración del formulario de publicación.
    pub workflow: WorkflowConfig,
}

/// Parámetros del motor de publicación.
pub struct WorkflowConfig {
    /// Retardo del auto-avance tras la aprobación del batch de fotos.
    pub auto_advance: Duration,
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let auto_advance_ms = env_u64("ESTATEFLOW_AUTO_ADVANCE_MS", 400);
    AppConfig { workflow: WorkflowConfig { auto_advance: Duration::from_millis(auto_advance_ms) } }
});
