//! Configuração de variáveis de ambiente
//!
//! Este módulo maneja a configuração do ambiente do motor de OS.

use std::env;

/// Configuração do ambiente
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// URL base do API remoto (ex.: https://api.tecrail.example/api)
    pub api_url: String,
    /// Timeout por request, em segundos
    pub request_timeout_secs: u64,
    /// Tamanho de página default da listagem de OS
    pub page_size_padrao: usize,
}

/// Tamanhos de página aceitos pela listagem
pub const PAGE_SIZES: [usize; 3] = [50, 100, 200];

impl Default for EnvironmentConfig {
    fn default() -> Self {
        dotenvy::dotenv().ok();
        Self {
            api_url: env::var("TECRAIL_API_URL").expect("TECRAIL_API_URL must be set"),
            request_timeout_secs: env::var("TECRAIL_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|valor| valor.parse().ok())
                .unwrap_or(30),
            page_size_padrao: env::var("TECRAIL_PAGE_SIZE")
                .ok()
                .and_then(|valor| valor.parse().ok())
                .filter(|valor| PAGE_SIZES.contains(valor))
                .unwrap_or(50),
        }
    }
}

impl EnvironmentConfig {
    /// Configuração com valores explícitos (usada nos testes e por
    /// consumidores que não dependem de variáveis de ambiente).
    pub fn nova(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout_secs: 30,
            page_size_padrao: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_explicita() {
        let config = EnvironmentConfig::nova("http://localhost:8787/api");
        assert_eq!(config.api_url, "http://localhost:8787/api");
        assert_eq!(config.page_size_padrao, 50);
        assert!(PAGE_SIZES.contains(&config.page_size_padrao));
    }
}
