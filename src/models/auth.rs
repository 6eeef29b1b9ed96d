//! Modelos de autorização
//!
//! Este módulo contém o conjunto de capacidades por tela consumido do
//! serviço de autenticação. O motor só lê essas flags; escrita e
//! atribuição de perfis ficam fora do escopo.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Domínio de permissão das telas de OS
pub const DOMINIO_PLANEJAMENTO: &str = "planejamento";

/// Capacidades de uma tela
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScreenPermissions {
    #[serde(default)]
    pub leitura: bool,
    #[serde(default)]
    pub criacao: bool,
    #[serde(default)]
    pub edicao: bool,
    #[serde(default)]
    pub exclusao: bool,
}

/// Mapa de capacidades por tela. Tela ausente nega tudo (default-deny) -
/// esconder a ação no cliente é defesa em profundidade, não substituto da
/// checagem do servidor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Permissions(pub HashMap<String, ScreenPermissions>);

impl Permissions {
    /// Capacidades do domínio de planejamento (telas de OS).
    pub fn planejamento(&self) -> ScreenPermissions {
        self.0
            .get(DOMINIO_PLANEJAMENTO)
            .copied()
            .unwrap_or_default()
    }

    pub fn pode_criar_os(&self) -> bool {
        self.planejamento().criacao
    }

    pub fn pode_editar_os(&self) -> bool {
        self.planejamento().edicao
    }

    pub fn pode_excluir_os(&self) -> bool {
        self.planejamento().exclusao
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tela_ausente_nega_tudo() {
        let permissoes = Permissions::default();
        assert!(!permissoes.pode_criar_os());
        assert!(!permissoes.pode_editar_os());
        assert!(!permissoes.pode_excluir_os());
    }

    #[test]
    fn test_deserializa_mapa_do_api() {
        let json = r#"{
            "planejamento": { "leitura": true, "criacao": true, "edicao": true, "exclusao": false },
            "materiais": { "leitura": true, "criacao": false, "edicao": false, "exclusao": false }
        }"#;
        let permissoes: Permissions = serde_json::from_str(json).unwrap();
        assert!(permissoes.pode_criar_os());
        assert!(permissoes.pode_editar_os());
        assert!(!permissoes.pode_excluir_os());
    }
}
