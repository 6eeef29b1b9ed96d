//! Modelos de dados de referência
//!
//! Este módulo contém a estrutura organizacional (coordenação + equipe) e o
//! cadastro de ativos consumidos como lookup somente-leitura pelo motor.

use serde::{Deserialize, Serialize};

/// Unidade organizacional: par coordenação/equipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Estrutura {
    pub id: String,
    pub coordenacao: String,
    pub equipe: String,
    #[serde(default)]
    pub cc: Option<String>,
    /// "sim" quando a estrutura executa OS
    #[serde(default)]
    pub execucao: Option<String>,
    pub status: String,
}

impl Estrutura {
    /// Estrutura elegível para as telas de OS: ativa e executora.
    pub fn elegivel(&self) -> bool {
        self.status == "ativo" && self.execucao.as_deref() == Some("sim")
    }
}

/// Ativo físico vinculável a uma OS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ativo {
    pub id: String,
    #[serde(rename = "ATIVO_CODPE")]
    pub codpe: String,
    #[serde(rename = "ATIVO_DESCRITIVO_OS")]
    pub descritivo: String,
    #[serde(rename = "ATIVO_EQUIPE")]
    pub equipe: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estrutura(status: &str, execucao: Option<&str>) -> Estrutura {
        Estrutura {
            id: "e1".to_string(),
            coordenacao: "NORTE".to_string(),
            equipe: "A".to_string(),
            cc: None,
            execucao: execucao.map(str::to_string),
            status: status.to_string(),
        }
    }

    #[test]
    fn test_elegibilidade() {
        assert!(estrutura("ativo", Some("sim")).elegivel());
        assert!(!estrutura("inativo", Some("sim")).elegivel());
        assert!(!estrutura("ativo", Some("nao")).elegivel());
        assert!(!estrutura("ativo", None).elegivel());
    }
}
