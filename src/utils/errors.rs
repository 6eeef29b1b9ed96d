//! Sistema de tratamento de erros
//!
//! Este módulo define a taxonomia de erros do motor de OS e as mensagens
//! fixas exibidas ao operador.

use thiserror::Error;

/// Mensagem normalizada para respostas 403 — nunca repassamos o corpo cru
/// do servidor para o operador.
pub const MSG_SEM_PERMISSAO: &str =
    "Codigo erro 403 - Seu perfil nao tem permissao para essa operacao.";

/// Mensagem de sessão expirada (401). Esse erro encerra a sessão inteira,
/// não apenas a operação corrente.
pub const MSG_SESSAO_EXPIRADA: &str = "Sessao expirada. Faca login novamente.";

/// Erros principais do motor de Ordens de Serviço
#[derive(Error, Debug)]
pub enum EngineError {
    /// HTTP 401: a sessão acabou. Curto-circuita qualquer outro tratamento
    /// do request — quem chama deve deslogar e voltar para a entrada.
    #[error("{MSG_SESSAO_EXPIRADA}")]
    SessaoExpirada,

    /// HTTP 403, normalizado para a mensagem fixa.
    #[error("{MSG_SEM_PERMISSAO}")]
    SemPermissao,

    /// Falha de validação do lado do cliente, antes de qualquer request.
    #[error("{}", mensagens.join(" "))]
    Validacao { mensagens: Vec<String> },

    /// Resposta não-2xx do servidor (corpo da resposta ou fallback fixo).
    #[error("{0}")]
    Servidor(String),

    /// Falha de transporte (rede, timeout, corpo ilegível).
    #[error("Falha de rede: {0}")]
    Rede(#[from] reqwest::Error),
}

impl EngineError {
    /// Lista de mensagens de validação, vazia para os demais erros.
    pub fn mensagens_validacao(&self) -> &[String] {
        match self {
            EngineError::Validacao { mensagens } => mensagens,
            _ => &[],
        }
    }
}

/// Resultado tipado para operações do motor
pub type EngineResult<T> = Result<T, EngineError>;

/// Função helper para criar erro de validação com uma mensagem
pub fn erro_validacao(mensagem: &str) -> EngineError {
    EngineError::Validacao {
        mensagens: vec![mensagem.to_string()],
    }
}

/// Função helper para criar erro de validação com várias mensagens
pub fn erros_validacao(mensagens: Vec<String>) -> EngineError {
    EngineError::Validacao { mensagens }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mensagem_403_fixa() {
        let erro = EngineError::SemPermissao;
        assert_eq!(erro.to_string(), MSG_SEM_PERMISSAO);
    }

    #[test]
    fn test_validacao_junta_mensagens() {
        let erro = erros_validacao(vec![
            "Selecione a Coordenação.".to_string(),
            "Selecione a Equipe.".to_string(),
        ]);
        assert_eq!(
            erro.to_string(),
            "Selecione a Coordenação. Selecione a Equipe."
        );
        assert_eq!(erro.mensagens_validacao().len(), 2);
    }

    #[test]
    fn test_servidor_preserva_corpo() {
        let erro = EngineError::Servidor("OS nao encontrada.".to_string());
        assert_eq!(erro.to_string(), "OS nao encontrada.");
    }
}
