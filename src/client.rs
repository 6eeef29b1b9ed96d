//! Cliente HTTP do API de Ordens de Serviço
//!
//! Este módulo contém o seam assíncrono (`OsApi`) consumido pelas telas e a
//! implementação HTTP via reqwest. Toda normalização de status (401 → sessão
//! expirada, 403 → mensagem fixa) acontece aqui, antes de qualquer leitura
//! de corpo.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::Permissions;
use crate::models::estrutura::{Ativo, Estrutura};
use crate::models::ordem_servico::{
    CamposLote, CriarOsPayload, FiltrosOs, HistoricoOs, OrdemServico, OrdemServicoResumo, OsCriada,
};
use crate::utils::errors::{EngineError, EngineResult};

/// Operações remotas das quais o motor depende. As telas enxergam apenas
/// este trait; os testes fornecem uma implementação em memória.
#[async_trait]
pub trait OsApi: Send + Sync {
    async fn listar_os(&self, filtros: &FiltrosOs) -> EngineResult<Vec<OrdemServicoResumo>>;
    async fn obter_os(&self, id: &str) -> EngineResult<OrdemServico>;
    async fn criar_os(&self, payload: &CriarOsPayload) -> EngineResult<Vec<OsCriada>>;
    /// Save de registro único: envia o registro completo, não um diff, e
    /// devolve o registro canônico do servidor.
    async fn atualizar_os(&self, registro: &OrdemServico) -> EngineResult<OrdemServico>;
    /// Soft delete: patch mínimo com status CANCELADO.
    async fn cancelar_os(&self, id: &str) -> EngineResult<OrdemServico>;
    async fn atualizar_os_em_lote(&self, ids: &[String], campos: &CamposLote) -> EngineResult<()>;
    async fn listar_estruturas(&self) -> EngineResult<Vec<Estrutura>>;
    async fn listar_ativos(&self, equipe: Option<&str>) -> EngineResult<Vec<Ativo>>;
    async fn historico_os(&self, os_id: &str) -> EngineResult<Vec<HistoricoOs>>;
    async fn permissoes(&self) -> EngineResult<Permissions>;
}

// Envelopes de resposta do API
#[derive(Deserialize)]
struct RespostaLista {
    os: Vec<OrdemServicoResumo>,
}

#[derive(Deserialize)]
struct RespostaDetalhe {
    os: OrdemServico,
}

#[derive(Deserialize)]
struct RespostaCriacao {
    created: Vec<OsCriada>,
}

#[derive(Deserialize)]
struct RespostaEstruturas {
    estrutura: Vec<Estrutura>,
}

#[derive(Deserialize)]
struct RespostaAtivos {
    ativos: Vec<Ativo>,
}

#[derive(Deserialize)]
struct RespostaHistorico {
    history: Vec<HistoricoOs>,
}

#[derive(Deserialize)]
struct RespostaPermissoes {
    permissions: Permissions,
}

/// Cliente HTTP do API tecrail
pub struct OsHttpClient {
    client: Client,
    base_url: String,
    token: String,
}

impl OsHttpClient {
    /// Criar novo cliente com a URL base configurada e o bearer token da
    /// sessão corrente.
    pub fn new(config: &EnvironmentConfig, token: impl Into<String>) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, caminho: &str) -> String {
        format!("{}{}", self.base_url, caminho)
    }

    /// Converte uma resposta não-2xx em `EngineError`. O 401 curto-circuita
    /// tudo; o 403 nunca expõe o corpo do servidor.
    async fn tratar_falha(resposta: reqwest::Response, fallback: &str) -> EngineError {
        match resposta.status() {
            StatusCode::UNAUTHORIZED => EngineError::SessaoExpirada,
            StatusCode::FORBIDDEN => EngineError::SemPermissao,
            _ => {
                let corpo = resposta.text().await.unwrap_or_default();
                let mensagem = corpo.trim();
                if mensagem.is_empty() {
                    EngineError::Servidor(fallback.to_string())
                } else {
                    EngineError::Servidor(mensagem.to_string())
                }
            }
        }
    }

    /// Monta os query params da listagem. O período `YYYY-MM` vira os
    /// params `ano` e `mes`; coordenação só é repassada quando há equipe
    /// (comportamento herdado da tela original — a pré-condição de busca
    /// garante que a coordenação já foi escolhida).
    fn parametros_listagem(filtros: &FiltrosOs) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ano_mes) = &filtros.ano_mes {
            let mut partes = ano_mes.splitn(2, '-');
            if let Some(ano) = partes.next().filter(|parte| !parte.is_empty()) {
                params.push(("ano".to_string(), ano.to_string()));
            }
            if let Some(mes) = partes.next().filter(|parte| !parte.is_empty()) {
                params.push(("mes".to_string(), mes.to_string()));
            }
        }
        if let Some(numero) = filtros.os_numero {
            params.push(("os_numero".to_string(), numero.to_string()));
        }
        if let Some(status) = filtros.status {
            params.push(("status".to_string(), status.como_texto().to_string()));
        }
        if let Some(tipo) = filtros.tipo {
            params.push(("tipo".to_string(), tipo.to_string()));
        }
        if let Some(pdm) = filtros.pdm {
            params.push(("pdm".to_string(), pdm.to_string()));
        }
        if let Some(capex) = filtros.capex {
            params.push(("capex".to_string(), capex.to_string()));
        }
        if let Some(equipe) = filtros.equipe.as_deref().filter(|valor| !valor.is_empty()) {
            if !filtros.coordenacao.is_empty() {
                params.push(("coordenacao".to_string(), filtros.coordenacao.clone()));
            }
            params.push(("equipe".to_string(), equipe.to_string()));
        }
        if let Some(search) = filtros.search.as_deref().filter(|valor| !valor.is_empty()) {
            params.push(("search".to_string(), search.to_string()));
        }
        params
    }
}

#[async_trait]
impl OsApi for OsHttpClient {
    async fn listar_os(&self, filtros: &FiltrosOs) -> EngineResult<Vec<OrdemServicoResumo>> {
        let resposta = self
            .client
            .get(self.url("/os"))
            .bearer_auth(&self.token)
            .query(&Self::parametros_listagem(filtros))
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao carregar OS.").await);
        }
        let corpo: RespostaLista = resposta.json().await?;
        Ok(corpo.os)
    }

    async fn obter_os(&self, id: &str) -> EngineResult<OrdemServico> {
        let resposta = self
            .client
            .get(self.url("/os/detail"))
            .bearer_auth(&self.token)
            .query(&[("id", id)])
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao carregar OS.").await);
        }
        let corpo: RespostaDetalhe = resposta.json().await?;
        Ok(corpo.os)
    }

    async fn criar_os(&self, payload: &CriarOsPayload) -> EngineResult<Vec<OsCriada>> {
        let resposta = self
            .client
            .post(self.url("/os"))
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao criar OS.").await);
        }
        let corpo: RespostaCriacao = resposta.json().await?;
        Ok(corpo.created)
    }

    async fn atualizar_os(&self, registro: &OrdemServico) -> EngineResult<OrdemServico> {
        let resposta = self
            .client
            .patch(self.url("/os"))
            .bearer_auth(&self.token)
            .json(registro)
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao atualizar OS.").await);
        }
        let corpo: RespostaDetalhe = resposta.json().await?;
        Ok(corpo.os)
    }

    async fn cancelar_os(&self, id: &str) -> EngineResult<OrdemServico> {
        let resposta = self
            .client
            .patch(self.url("/os"))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "id": id, "os_status": "CANCELADO" }))
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao excluir OS.").await);
        }
        let corpo: RespostaDetalhe = resposta.json().await?;
        Ok(corpo.os)
    }

    async fn atualizar_os_em_lote(&self, ids: &[String], campos: &CamposLote) -> EngineResult<()> {
        let mut corpo = serde_json::to_value(campos).unwrap_or_default();
        corpo["ids"] = serde_json::json!(ids);
        let resposta = self
            .client
            .patch(self.url("/os/bulk"))
            .bearer_auth(&self.token)
            .json(&corpo)
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao atualizar OS.").await);
        }
        Ok(())
    }

    async fn listar_estruturas(&self) -> EngineResult<Vec<Estrutura>> {
        let resposta = self
            .client
            .get(self.url("/estrutura"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao carregar estrutura.").await);
        }
        let corpo: RespostaEstruturas = resposta.json().await?;
        Ok(corpo.estrutura)
    }

    async fn listar_ativos(&self, equipe: Option<&str>) -> EngineResult<Vec<Ativo>> {
        let mut request = self
            .client
            .get(self.url("/ativos"))
            .bearer_auth(&self.token);
        if let Some(equipe) = equipe {
            request = request.query(&[("equipe", equipe)]);
        }
        let resposta = request.send().await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao carregar ativos.").await);
        }
        let corpo: RespostaAtivos = resposta.json().await?;
        Ok(corpo.ativos)
    }

    async fn historico_os(&self, os_id: &str) -> EngineResult<Vec<HistoricoOs>> {
        let resposta = self
            .client
            .get(self.url("/os/history"))
            .bearer_auth(&self.token)
            .query(&[("os_id", os_id)])
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao carregar historico.").await);
        }
        let corpo: RespostaHistorico = resposta.json().await?;
        Ok(corpo.history)
    }

    async fn permissoes(&self) -> EngineResult<Permissions> {
        let resposta = self
            .client
            .get(self.url("/auth/permissions"))
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resposta.status().is_success() {
            return Err(Self::tratar_falha(resposta, "Erro ao carregar permissoes.").await);
        }
        let corpo: RespostaPermissoes = resposta.json().await?;
        Ok(corpo.permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ordem_servico::{OsStatus, OsTipo};

    fn param<'a>(params: &'a [(String, String)], chave: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(nome, _)| nome == chave)
            .map(|(_, valor)| valor.as_str())
    }

    #[test]
    fn test_periodo_vira_ano_e_mes() {
        let filtros = FiltrosOs {
            ano_mes: Some("2025-03".to_string()),
            coordenacao: "NORTE".to_string(),
            ..FiltrosOs::default()
        };
        let params = OsHttpClient::parametros_listagem(&filtros);
        assert_eq!(param(&params, "ano"), Some("2025"));
        assert_eq!(param(&params, "mes"), Some("03"));
        // Sem equipe, coordenação não vai na query
        assert_eq!(param(&params, "coordenacao"), None);
    }

    #[test]
    fn test_coordenacao_so_acompanha_equipe() {
        let filtros = FiltrosOs {
            coordenacao: "NORTE".to_string(),
            equipe: Some("A".to_string()),
            ..FiltrosOs::default()
        };
        let params = OsHttpClient::parametros_listagem(&filtros);
        assert_eq!(param(&params, "coordenacao"), Some("NORTE"));
        assert_eq!(param(&params, "equipe"), Some("A"));
    }

    #[test]
    fn test_filtros_tipados_viram_texto_do_contrato() {
        let filtros = FiltrosOs {
            status: Some(OsStatus::Programado),
            tipo: Some(OsTipo::Pdm),
            pdm: Some(1),
            capex: Some(0),
            os_numero: Some(77),
            coordenacao: "NORTE".to_string(),
            ..FiltrosOs::default()
        };
        let params = OsHttpClient::parametros_listagem(&filtros);
        assert_eq!(param(&params, "status"), Some("PROGRAMADO"));
        assert_eq!(param(&params, "tipo"), Some("PDM"));
        assert_eq!(param(&params, "pdm"), Some("1"));
        assert_eq!(param(&params, "capex"), Some("0"));
        assert_eq!(param(&params, "os_numero"), Some("77"));
    }
}
