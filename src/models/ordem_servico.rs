//! Modelo de Ordem de Serviço
//!
//! Este módulo contém os tipos canônicos de OS e seus variantes para CRUD.
//! Os nomes de campo mapeiam exatamente o contrato do API remoto
//! (`os_numero`, `os_status`, `ATIVO_CODPE`, ...).

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::utils::date::max_programado;

/// Status da OS - enum fechado do ciclo de vida
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OsStatus {
    #[serde(rename = "CRIADO")]
    Criado,
    #[serde(rename = "PROGRAMADO")]
    Programado,
    #[serde(rename = "REALIZADO")]
    Realizado,
    #[serde(rename = "CANCELADO")]
    Cancelado,
}

lazy_static! {
    /// Tabela de transições permitidas. REALIZADO e CANCELADO são terminais;
    /// a reatribuição para o mesmo status é sempre um no-op aceito.
    static ref TRANSICOES_PERMITIDAS: HashMap<OsStatus, Vec<OsStatus>> = {
        let mut tabela = HashMap::new();
        tabela.insert(
            OsStatus::Criado,
            vec![OsStatus::Programado, OsStatus::Cancelado],
        );
        tabela.insert(
            OsStatus::Programado,
            vec![OsStatus::Realizado, OsStatus::Cancelado],
        );
        tabela.insert(OsStatus::Realizado, Vec::new());
        tabela.insert(OsStatus::Cancelado, Vec::new());
        tabela
    };
}

impl OsStatus {
    /// Valor textual exatamente como trafega no contrato do API.
    pub fn como_texto(&self) -> &'static str {
        match self {
            OsStatus::Criado => "CRIADO",
            OsStatus::Programado => "PROGRAMADO",
            OsStatus::Realizado => "REALIZADO",
            OsStatus::Cancelado => "CANCELADO",
        }
    }

    /// Transições de saída permitidas a partir deste status.
    pub fn transicoes_permitidas(&self) -> &'static [OsStatus] {
        TRANSICOES_PERMITIDAS
            .get(self)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Verifica se a transição para `proximo` é aceita. Mesmo status conta
    /// como no-op permitido (o servidor ignora campos sem mudança).
    pub fn pode_transicionar_para(&self, proximo: OsStatus) -> bool {
        *self == proximo || self.transicoes_permitidas().contains(&proximo)
    }

    /// Status terminal: não existe transição de saída.
    pub fn terminal(&self) -> bool {
        self.transicoes_permitidas().is_empty()
    }
}

impl std::fmt::Display for OsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.como_texto())
    }
}

/// Tipo da OS
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OsTipo {
    #[serde(rename = "PDM")]
    Pdm,
    #[serde(rename = "EX")]
    Ex,
    #[serde(rename = "RI")]
    Ri,
}

impl std::fmt::Display for OsTipo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OsTipo::Pdm => "PDM",
            OsTipo::Ex => "EX",
            OsTipo::Ri => "RI",
        })
    }
}

/// Projeção de OS para a listagem - subconjunto estrito do registro
/// completo mais os campos denormalizados do ativo. Nunca é mutada
/// localmente (exceção única: patch de status no cancelamento).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdemServicoResumo {
    pub id: String,
    pub os_numero: i64,
    pub os_status: OsStatus,
    pub os_pdm: u8,
    pub os_tipo: OsTipo,
    pub os_checklist: u8,
    pub os_capex: u8,
    pub os_programado1: Option<String>,
    pub os_programado2: Option<String>,
    pub os_programado3: Option<String>,
    pub os_programado4: Option<String>,
    pub os_programado5: Option<String>,
    pub os_realizado_em: Option<String>,
    pub os_obs_pcm: Option<String>,
    #[serde(rename = "ATIVO_CODPE")]
    pub ativo_codpe: String,
    #[serde(rename = "ATIVO_DESCRITIVO_OS")]
    pub ativo_descritivo: String,
    #[serde(rename = "ATIVO_EQUIPE")]
    pub ativo_equipe: String,
}

impl OrdemServicoResumo {
    /// Chave da maior data programada entre os cinco slots, usada como
    /// "a" data programada da linha para exibição e ordenação.
    pub fn data_programada_max(&self) -> Option<String> {
        max_programado(&[
            self.os_programado1.clone(),
            self.os_programado2.clone(),
            self.os_programado3.clone(),
            self.os_programado4.clone(),
            self.os_programado5.clone(),
        ])
    }
}

/// Registro completo de OS retornado pelo detalhe. O servidor é o único
/// dono do estado persistido; este struct vive apenas dentro de uma sessão
/// de edição e é substituído inteiro pela resposta canônica de cada save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdemServico {
    pub id: String,
    pub os_numero: i64,
    pub estrutura_id: String,
    pub ativo_id: String,
    pub os_tipo: OsTipo,
    pub os_pdm: u8,
    pub os_status: OsStatus,
    pub os_checklist: u8,
    pub os_capex: u8,
    pub os_realizado_em: Option<String>,
    pub os_programado1: Option<String>,
    pub os_programado2: Option<String>,
    pub os_programado3: Option<String>,
    pub os_programado4: Option<String>,
    pub os_programado5: Option<String>,
    pub os_obs_pcm: Option<String>,
    pub os_obs_tecnico: Option<String>,
    pub os_ano: i32,
    pub os_mes: u32,
    #[serde(rename = "ATIVO_CODPE")]
    pub ativo_codpe: String,
    #[serde(rename = "ATIVO_DESCRITIVO_OS")]
    pub ativo_descritivo: String,
    #[serde(rename = "ATIVO_EQUIPE")]
    pub ativo_equipe: String,
    pub estrutura_coordenacao: String,
    pub estrutura_equipe: String,
}

/// Ação registrada no histórico de uma OS
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AcaoHistorico {
    #[serde(rename = "criado")]
    Criado,
    #[serde(rename = "atualizado")]
    Atualizado,
}

/// Entrada do histórico de alterações - somente leitura
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricoOs {
    pub id: String,
    pub action: AcaoHistorico,
    pub before_data: Option<String>,
    pub after_data: String,
    pub created_at: String,
    pub changed_by_name: Option<String>,
}

/// Filtros da listagem de OS. Coordenação vazia é a pré-condição de
/// não-busca: a tela fica no estado vazio e nenhum request é emitido.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltrosOs {
    /// Período de planejamento no formato `YYYY-MM`
    pub ano_mes: Option<String>,
    pub status: Option<OsStatus>,
    pub tipo: Option<OsTipo>,
    pub pdm: Option<u8>,
    pub capex: Option<u8>,
    pub coordenacao: String,
    pub equipe: Option<String>,
    pub search: Option<String>,
    pub os_numero: Option<i64>,
}

/// Request para criar OS em lote: uma linha por ativo selecionado,
/// compartilhando tipo, flags, período e estrutura.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CriarOsPayload {
    pub estrutura_id: String,
    #[validate(length(min = 1, message = "Selecione pelo menos um ativo."))]
    pub ativo_ids: Vec<String>,
    pub os_tipo: OsTipo,
    pub os_pdm: u8,
    pub os_checklist: u8,
    pub os_capex: u8,
    pub os_obs_pcm: Option<String>,
    pub os_ano: i32,
    #[validate(range(min = 1, max = 12, message = "Mes invalido."))]
    pub os_mes: u32,
}

/// Linha materializada pelo servidor no fan-out da criação
#[derive(Debug, Clone, Deserialize)]
pub struct OsCriada {
    pub id: String,
    pub os_numero: i64,
    pub ativo_id: String,
}

/// Campos da mutação em lote. Semântica set-if-present: campo ausente não
/// é tocado em nenhum registro selecionado.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CamposLote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_status: Option<OsStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_tipo: Option<OsTipo>,
}

impl CamposLote {
    pub fn vazio(&self) -> bool {
        self.os_status.is_none() && self.os_tipo.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transicoes_criado() {
        assert!(OsStatus::Criado.pode_transicionar_para(OsStatus::Programado));
        assert!(OsStatus::Criado.pode_transicionar_para(OsStatus::Cancelado));
        assert!(!OsStatus::Criado.pode_transicionar_para(OsStatus::Realizado));
    }

    #[test]
    fn test_transicoes_programado() {
        assert!(OsStatus::Programado.pode_transicionar_para(OsStatus::Realizado));
        assert!(OsStatus::Programado.pode_transicionar_para(OsStatus::Cancelado));
        // Transição reversa rejeitada
        assert!(!OsStatus::Programado.pode_transicionar_para(OsStatus::Criado));
    }

    #[test]
    fn test_status_terminais() {
        assert!(OsStatus::Realizado.terminal());
        assert!(OsStatus::Cancelado.terminal());
        assert!(!OsStatus::Realizado.pode_transicionar_para(OsStatus::Criado));
        assert!(!OsStatus::Cancelado.pode_transicionar_para(OsStatus::Programado));
    }

    #[test]
    fn test_mesmo_status_e_noop_permitido() {
        assert!(OsStatus::Realizado.pode_transicionar_para(OsStatus::Realizado));
        assert!(OsStatus::Criado.pode_transicionar_para(OsStatus::Criado));
    }

    #[test]
    fn test_deserializa_linha_da_listagem() {
        let json = r#"{
            "id": "a1",
            "os_numero": 42,
            "os_status": "PROGRAMADO",
            "os_pdm": 1,
            "os_tipo": "PDM",
            "os_checklist": 0,
            "os_capex": 0,
            "os_programado1": "2025-02-01",
            "os_programado2": null,
            "os_programado3": "2025-04-15T08:00:00",
            "os_programado4": null,
            "os_programado5": null,
            "os_realizado_em": null,
            "os_obs_pcm": "trocar rolamento",
            "ATIVO_CODPE": "PE-0017",
            "ATIVO_DESCRITIVO_OS": "Esteira 03",
            "ATIVO_EQUIPE": "A"
        }"#;
        let linha: OrdemServicoResumo = serde_json::from_str(json).unwrap();
        assert_eq!(linha.os_status, OsStatus::Programado);
        assert_eq!(linha.ativo_codpe, "PE-0017");
        assert_eq!(linha.data_programada_max(), Some("2025-04-15".to_string()));
    }

    #[test]
    fn test_campos_lote_set_if_present() {
        let campos = CamposLote {
            os_status: Some(OsStatus::Programado),
            os_tipo: None,
        };
        let json = serde_json::to_value(&campos).unwrap();
        assert_eq!(json["os_status"], "PROGRAMADO");
        assert!(json.get("os_tipo").is_none());
    }
}
