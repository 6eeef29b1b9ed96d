//! Sessão de detalhe/edição de OS
//!
//! Este módulo implementa a sessão aberta sobre uma única OS: leitura do
//! registro completo, trava de edição por snapshot de status, trava
//! temporal do primeiro slot de programação e o save de registro completo.

use std::sync::Arc;

use crate::client::OsApi;
use crate::models::auth::Permissions;
use crate::models::ordem_servico::{HistoricoOs, OrdemServico, OsStatus, OsTipo};
use crate::utils::date::{hoje_key, to_date_key};
use crate::utils::errors::{erro_validacao, EngineError, EngineResult};

/// Campo editável de uma sessão de detalhe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoOs {
    Numero,
    Estrutura,
    Ativo,
    Status,
    Tipo,
    Pdm,
    Checklist,
    Capex,
    RealizadoEm,
    Programado(u8),
    ObsPcm,
    ObsTecnico,
}

/// O primeiro slot de programação trava quando a OS está PROGRAMADO, ainda
/// não foi realizada e a data do slot já passou. Slots 2 a 5 nunca travam.
pub fn programado1_bloqueado(registro: &OrdemServico, hoje: &str) -> bool {
    if registro.os_status != OsStatus::Programado || registro.os_realizado_em.is_some() {
        return false;
    }
    match to_date_key(registro.os_programado1.as_deref()) {
        Some(chave) => chave.as_str() < hoje,
        None => false,
    }
}

/// Sessão de edição sobre uma OS
pub struct OsDetailSession {
    api: Arc<dyn OsApi>,
    registro: OrdemServico,
    /// Snapshot do status no momento da abertura. A trava de edição é
    /// avaliada sobre ele e não muda até a sessão ser reaberta, mesmo que
    /// um save mova a OS para REALIZADO.
    status_na_abertura: OsStatus,
    historico: Vec<HistoricoOs>,
    erro_historico: Option<String>,
    salvando: bool,
}

impl OsDetailSession {
    /// Abre a sessão buscando o registro completo no servidor.
    pub async fn abrir(api: Arc<dyn OsApi>, id: &str) -> EngineResult<Self> {
        let registro = api.obter_os(id).await?;
        let status_na_abertura = registro.os_status;
        Ok(Self {
            api,
            registro,
            status_na_abertura,
            historico: Vec::new(),
            erro_historico: None,
            salvando: false,
        })
    }

    pub fn registro(&self) -> &OrdemServico {
        &self.registro
    }

    /// Trava de edição: OS aberta como REALIZADO é integralmente
    /// somente-leitura.
    pub fn pode_editar(&self) -> bool {
        self.status_na_abertura != OsStatus::Realizado
    }

    /// Verifica se o campo aceita escrita nesta sessão. Estrutura, ativo e
    /// número são imutáveis sempre; o slot 1 tem a trava temporal extra.
    pub fn editavel(&self, campo: CampoOs) -> bool {
        match campo {
            CampoOs::Numero | CampoOs::Estrutura | CampoOs::Ativo => false,
            CampoOs::Programado(1) => {
                self.pode_editar() && !programado1_bloqueado(&self.registro, &hoje_key())
            }
            // Slot inexistente: mesma resposta que definir_programado
            CampoOs::Programado(slot) if !(1..=5).contains(&slot) => false,
            _ => self.pode_editar(),
        }
    }

    fn exigir_edicao(&self) -> EngineResult<()> {
        if self.pode_editar() {
            Ok(())
        } else {
            Err(erro_validacao("OS realizada nao pode ser editada."))
        }
    }

    /// Muda o status respeitando a tabela de transições do ciclo de vida.
    pub fn definir_status(&mut self, status: OsStatus) -> EngineResult<()> {
        self.exigir_edicao()?;
        if !self.registro.os_status.pode_transicionar_para(status) {
            return Err(erro_validacao(&format!(
                "Transicao de {} para {} nao permitida.",
                self.registro.os_status, status
            )));
        }
        self.registro.os_status = status;
        Ok(())
    }

    /// Escreve um dos cinco slots de programação. O slot 1 tem a trava
    /// temporal; os demais apenas a trava geral da sessão.
    pub fn definir_programado(&mut self, slot: u8, valor: Option<String>) -> EngineResult<()> {
        self.exigir_edicao()?;
        if !(1..=5).contains(&slot) {
            return Err(erro_validacao("Slot de programacao invalido."));
        }
        if slot == 1 && programado1_bloqueado(&self.registro, &hoje_key()) {
            return Err(erro_validacao(
                "Data programada 1 vencida nao pode ser alterada.",
            ));
        }
        let destino = match slot {
            1 => &mut self.registro.os_programado1,
            2 => &mut self.registro.os_programado2,
            3 => &mut self.registro.os_programado3,
            4 => &mut self.registro.os_programado4,
            _ => &mut self.registro.os_programado5,
        };
        *destino = valor;
        Ok(())
    }

    pub fn definir_tipo(&mut self, tipo: OsTipo) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_tipo = tipo;
        Ok(())
    }

    pub fn definir_pdm(&mut self, pdm: u8) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_pdm = pdm;
        Ok(())
    }

    pub fn definir_checklist(&mut self, checklist: u8) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_checklist = checklist;
        Ok(())
    }

    pub fn definir_capex(&mut self, capex: u8) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_capex = capex;
        Ok(())
    }

    pub fn definir_realizado_em(&mut self, valor: Option<String>) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_realizado_em = valor;
        Ok(())
    }

    pub fn definir_obs_pcm(&mut self, valor: Option<String>) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_obs_pcm = valor;
        Ok(())
    }

    pub fn definir_obs_tecnico(&mut self, valor: Option<String>) -> EngineResult<()> {
        self.exigir_edicao()?;
        self.registro.os_obs_tecnico = valor;
        Ok(())
    }

    /// Persiste a sessão enviando o registro completo e substituindo o
    /// estado local pela resposta canônica do servidor. A trava de edição
    /// continua a do snapshot de abertura - salvar como REALIZADO não
    /// congela a sessão corrente.
    pub async fn salvar(&mut self) -> EngineResult<()> {
        self.exigir_edicao()?;
        if self.salvando {
            return Err(erro_validacao("Salvamento em andamento."));
        }
        self.salvando = true;
        let resultado = self.api.atualizar_os(&self.registro).await;
        self.salvando = false;
        self.registro = resultado?;
        Ok(())
    }

    /// Cancela a OS (soft delete) via patch mínimo. Exige a capacidade de
    /// exclusão do domínio de planejamento.
    pub async fn cancelar(&mut self, permissoes: &Permissions) -> EngineResult<OsStatus> {
        if !permissoes.pode_excluir_os() {
            return Err(EngineError::SemPermissao);
        }
        if self.registro.os_status.terminal() {
            return Err(erro_validacao(&format!(
                "Transicao de {} para CANCELADO nao permitida.",
                self.registro.os_status
            )));
        }
        self.registro = self.api.cancelar_os(&self.registro.id).await?;
        Ok(self.registro.os_status)
    }

    /// Carrega o histórico de alterações. Falha aqui não derruba a sessão:
    /// o erro fica em um canal separado e o registro continua editável.
    pub async fn carregar_historico(&mut self) -> EngineResult<()> {
        match self.api.historico_os(&self.registro.id).await {
            Ok(historico) => {
                self.historico = historico;
                self.erro_historico = None;
                Ok(())
            }
            Err(EngineError::SessaoExpirada) => Err(EngineError::SessaoExpirada),
            Err(erro) => {
                self.erro_historico = Some(erro.to_string());
                Ok(())
            }
        }
    }

    pub fn historico(&self) -> &[HistoricoOs] {
        &self.historico
    }

    pub fn erro_historico(&self) -> Option<&str> {
        self.erro_historico.as_deref()
    }

    pub fn salvando(&self) -> bool {
        self.salvando
    }
}
