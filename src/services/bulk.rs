//! Mutação em lote de OS
//!
//! Este módulo aplica status e/ou tipo a vários registros de uma vez, com
//! pré-checagem de transições no cliente: registros cuja transição de
//! status seria rejeitada são separados e reportados como ignorados, e só
//! os demais seguem para o servidor.

use log::info;
use std::sync::Arc;

use crate::client::OsApi;
use crate::models::auth::Permissions;
use crate::models::ordem_servico::{CamposLote, OrdemServicoResumo, OsStatus, OsTipo};
use crate::utils::errors::{erro_validacao, EngineError, EngineResult};

/// Registro excluído do lote na pré-checagem de transições
#[derive(Debug, Clone, PartialEq)]
pub struct IgnoradoLote {
    pub id: String,
    pub status_atual: OsStatus,
}

/// Resultado de uma aplicação em lote
#[derive(Debug, Clone, PartialEq)]
pub struct ResultadoLote {
    /// Ids efetivamente enviados ao servidor
    pub enviados: Vec<String>,
    /// Registros pulados por transição de status não permitida
    pub ignorados: Vec<IgnoradoLote>,
}

/// Controlador da barra de ações em lote
pub struct BulkMutationController {
    api: Arc<dyn OsApi>,
    selecao: Vec<String>,
    pub status_alvo: Option<OsStatus>,
    pub tipo_alvo: Option<OsTipo>,
    aplicando: bool,
}

impl BulkMutationController {
    pub fn new(api: Arc<dyn OsApi>) -> Self {
        Self {
            api,
            selecao: Vec::new(),
            status_alvo: None,
            tipo_alvo: None,
            aplicando: false,
        }
    }

    pub fn definir_selecao(&mut self, ids: Vec<String>) {
        self.selecao = ids;
    }

    pub fn selecao(&self) -> &[String] {
        &self.selecao
    }

    pub fn aplicando(&self) -> bool {
        self.aplicando
    }

    /// Separa a seleção entre registros que aceitam a transição de status
    /// pedida e registros que seriam rejeitados. Sem status alvo todos
    /// seguem; ids fora de `conhecidos` também seguem - o servidor é o
    /// árbitro final.
    fn particionar(
        &self,
        conhecidos: &[OrdemServicoResumo],
        status_alvo: Option<OsStatus>,
    ) -> ResultadoLote {
        let Some(status) = status_alvo else {
            return ResultadoLote {
                enviados: self.selecao.clone(),
                ignorados: Vec::new(),
            };
        };
        let mut enviados = Vec::new();
        let mut ignorados = Vec::new();
        for id in &self.selecao {
            match conhecidos.iter().find(|linha| &linha.id == id) {
                Some(linha) if !linha.os_status.pode_transicionar_para(status) => {
                    ignorados.push(IgnoradoLote {
                        id: id.clone(),
                        status_atual: linha.os_status,
                    });
                }
                _ => enviados.push(id.clone()),
            }
        }
        ResultadoLote { enviados, ignorados }
    }

    /// Aplica os campos alvo à seleção corrente. Validações de seleção e
    /// campos acontecem antes de qualquer request; cancelamento em lote
    /// exige a capacidade de exclusão além da de edição. A seleção só é
    /// limpa quando o servidor confirma.
    ///
    /// Este método não toca a seleção da listagem nem a recarrega; quem
    /// orquestra o fluxo completo (limpar seleção + recarregar) é
    /// `EngineState::aplicar_lote`.
    pub async fn aplicar(
        &mut self,
        conhecidos: &[OrdemServicoResumo],
        permissoes: &Permissions,
    ) -> EngineResult<ResultadoLote> {
        if self.aplicando {
            return Err(erro_validacao("Operacao em lote em andamento."));
        }
        if self.selecao.is_empty() {
            return Err(erro_validacao("Selecione pelo menos uma OS."));
        }
        let campos = CamposLote {
            os_status: self.status_alvo,
            os_tipo: self.tipo_alvo,
        };
        if campos.vazio() {
            return Err(erro_validacao("Selecione um status ou tipo para alterar."));
        }
        if !permissoes.pode_editar_os() {
            return Err(EngineError::SemPermissao);
        }
        if self.status_alvo == Some(OsStatus::Cancelado) && !permissoes.pode_excluir_os() {
            return Err(EngineError::SemPermissao);
        }

        let resultado = self.particionar(conhecidos, self.status_alvo);
        if resultado.enviados.is_empty() {
            // Tudo foi filtrado na pré-checagem, nada a enviar
            return Ok(resultado);
        }

        self.aplicando = true;
        let envio = self
            .api
            .atualizar_os_em_lote(&resultado.enviados, &campos)
            .await;
        self.aplicando = false;
        envio?;

        info!(
            "✅ Lote aplicado: {} enviadas, {} ignoradas",
            resultado.enviados.len(),
            resultado.ignorados.len()
        );
        self.selecao.clear();
        self.status_alvo = None;
        self.tipo_alvo = None;
        Ok(resultado)
    }
}
