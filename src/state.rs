//! Estado compartilhado do motor
//!
//! Este módulo amarra o cliente do API, o cache de referência e as
//! permissões do operador, e fabrica os estados de tela a partir deles.

use log::warn;
use std::sync::Arc;

use crate::client::OsApi;
use crate::config::environment::EnvironmentConfig;
use crate::models::auth::Permissions;
use crate::services::bulk::{BulkMutationController, ResultadoLote};
use crate::services::create_wizard::CriacaoOsWizard;
use crate::services::detail_session::OsDetailSession;
use crate::services::list_view::OsListView;
use crate::services::reference_data::ReferenceDataCache;
use crate::utils::errors::{EngineError, EngineResult};

/// Estado raiz de uma sessão do motor de OS
pub struct EngineState {
    pub api: Arc<dyn OsApi>,
    pub referencias: ReferenceDataCache,
    pub permissoes: Permissions,
    pub config: EnvironmentConfig,
}

impl EngineState {
    pub fn new(api: Arc<dyn OsApi>, config: EnvironmentConfig) -> Self {
        Self {
            referencias: ReferenceDataCache::new(api.clone()),
            api,
            permissoes: Permissions::default(),
            config,
        }
    }

    /// Carrega permissões e estrutura organizacional. Falha nas permissões
    /// degrada para default-deny (as ações somem da interface, o servidor
    /// continua sendo o árbitro); sessão expirada é repassada.
    pub async fn inicializar(&mut self) -> EngineResult<()> {
        match self.api.permissoes().await {
            Ok(permissoes) => self.permissoes = permissoes,
            Err(EngineError::SessaoExpirada) => return Err(EngineError::SessaoExpirada),
            Err(erro) => {
                warn!("⚠️ Falha ao carregar permissoes, aplicando default-deny: {}", erro);
                self.permissoes = Permissions::default();
            }
        }
        self.referencias.carregar_estruturas().await
    }

    pub fn nova_lista(&self) -> OsListView {
        OsListView::new(self.api.clone(), self.config.page_size_padrao)
    }

    pub async fn abrir_detalhe(&self, id: &str) -> EngineResult<OsDetailSession> {
        OsDetailSession::abrir(self.api.clone(), id).await
    }

    pub fn novo_wizard(&self) -> CriacaoOsWizard {
        CriacaoOsWizard::new(self.api.clone())
    }

    pub fn novo_lote(&self) -> BulkMutationController {
        BulkMutationController::new(self.api.clone())
    }

    /// Fluxo completo da barra de lote: aplica a mutação sobre a seleção
    /// corrente da listagem e, quando o servidor confirma, limpa a seleção
    /// e recarrega a lista (a lista local nunca é remendada após mutação,
    /// o estado novo vem sempre do servidor).
    pub async fn aplicar_lote(
        &self,
        lista: &mut OsListView,
        lote: &mut BulkMutationController,
    ) -> EngineResult<ResultadoLote> {
        lote.definir_selecao(lista.selecionados());
        let resultado = lote.aplicar(lista.itens(), &self.permissoes).await?;
        lista.limpar_selecao();
        lista.atualizar().await?;
        Ok(resultado)
    }
}
