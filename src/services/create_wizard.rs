//! Wizard de criação de OS
//!
//! Este módulo implementa o fluxo de duas etapas da criação em lote:
//! configuração (período, estrutura, tipo e ativos) e confirmação. A
//! criação materializa uma OS por ativo selecionado, todas compartilhando
//! a mesma configuração.

use log::info;
use std::sync::Arc;
use validator::Validate;

use crate::client::OsApi;
use crate::models::auth::Permissions;
use crate::models::estrutura::Ativo;
use crate::models::ordem_servico::{CriarOsPayload, OsCriada, OsTipo};
use crate::services::reference_data::ReferenceDataCache;
use crate::utils::errors::{erro_validacao, erros_validacao, EngineError, EngineResult};

/// Etapa corrente do wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtapaWizard {
    Configurando,
    Confirmando,
}

/// Formulário da etapa de configuração
#[derive(Debug, Clone, Default)]
pub struct FormCriacaoOs {
    /// Período de planejamento no formato `YYYY-MM`
    pub ano_mes: String,
    pub coordenacao: String,
    pub equipe: String,
    pub tipo: Option<OsTipo>,
    pub pdm: u8,
    pub checklist: u8,
    pub capex: u8,
    pub obs_pcm: Option<String>,
}

/// Estado do wizard de criação
pub struct CriacaoOsWizard {
    api: Arc<dyn OsApi>,
    etapa: EtapaWizard,
    pub form: FormCriacaoOs,
    ativos_disponiveis: Vec<Ativo>,
    selecionados: Vec<String>,
    erros: Vec<String>,
    criando: bool,
}

impl CriacaoOsWizard {
    pub fn new(api: Arc<dyn OsApi>) -> Self {
        Self {
            api,
            etapa: EtapaWizard::Configurando,
            form: FormCriacaoOs::default(),
            ativos_disponiveis: Vec::new(),
            selecionados: Vec::new(),
            erros: Vec::new(),
            criando: false,
        }
    }

    pub fn etapa(&self) -> EtapaWizard {
        self.etapa
    }

    pub fn erros(&self) -> &[String] {
        &self.erros
    }

    pub fn criando(&self) -> bool {
        self.criando
    }

    pub fn ativos_disponiveis(&self) -> &[Ativo] {
        &self.ativos_disponiveis
    }

    pub fn selecionados(&self) -> &[String] {
        &self.selecionados
    }

    /// Troca a coordenação. Equipe, opções de ativo e seleção dependem
    /// dela e são limpas juntas.
    pub fn definir_coordenacao(&mut self, coordenacao: impl Into<String>) {
        self.form.coordenacao = coordenacao.into();
        self.form.equipe.clear();
        self.ativos_disponiveis.clear();
        self.selecionados.clear();
    }

    /// Troca a equipe e carrega os ativos dela. A seleção anterior é
    /// sempre descartada - ativos pertencem a uma equipe.
    pub async fn definir_equipe(
        &mut self,
        equipe: impl Into<String>,
        referencias: &mut ReferenceDataCache,
    ) -> EngineResult<()> {
        self.form.equipe = equipe.into();
        self.selecionados.clear();
        self.ativos_disponiveis = if self.form.equipe.is_empty() {
            Vec::new()
        } else {
            referencias.ativos_da_equipe(&self.form.equipe).await?
        };
        Ok(())
    }

    pub fn alternar_ativo(&mut self, ativo_id: &str) {
        if let Some(posicao) = self.selecionados.iter().position(|id| id == ativo_id) {
            self.selecionados.remove(posicao);
        } else {
            self.selecionados.push(ativo_id.to_string());
        }
    }

    /// Filtra as opções de ativo por código ou descritivo, sem distinguir
    /// maiúsculas. A seleção não é afetada pela busca.
    pub fn buscar_ativos(&self, termo: &str) -> Vec<&Ativo> {
        let termo = termo.trim().to_lowercase();
        self.ativos_disponiveis
            .iter()
            .filter(|ativo| {
                termo.is_empty()
                    || ativo.codpe.to_lowercase().contains(&termo)
                    || ativo.descritivo.to_lowercase().contains(&termo)
            })
            .collect()
    }

    /// Avança da configuração para a confirmação. Todas as pendências são
    /// acumuladas em uma lista única; nenhuma chamada de rede acontece.
    pub fn avancar(&mut self, referencias: &ReferenceDataCache) -> EngineResult<()> {
        let mut pendencias = Vec::new();
        if self.form.ano_mes.trim().is_empty() {
            pendencias.push("Preencha Ano/Mês.".to_string());
        }
        if self.form.coordenacao.is_empty() {
            pendencias.push("Selecione a Coordenação.".to_string());
        }
        if self.form.equipe.is_empty() {
            pendencias.push("Selecione a Equipe.".to_string());
        }
        if self.form.tipo.is_none() {
            pendencias.push("Selecione o Tipo.".to_string());
        }
        if self.selecionados.is_empty() {
            pendencias.push("Selecione pelo menos um ativo.".to_string());
        }
        if !self.form.coordenacao.is_empty()
            && !self.form.equipe.is_empty()
            && referencias
                .resolver_estrutura(&self.form.coordenacao, &self.form.equipe)
                .is_none()
        {
            pendencias.push("Estrutura invalida.".to_string());
        }
        if !pendencias.is_empty() {
            self.erros = pendencias.clone();
            return Err(erros_validacao(pendencias));
        }
        self.erros.clear();
        self.etapa = EtapaWizard::Confirmando;
        Ok(())
    }

    /// Volta da confirmação para a configuração preservando tudo.
    pub fn voltar(&mut self) {
        self.etapa = EtapaWizard::Configurando;
    }

    fn montar_payload(&self, referencias: &ReferenceDataCache) -> EngineResult<CriarOsPayload> {
        let estrutura = referencias
            .resolver_estrutura(&self.form.coordenacao, &self.form.equipe)
            .ok_or_else(|| erro_validacao("Estrutura invalida."))?;
        let mut partes = self.form.ano_mes.splitn(2, '-');
        let ano: i32 = partes
            .next()
            .and_then(|parte| parte.parse().ok())
            .ok_or_else(|| erro_validacao("Preencha Ano/Mês."))?;
        let mes: u32 = partes
            .next()
            .and_then(|parte| parte.parse().ok())
            .ok_or_else(|| erro_validacao("Preencha Ano/Mês."))?;
        let tipo = self
            .form
            .tipo
            .ok_or_else(|| erro_validacao("Selecione o Tipo."))?;
        Ok(CriarOsPayload {
            estrutura_id: estrutura.id.clone(),
            ativo_ids: self.selecionados.clone(),
            os_tipo: tipo,
            os_pdm: self.form.pdm,
            os_checklist: self.form.checklist,
            os_capex: self.form.capex,
            os_obs_pcm: self.form.obs_pcm.clone(),
            os_ano: ano,
            os_mes: mes,
        })
    }

    /// Confirma a criação. Exige a capacidade de criação, revalida o
    /// payload e emite um único request; o servidor faz o fan-out de uma
    /// OS por ativo.
    pub async fn criar(
        &mut self,
        referencias: &ReferenceDataCache,
        permissoes: &Permissions,
    ) -> EngineResult<Vec<OsCriada>> {
        if !permissoes.pode_criar_os() {
            return Err(EngineError::SemPermissao);
        }
        if self.criando {
            return Err(erro_validacao("Criacao em andamento."));
        }
        let payload = self.montar_payload(referencias)?;
        payload.validate().map_err(|falhas| {
            let mensagens: Vec<String> = falhas
                .field_errors()
                .values()
                .flat_map(|erros| erros.iter())
                .filter_map(|erro| erro.message.as_ref().map(|m| m.to_string()))
                .collect();
            erros_validacao(mensagens)
        })?;

        self.criando = true;
        let resultado = self.api.criar_os(&payload).await;
        self.criando = false;
        let criadas = resultado?;
        info!("✅ {} OS criadas para a equipe {}", criadas.len(), self.form.equipe);
        Ok(criadas)
    }
}
